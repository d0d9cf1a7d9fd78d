//! Worked examples of the combat rules, driven through a scripted dice source.

use std::sync::Arc;

use duel_core::{
    Attributes, BattleEvent, Combatant, Control, DiceRoller, DiceSpec, Die, DuelError,
    MatchConfig, MatchSession, Outcome, Side, Spell, SpellCategory, SpellEffect, SpellId,
    Spellbook,
};

const RESILIENCE: SpellId = SpellId(1);
const SWORD: SpellId = SpellId(5);

fn manual() -> MatchConfig {
    MatchConfig::default().with_control(Side::Enemy, Control::Manual)
}

fn session(
    player: Combatant,
    enemy: Combatant,
    book: Spellbook,
    draws: Vec<u32>,
) -> MatchSession {
    let mut s = MatchSession::from_combatants(
        manual(),
        Arc::new(book),
        player,
        enemy,
        DiceRoller::scripted(draws),
    );
    s.run_until_input();
    s
}

/// A book whose one attack is 2d6 keyed to STR.
fn two_d6_book() -> Spellbook {
    let mut spells = Spellbook::standard().spells().to_vec();
    spells.push(Spell {
        id: SpellId(20),
        name: "Maul".into(),
        category: SpellCategory::Offensive,
        effect: SpellEffect::Damage { inflicts: None },
        action_cost: 1,
        cooldown: 1,
        dice: DiceSpec::new(2, Die::D6),
        modifier: Some(duel_core::Attribute::Str),
        description: String::new(),
    });
    Spellbook::new(spells).unwrap()
}

#[test]
fn buffed_fourteen_hits_armor_eighteen() {
    // STR 16 (+3) with the attack buff up: max(0, 14 + 3) + 3 = 20.
    let player = Combatant::with_stats("P", Attributes::new([16, 10, 10, 10, 10, 10]), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 18, 50);
    let mut s = session(player, enemy, Spellbook::standard(), vec![14, 4]);
    s.request_action(Side::Player, SpellId(2)).unwrap();
    s.run_until_input();
    let res = s.request_action(Side::Player, SWORD).unwrap();
    assert_eq!(res.outcome, Outcome::Hit);
    let events = s.run_until_input();
    assert!(events.iter().any(|r| r.event
        == BattleEvent::RollRevealed {
            value: 14,
            modifier: 3,
            total: 20,
            is_critical: false
        }));
}

#[test]
fn natural_twenty_doubles_before_modifier() {
    // STR 14 (+2), 2d6 rolls 3 + 4 = 7, doubled to 14, plus 2.
    let player = Combatant::with_stats("P", Attributes::new([14, 10, 10, 10, 10, 10]), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 30, 50);
    let mut s = session(player, enemy, two_d6_book(), vec![20, 3, 4]);
    let res = s.request_action(Side::Player, SpellId(20)).unwrap();
    assert!(res.critical);
    assert_eq!(res.amount, 16);
    assert_eq!(s.combatant(Side::Enemy).current_hp, 34);
}

#[test]
fn natural_twenty_with_attack_buff_adds_three() {
    let player = Combatant::with_stats("P", Attributes::new([14, 10, 10, 10, 10, 10]), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 30, 50);
    let mut s = session(player, enemy, two_d6_book(), vec![20, 3, 4]);
    s.request_action(Side::Player, SpellId(2)).unwrap();
    s.run_until_input();
    let res = s.request_action(Side::Player, SpellId(20)).unwrap();
    assert_eq!(res.amount, 19);
}

#[test]
fn resilience_lasts_through_the_opponents_turn() {
    // Enemy STR 10: bonus max(2, 2) = 2 on AC 12, so 13 + 0 misses.
    let player = Combatant::with_stats("P", Attributes::default(), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 12, 50);
    let mut s = session(player, enemy, Spellbook::standard(), vec![13]);
    s.end_turn(Side::Player).unwrap();
    s.run_until_input();
    s.request_action(Side::Enemy, RESILIENCE).unwrap();
    s.run_until_input();
    s.end_turn(Side::Enemy).unwrap();
    s.run_until_input();
    assert!(s.combatant(Side::Enemy).status.increased_defence);
    let res = s.request_action(Side::Player, SWORD).unwrap();
    assert_eq!(res.outcome, Outcome::Miss);
    s.run_until_input();
    s.end_turn(Side::Player).unwrap();
    s.run_until_input();
    // Cleared when the enemy's own turn comes back around.
    assert!(!s.combatant(Side::Enemy).status.increased_defence);
}

#[test]
fn cripple_penalizes_the_targets_next_turn_only() {
    // DEX 14 (+2): 15 + 2 = 17 vs AC 12 hits; 1d6 = 1.
    let player = Combatant::with_stats("P", Attributes::new([10, 14, 10, 10, 10, 10]), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 12, 50);
    // Enemy then rolls 14: 14 + 0 - 3 = 11 < 12.
    let mut s = session(player, enemy, Spellbook::standard(), vec![15, 1, 14]);
    s.request_action(Side::Player, SpellId(4)).unwrap();
    s.run_until_input();
    s.end_turn(Side::Player).unwrap();
    s.run_until_input();
    assert!(s.combatant(Side::Enemy).status.decreased_attack);
    let res = s.request_action(Side::Enemy, SWORD).unwrap();
    assert_eq!(res.outcome, Outcome::Miss);
    s.run_until_input();
    s.end_turn(Side::Enemy).unwrap();
    s.run_until_input();
    assert!(!s.combatant(Side::Enemy).status.decreased_attack);
}

#[test]
fn cooldowns_tick_once_per_own_turn() {
    let player = Combatant::with_stats("P", Attributes::default(), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 12, 50);
    let mut s = session(player, enemy, Spellbook::standard(), vec![]);
    // Fireball has a cooldown of 2.
    s.request_action(Side::Player, SpellId(7)).unwrap();
    s.run_until_input();
    assert_eq!(s.current_side(), Side::Enemy);
    assert_eq!(s.cooldowns(Side::Player).remaining(SpellId(7)), 2);
    s.end_turn(Side::Enemy).unwrap();
    s.run_until_input();
    assert_eq!(s.cooldowns(Side::Player).remaining(SpellId(7)), 1);
    assert!(matches!(
        s.request_action(Side::Player, SpellId(7)),
        Err(DuelError::SpellOnCooldown { remaining: 1, .. })
    ));
    s.end_turn(Side::Player).unwrap();
    s.run_until_input();
    s.end_turn(Side::Enemy).unwrap();
    s.run_until_input();
    assert!(!s.cooldowns(Side::Player).is_on_cooldown(SpellId(7)));
}

#[test]
fn recharge_banks_ap_above_max() {
    let player = Combatant::with_stats("P", Attributes::default(), 12, 50);
    let enemy = Combatant::with_stats("E", Attributes::default(), 12, 50);
    let mut s = session(player, enemy, Spellbook::standard(), vec![]);
    s.request_action(Side::Player, SpellId(8)).unwrap();
    assert_eq!(s.combatant(Side::Player).current_ap, 3);
    s.run_until_input();
    // Two-AP spell, then one more one-AP spell in the same turn.
    s.request_action(Side::Player, SpellId(7)).unwrap();
    s.run_until_input();
    s.request_action(Side::Player, SWORD).unwrap();
    s.run_until_input();
    assert_eq!(s.current_side(), Side::Enemy);
}
