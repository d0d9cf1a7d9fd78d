//! Property tests for dice, attributes, clamps, cooldowns, and whole
//! automated matches.

use proptest::prelude::*;

use duel_core::attributes::modifier_for;
use duel_core::{
    Attribute, BattleEvent, Combatant, CooldownTracker, DiceRoller, Die, MatchConfig,
    MatchSession, Side, SpellId, Spellbook,
};

fn die() -> impl Strategy<Value = Die> {
    prop_oneof![
        Just(Die::D4),
        Just(Die::D6),
        Just(Die::D8),
        Just(Die::D10),
        Just(Die::D12),
        Just(Die::D20),
        (2u32..100).prop_map(Die::Custom),
    ]
}

#[derive(Debug, Clone)]
enum CooldownOp {
    Start(u32, u32),
    Tick(u32),
    TickAll,
}

fn cooldown_op() -> impl Strategy<Value = CooldownOp> {
    prop_oneof![
        (0u32..9, 0u32..6).prop_map(|(id, total)| CooldownOp::Start(id, total)),
        (0u32..9).prop_map(CooldownOp::Tick),
        Just(CooldownOp::TickAll),
    ]
}

proptest! {
    #[test]
    fn faces_stay_on_the_die(seed in any::<u64>(), die in die(), count in 0u32..12) {
        let mut dice = DiceRoller::seeded(seed);
        let faces = dice.roll_each(die, count);
        prop_assert_eq!(faces.len(), count as usize);
        prop_assert!(faces.iter().all(|f| (1..=die.sides()).contains(f)));
    }

    #[test]
    fn d20_critical_only_on_twenty(seed in any::<u64>()) {
        let mut dice = DiceRoller::seeded(seed);
        for _ in 0..50 {
            let roll = dice.roll_d20();
            prop_assert!((1..=20).contains(&roll.value));
            prop_assert_eq!(roll.critical, roll.value == 20);
        }
    }

    #[test]
    fn attribute_scores_stay_in_range(seed in any::<u64>()) {
        let mut dice = DiceRoller::seeded(seed);
        for _ in 0..20 {
            prop_assert!((3..=18).contains(&dice.generate_attribute_score()));
        }
    }

    #[test]
    fn modifier_is_the_floor_of_half(score in 0u32..40) {
        let m = modifier_for(score);
        let offset = score as i32 - 10;
        prop_assert!(2 * m <= offset && offset < 2 * m + 2);
    }

    #[test]
    fn generated_combatants_are_sane(seed in any::<u64>()) {
        let mut dice = DiceRoller::seeded(seed);
        let c = Combatant::generate("X", &mut dice);
        prop_assert!(c.max_hp >= 1);
        prop_assert_eq!(c.current_hp, c.max_hp);
        prop_assert_eq!(c.current_ap, 2);
        for attribute in Attribute::ALL {
            prop_assert!((3..=18).contains(&c.attributes.score(attribute)));
        }
        // Base 11..=18, DEX only on a low base, plus the shield.
        prop_assert!((7..=22).contains(&c.armor_class));
    }

    #[test]
    fn hp_stays_within_bounds(
        max_hp in 1u32..200,
        ops in prop::collection::vec((any::<bool>(), 0u32..300), 0..40),
    ) {
        let mut c = Combatant::with_stats("X", Default::default(), 10, max_hp);
        for (heal, amount) in ops {
            let hp = if heal { c.apply_heal(amount) } else { c.apply_damage(amount) };
            prop_assert!(hp <= c.max_hp);
            prop_assert_eq!(hp, c.current_hp);
        }
    }

    #[test]
    fn cooldown_flag_matches_counter(ops in prop::collection::vec(cooldown_op(), 0..60)) {
        let mut tracker = CooldownTracker::for_spellbook(&Spellbook::standard());
        for op in ops {
            match op {
                CooldownOp::Start(id, total) => tracker.start_cooldown(SpellId(id), total),
                CooldownOp::Tick(id) => {
                    tracker.tick(SpellId(id));
                }
                CooldownOp::TickAll => {
                    tracker.tick_all();
                }
            }
            for (_, entry) in tracker.entries() {
                prop_assert_eq!(entry.on_cooldown, entry.remaining > 0);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn automated_matches_keep_their_invariants(seed in any::<u64>()) {
        let mut session = MatchSession::standard(MatchConfig::default().with_seed(seed).ai_vs_ai());
        session.run_rounds(300);

        for side in Side::BOTH {
            let c = session.combatant(side);
            prop_assert!(c.current_hp <= c.max_hp);
        }

        let events = session.log().events();
        let ended = events
            .iter()
            .filter(|r| matches!(r.event, BattleEvent::MatchEnded { .. }))
            .count();
        prop_assert!(ended <= 1);
        if ended == 1 {
            let ends_last = matches!(
                events.last().map(|r| &r.event),
                Some(BattleEvent::MatchEnded { .. })
            );
            prop_assert!(ends_last);
        }
        prop_assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
    }
}
