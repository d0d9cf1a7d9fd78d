//! Resolves one spell cast into state changes and presentation phases.
//!
//! Phase order for every cast: announce, attack roll, hit or miss, amount
//! roll, HP change, status changes, completion. Phases that do not apply
//! to a spell are left out. If the HP change ends the match, `MatchEnded`
//! is the last phase of the cast.

use crate::attributes::Attribute;
use crate::combatant::{ApChange, Combatant};
use crate::dice::D20Roll;
use crate::events::BattleEvent;
use crate::side::Side;
use crate::spell::{Spell, SpellEffect, SpellId};
use crate::state::BattleState;
use crate::status::{StatusEffects, StatusKind};

/// To-hit bonus from the attack buff, also added to every rolled amount.
pub const ATTACK_BUFF: i32 = 3;
/// To-hit penalty from the attack debuff.
pub const ATTACK_DEBUFF: i32 = 3;
/// Minimum armor bonus granted by the defence buff.
pub const RESILIENCE_BASE: i32 = 2;

/// How a cast turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The attack landed for `amount` damage.
    Hit,
    /// The attack fell short.
    Miss,
    /// The caster healed `amount` HP.
    Healed,
    /// A status was put on the caster.
    StatusGranted,
    /// The caster gained AP.
    Recharged,
}

/// Summary of a resolved cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The caster.
    pub actor: Side,
    /// The spell cast.
    pub spell: SpellId,
    /// What happened.
    pub outcome: Outcome,
    /// Damage dealt or HP restored.
    pub amount: u32,
    /// Whether the attack die came up 20.
    pub critical: bool,
    /// Whether this cast decided the match.
    pub match_ended: bool,
}

/// The resolved attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// The d20.
    pub roll: D20Roll,
    /// `max(0, roll + modifier) + buff - debuff`.
    pub total: i32,
    /// Armor plus defence bonus; `None` on a critical.
    pub threshold: Option<i32>,
    /// Whether the attack lands.
    pub hit: bool,
}

/// Resolve `spell` cast by `actor`. The caller has already checked that
/// the cast is legal.
pub fn resolve_spell(state: &mut BattleState, spell: &Spell, actor: Side) -> Resolution {
    let target = actor.opponent();
    state.emit(BattleEvent::ActionAnnounced {
        side: actor,
        spell: spell.id,
    });

    if !spell.is_recharge() {
        let current = state
            .combatants
            .get_mut(actor)
            .adjust_ap(spell.action_cost, ApChange::Deduct);
        state.emit(BattleEvent::ActionPointsChanged {
            side: actor,
            current,
        });
    }

    let modifier = state.combatant(actor).modifier(spell.modifier);
    let mut resolution = Resolution {
        actor,
        spell: spell.id,
        outcome: Outcome::Miss,
        amount: 0,
        critical: false,
        match_ended: false,
    };

    match spell.effect {
        SpellEffect::Recharge { amount } => {
            let current = state
                .combatants
                .get_mut(actor)
                .adjust_ap(amount, ApChange::Gain);
            state.emit(BattleEvent::ActionPointsChanged {
                side: actor,
                current,
            });
            resolution.outcome = Outcome::Recharged;
            resolution.amount = amount;
        }
        SpellEffect::Grant { status } => {
            let holder = status.holder(actor);
            let changed =
                StatusEffects::set_status(state.combatants.get_mut(holder), holder, status, true);
            state.emit_all(changed);
            resolution.outcome = Outcome::StatusGranted;
        }
        SpellEffect::Heal => {
            let amount = roll_amount(state, spell, actor, modifier, false);
            let healed = apply_heal(state, actor, amount);
            resolution.outcome = Outcome::Healed;
            resolution.amount = healed;
        }
        SpellEffect::Damage { inflicts } => {
            let attack = attack_roll(state, actor, modifier);
            resolution.critical = attack.roll.critical;
            if attack.hit {
                let amount = roll_amount(state, spell, actor, modifier, attack.roll.critical);
                resolution.outcome = Outcome::Hit;
                resolution.amount = amount;
                if apply_damage(state, target, amount) {
                    state
                        .cooldowns
                        .get_mut(actor)
                        .start_cooldown(spell.id, spell.cooldown);
                    state.finish_match(actor);
                    resolution.match_ended = true;
                    tracing::debug!(?resolution, "resolved");
                    return resolution;
                }
                if let Some(kind) = inflicts {
                    inflict(state, actor, kind);
                }
            }
        }
    }

    if spell.is_latched_utility() {
        state.effects.mark_utility_used(actor);
    }
    state
        .cooldowns
        .get_mut(actor)
        .start_cooldown(spell.id, spell.cooldown);
    state.emit(BattleEvent::ResolutionComplete {
        side: actor,
        spell: spell.id,
    });
    tracing::debug!(?resolution, spell = %spell.name, "resolved");
    resolution
}

/// Roll to hit for `actor` against its opponent and queue the roll and
/// hit phases.
pub fn attack_roll(state: &mut BattleState, actor: Side, modifier: i32) -> AttackRoll {
    let roll = state.dice.roll_d20();
    let attacker = state.combatant(actor);
    let buff = if attacker.status.increased_attack {
        ATTACK_BUFF
    } else {
        0
    };
    let debuff = if attacker.status.decreased_attack {
        ATTACK_DEBUFF
    } else {
        0
    };
    let total = (roll.value as i32 + modifier).max(0) + buff - debuff;

    let (threshold, hit) = if roll.critical {
        (None, true)
    } else {
        let defender = state.combatant(actor.opponent());
        let threshold = defender.armor_class + resilience_bonus(defender);
        (Some(threshold), total >= threshold)
    };

    state.emit(BattleEvent::RollRevealed {
        value: roll.value,
        modifier,
        total,
        is_critical: roll.critical,
    });
    state.emit(BattleEvent::HitResolved {
        success: hit,
        threshold,
    });
    AttackRoll {
        roll,
        total,
        threshold,
        hit,
    }
}

/// Extra armor from the defence buff: `max(2, 2 + str modifier)`, or 0.
pub fn resilience_bonus(defender: &Combatant) -> i32 {
    if defender.status.increased_defence {
        let str_mod = defender.attributes.modifier(Attribute::Str);
        RESILIENCE_BASE.max(RESILIENCE_BASE + str_mod)
    } else {
        0
    }
}

fn roll_amount(
    state: &mut BattleState,
    spell: &Spell,
    actor: Side,
    modifier: i32,
    critical: bool,
) -> u32 {
    let mut subtotal = state.dice.roll_spec(spell.dice);
    if critical {
        subtotal = subtotal.saturating_mul(2);
    }
    let buff = if state.combatant(actor).status.increased_attack {
        ATTACK_BUFF
    } else {
        0
    };
    let total = i32::try_from(subtotal)
        .unwrap_or(i32::MAX)
        .saturating_add(modifier)
        .max(0)
        .saturating_add(buff)
        .unsigned_abs();
    state.emit(BattleEvent::AmountRolled {
        dice: spell.dice,
        subtotal,
        total,
        critical,
    });
    total
}

/// Returns true if the target fell.
fn apply_damage(state: &mut BattleState, target: Side, amount: u32) -> bool {
    let remaining = state.combatants.get_mut(target).apply_damage(amount);
    state.stats.record_damage(target, amount);
    state.emit(BattleEvent::DamageApplied { target, amount });
    remaining == 0
}

fn apply_heal(state: &mut BattleState, target: Side, amount: u32) -> u32 {
    let combatant = state.combatants.get_mut(target);
    let before = combatant.current_hp;
    let healed = combatant.apply_heal(amount) - before;
    state.stats.record_heal(target, healed);
    state.emit(BattleEvent::HealApplied {
        target,
        amount: healed,
    });
    healed
}

fn inflict(state: &mut BattleState, actor: Side, kind: StatusKind) {
    let holder = kind.holder(actor);
    let changed = StatusEffects::set_status(state.combatants.get_mut(holder), holder, kind, true);
    state.emit_all(changed);
}
