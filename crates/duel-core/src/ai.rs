//! Spell selection for AI-controlled sides.
//!
//! The policy is a bounded rejection-sampling search: every iteration draws
//! a random spell, a few fixed priorities may override the draw, and
//! otherwise the draw is accepted or thrown back. After `max_rejections`
//! thrown-back draws the search gives up and casts the defence buff.

use crate::combatant::Combatant;
use crate::config::AiConfig;
use crate::cooldown::CooldownTracker;
use crate::dice::DiceRoller;
use crate::spell::{Spell, SpellId, Spellbook};

/// What the AI can see when choosing.
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    /// The side choosing.
    pub actor: &'a Combatant,
    /// Its opponent.
    pub opponent: &'a Combatant,
    /// The actor's cooldowns.
    pub cooldowns: &'a CooldownTracker,
    /// Whether the actor already used its utility effect this turn.
    pub utility_used: bool,
}

/// Why a spell was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceReason {
    /// Recharge was ready.
    Recharge,
    /// Spare AP and the attack buff was ready.
    AttackBuffOpener,
    /// Low on HP and the heal was ready.
    ForcedHeal,
    /// The random draw passed every check.
    Drawn,
    /// Too many draws were rejected.
    Fallback,
}

/// The outcome of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiChoice {
    /// The spell to cast.
    pub spell: SpellId,
    /// Draws thrown back before deciding.
    pub rejected_draws: u32,
    /// Which rule decided.
    pub reason: ChoiceReason,
}

impl AiChoice {
    /// True when the search hit its cap.
    pub fn is_degraded(&self) -> bool {
        self.reason == ChoiceReason::Fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    UtilityLatched,
    HealthyHeal,
    LastActionBuff,
    DefenceWhileOpponentStunned,
    CannotAfford,
    CoolingDown,
}

/// The AI decision maker.
#[derive(Debug, Clone, Default)]
pub struct EnemyAi {
    config: AiConfig,
}

impl EnemyAi {
    /// Create with the given tuning.
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    /// The tuning in use.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Pick a spell for `view.actor`.
    pub fn choose_spell(
        &self,
        view: &AiView<'_>,
        book: &Spellbook,
        dice: &mut DiceRoller,
    ) -> AiChoice {
        let recharge = book.recharge();
        let foray = book.foray();
        let heal = book.heal();
        let mut rejected = 0;

        loop {
            let candidate = book.at(dice.pick(book.len())).unwrap_or(recharge);

            if rejected >= self.config.max_rejections {
                let fallback = book.resilience().id;
                tracing::warn!(
                    rejected,
                    spell = %fallback,
                    "AI search exhausted, falling back to defence buff"
                );
                return AiChoice {
                    spell: fallback,
                    rejected_draws: rejected,
                    reason: ChoiceReason::Fallback,
                };
            }

            if !view.cooldowns.is_on_cooldown(recharge.id) {
                return self.decide(recharge, rejected, ChoiceReason::Recharge);
            }

            if view.actor.current_ap > 2
                && !view.utility_used
                && !view.cooldowns.is_on_cooldown(foray.id)
            {
                return self.decide(foray, rejected, ChoiceReason::AttackBuffOpener);
            }

            if let Some(why) = self.reject(candidate, view, book) {
                tracing::debug!(spell = %candidate.name, reason = ?why, "AI rejected draw");
                rejected += 1;
                continue;
            }

            if self.wants_heal(view.actor)
                && !view.utility_used
                && !view.cooldowns.is_on_cooldown(heal.id)
            {
                return self.decide(heal, rejected, ChoiceReason::ForcedHeal);
            }

            match Self::affordable(candidate, view) {
                Ok(()) => return self.decide(candidate, rejected, ChoiceReason::Drawn),
                Err(why) => {
                    tracing::debug!(spell = %candidate.name, reason = ?why, "AI rejected draw");
                    rejected += 1;
                }
            }
        }
    }

    fn decide(&self, spell: &Spell, rejected_draws: u32, reason: ChoiceReason) -> AiChoice {
        tracing::debug!(spell = %spell.name, rejected_draws, ?reason, "AI chose spell");
        AiChoice {
            spell: spell.id,
            rejected_draws,
            reason,
        }
    }

    fn reject(&self, candidate: &Spell, view: &AiView<'_>, book: &Spellbook) -> Option<Rejection> {
        if candidate.is_latched_utility() && view.utility_used {
            return Some(Rejection::UtilityLatched);
        }
        if candidate.id == book.heal().id && self.is_healthy(view.actor) {
            return Some(Rejection::HealthyHeal);
        }
        if candidate.id == book.foray().id && view.actor.current_ap == 1 {
            return Some(Rejection::LastActionBuff);
        }
        if candidate.id == book.resilience().id && view.opponent.status.stunned {
            return Some(Rejection::DefenceWhileOpponentStunned);
        }
        None
    }

    fn affordable(candidate: &Spell, view: &AiView<'_>) -> Result<(), Rejection> {
        if view.actor.current_ap < candidate.effective_cost() {
            return Err(Rejection::CannotAfford);
        }
        if view.cooldowns.is_on_cooldown(candidate.id) {
            return Err(Rejection::CoolingDown);
        }
        Ok(())
    }

    fn wants_heal(&self, actor: &Combatant) -> bool {
        f64::from(actor.current_hp) <= self.config.heal_below * f64::from(actor.max_hp)
    }

    fn is_healthy(&self, actor: &Combatant) -> bool {
        f64::from(actor.current_hp) >= self.config.no_heal_above * f64::from(actor.max_hp)
    }
}
