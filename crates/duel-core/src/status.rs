//! Buffs, debuffs, and the one-utility-per-turn latch.
//!
//! Every status has an author: buffs are cast by their holder on itself,
//! debuffs by the holder's opponent. A status lasts until its author's
//! next turn begins.

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::events::BattleEvent;
use crate::side::{PerSide, Side};

/// A status a combatant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Raises the bar attackers must reach.
    IncreasedDefence,
    /// +3 to hit and to damage or healing.
    IncreasedAttack,
    /// -3 to hit.
    DecreasedAttack,
    /// The holder loses its next turn.
    Stunned,
}

/// Who a status lands on, relative to the caster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTarget {
    /// The caster itself.
    Caster,
    /// The caster's opponent.
    Opponent,
}

impl StatusKind {
    /// Every status kind.
    pub const ALL: [StatusKind; 4] = [
        StatusKind::IncreasedDefence,
        StatusKind::IncreasedAttack,
        StatusKind::DecreasedAttack,
        StatusKind::Stunned,
    ];

    /// Where a status lands when cast.
    pub fn target(self) -> StatusTarget {
        match self {
            Self::IncreasedDefence | Self::IncreasedAttack => StatusTarget::Caster,
            Self::DecreasedAttack | Self::Stunned => StatusTarget::Opponent,
        }
    }

    /// The side holding this status when `caster` casts it.
    pub fn holder(self, caster: Side) -> Side {
        match self.target() {
            StatusTarget::Caster => caster,
            StatusTarget::Opponent => caster.opponent(),
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncreasedDefence => write!(f, "increased defence"),
            Self::IncreasedAttack => write!(f, "increased attack"),
            Self::DecreasedAttack => write!(f, "decreased attack"),
            Self::Stunned => write!(f, "stunned"),
        }
    }
}

/// The status flags on one combatant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Resilience is up.
    pub increased_defence: bool,
    /// Foray Stance is up.
    pub increased_attack: bool,
    /// Crippled.
    pub decreased_attack: bool,
    /// Stunned.
    pub stunned: bool,
}

impl StatusFlags {
    /// Read one flag.
    pub fn get(&self, kind: StatusKind) -> bool {
        match kind {
            StatusKind::IncreasedDefence => self.increased_defence,
            StatusKind::IncreasedAttack => self.increased_attack,
            StatusKind::DecreasedAttack => self.decreased_attack,
            StatusKind::Stunned => self.stunned,
        }
    }

    /// Write one flag.
    pub fn set(&mut self, kind: StatusKind, enabled: bool) {
        match kind {
            StatusKind::IncreasedDefence => self.increased_defence = enabled,
            StatusKind::IncreasedAttack => self.increased_attack = enabled,
            StatusKind::DecreasedAttack => self.decreased_attack = enabled,
            StatusKind::Stunned => self.stunned = enabled,
        }
    }

    /// The flags currently set.
    pub fn active(&self) -> Vec<StatusKind> {
        StatusKind::ALL
            .into_iter()
            .filter(|k| self.get(*k))
            .collect()
    }
}

/// Applies and clears statuses, and tracks each side's utility latch.
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    utility_used: PerSide<bool>,
}

impl StatusEffects {
    /// Create with both latches open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a flag on `holder`. Returns an event when the flag changed.
    pub fn set_status(
        combatant: &mut Combatant,
        holder: Side,
        kind: StatusKind,
        enabled: bool,
    ) -> Option<BattleEvent> {
        if combatant.status.get(kind) == enabled {
            return None;
        }
        combatant.status.set(kind, enabled);
        Some(BattleEvent::StatusChanged {
            target: holder,
            kind,
            enabled,
        })
    }

    /// Clear every status `author` is responsible for: its own buffs and
    /// the debuffs it put on its opponent.
    pub fn clear_authored_by(
        author: Side,
        combatants: &mut PerSide<Combatant>,
    ) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        for kind in StatusKind::ALL {
            let holder = kind.holder(author);
            if let Some(event) = Self::set_status(combatants.get_mut(holder), holder, kind, false) {
                events.push(event);
            }
        }
        events
    }

    /// True once `side` has cast a utility effect this turn.
    pub fn utility_used(&self, side: Side) -> bool {
        *self.utility_used.get(side)
    }

    /// Close `side`'s latch for the rest of its turn.
    pub fn mark_utility_used(&mut self, side: Side) {
        *self.utility_used.get_mut(side) = true;
    }

    /// Reopen `side`'s latch.
    pub fn reset_latch(&mut self, side: Side) {
        *self.utility_used.get_mut(side) = false;
    }
}
