//! One side's battle state.
//!
//! HP and AP are saturating resources: damage floors HP at 0, healing caps
//! it at max, and spending AP never goes negative. Gaining AP is not capped
//! by `max_ap`, so a Recharge can bank an extra action.

use serde::{Deserialize, Serialize};

use crate::attributes::{Attribute, Attributes};
use crate::dice::{DiceRoller, Die};
use crate::status::StatusFlags;

/// Action points every combatant starts its turns with.
pub const STARTING_AP: u32 = 2;

/// Whether an AP adjustment spends or grants points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApChange {
    /// Spend points, stopping at 0.
    Deduct,
    /// Grant points, with no upper bound.
    Gain,
}

/// A combatant's full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Display name.
    pub name: String,
    /// Attribute scores.
    pub attributes: Attributes,
    /// The bar an attack roll must reach.
    pub armor_class: i32,
    /// Whether the shield roll succeeded (+2 armor class).
    pub has_shield: bool,
    /// Whether the dexterity modifier was folded into armor class.
    pub dex_added_to_armor: bool,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current hit points.
    pub current_hp: u32,
    /// Action points restored each round.
    pub max_ap: u32,
    /// Action points left this turn.
    pub current_ap: u32,
    /// Active buffs and debuffs.
    pub status: StatusFlags,
}

impl Combatant {
    /// Roll a fresh combatant.
    ///
    /// Draw order: six attribute scores (four d6 each), the shield d10, the
    /// armor class draw, then seven d20 for hit points.
    pub fn generate(name: impl Into<String>, dice: &mut DiceRoller) -> Self {
        let attributes = Attributes::generate(dice);

        let has_shield = matches!(dice.roll(Die::D10, 1), 2 | 6 | 10);
        let base_armor = dice.range(11, 18) as i32;
        let dex_added_to_armor = base_armor <= 15;
        let mut armor_class = base_armor;
        if dex_added_to_armor {
            armor_class += attributes.modifier(Attribute::Dex);
        }
        if has_shield {
            armor_class += 2;
        }

        let hp_roll = dice.roll(Die::D20, 7) as i32;
        let max_hp = (hp_roll + 2 * attributes.modifier(Attribute::Con)).max(1) as u32;

        Self {
            name: name.into(),
            attributes,
            armor_class,
            has_shield,
            dex_added_to_armor,
            max_hp,
            current_hp: max_hp,
            max_ap: STARTING_AP,
            current_ap: STARTING_AP,
            status: StatusFlags::default(),
        }
    }

    /// A combatant with fixed numbers, no shield, full HP and AP.
    pub fn with_stats(
        name: impl Into<String>,
        attributes: Attributes,
        armor_class: i32,
        max_hp: u32,
    ) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            attributes,
            armor_class,
            has_shield: false,
            dex_added_to_armor: false,
            max_hp,
            current_hp: max_hp,
            max_ap: STARTING_AP,
            current_ap: STARTING_AP,
            status: StatusFlags::default(),
        }
    }

    /// The modifier for an optional attribute; 0 when there is none.
    pub fn modifier(&self, attribute: Option<Attribute>) -> i32 {
        attribute.map_or(0, |a| self.attributes.modifier(a))
    }

    /// Lose HP, stopping at 0. Returns the new HP.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.current_hp
    }

    /// Regain HP, stopping at max. Returns the new HP.
    pub fn apply_heal(&mut self, amount: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp
    }

    /// Spend or gain AP. Returns the new AP.
    pub fn adjust_ap(&mut self, amount: u32, change: ApChange) -> u32 {
        self.current_ap = match change {
            ApChange::Deduct => self.current_ap.saturating_sub(amount),
            ApChange::Gain => self.current_ap.saturating_add(amount),
        };
        self.current_ap
    }

    /// Refill AP to max.
    pub fn reset_ap(&mut self) {
        self.current_ap = self.max_ap;
    }

    /// True once HP has reached 0.
    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// `current_hp / max_hp`, for display.
    pub fn hp_fraction(&self) -> f64 {
        f64::from(self.current_hp) / f64::from(self.max_hp.max(1))
    }
}

impl std::fmt::Display for Combatant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: HP {}/{}, AP {}/{}, AC {}",
            self.name, self.current_hp, self.max_hp, self.current_ap, self.max_ap, self.armor_class
        )
    }
}
