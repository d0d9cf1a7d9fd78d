//! Spell records and the spellbook a match is played with.
//!
//! Spells are plain data. What a spell *does* is carried by its
//! [`SpellEffect`], so a spellbook can be loaded from JSON and still name
//! the four roles the AI and the resolver rely on: one heal, one
//! defence buff, one attack buff, and one recharge.

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::dice::{DiceSpec, Die, MAX_COUNT, MAX_SIDES};
use crate::error::{DuelError, DuelResult};
use crate::status::{StatusKind, StatusTarget};

/// Identifies a spell within a spellbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellId(pub u32);

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The broad family a spell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellCategory {
    /// Plain damage.
    Offensive,
    /// Heals, buffs, and recharges; no attack roll.
    Utility,
    /// Damage that also weakens the target.
    Debuff,
    /// Damage that also stuns the target.
    Stun,
}

impl std::fmt::Display for SpellCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offensive => write!(f, "offensive"),
            Self::Utility => write!(f, "utility"),
            Self::Debuff => write!(f, "debuff"),
            Self::Stun => write!(f, "stun"),
        }
    }
}

/// What resolving a spell does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpellEffect {
    /// Attack roll against armor, then damage; optionally a status on hit.
    Damage {
        /// Status put on the target when the attack lands.
        #[serde(default)]
        inflicts: Option<StatusKind>,
    },
    /// Heal the caster; never misses.
    Heal,
    /// Put a status on the caster.
    Grant {
        /// The status granted.
        status: StatusKind,
    },
    /// Gain action points; costs nothing and ignores the utility latch.
    Recharge {
        /// Points gained.
        amount: u32,
    },
}

/// An immutable spell definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    /// Identity within the spellbook.
    pub id: SpellId,
    /// Display name.
    pub name: String,
    /// Spell family.
    pub category: SpellCategory,
    /// What the spell does.
    pub effect: SpellEffect,
    /// Action points spent on cast.
    pub action_cost: u32,
    /// Turns before the spell can be cast again.
    pub cooldown: u32,
    /// Dice rolled for damage or healing.
    #[serde(default = "DiceSpec::none")]
    pub dice: DiceSpec,
    /// Attribute whose modifier adds to the roll.
    #[serde(default)]
    pub modifier: Option<Attribute>,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
}

impl Spell {
    /// True for non-Recharge utility spells, the ones the latch limits.
    pub fn is_latched_utility(&self) -> bool {
        self.category == SpellCategory::Utility
            && !matches!(self.effect, SpellEffect::Recharge { .. })
    }

    /// True for the recharge spell.
    pub fn is_recharge(&self) -> bool {
        matches!(self.effect, SpellEffect::Recharge { .. })
    }

    /// True when the category agrees with what the effect does.
    pub fn category_fits_effect(&self) -> bool {
        match (self.category, self.effect) {
            (
                SpellCategory::Utility,
                SpellEffect::Heal | SpellEffect::Grant { .. } | SpellEffect::Recharge { .. },
            ) => true,
            (SpellCategory::Offensive, SpellEffect::Damage { inflicts: None }) => true,
            (SpellCategory::Debuff, SpellEffect::Damage { inflicts: Some(kind) }) => {
                kind != StatusKind::Stunned
            }
            (
                SpellCategory::Stun,
                SpellEffect::Damage {
                    inflicts: Some(StatusKind::Stunned),
                },
            ) => true,
            _ => false,
        }
    }

    /// The AP this spell takes from its caster.
    pub fn effective_cost(&self) -> u32 {
        if self.is_recharge() {
            0
        } else {
            self.action_cost
        }
    }
}

/// The ordered set of spells available in a match.
///
/// Only built through [`Spellbook::new`], [`Spellbook::from_json`] or
/// [`Spellbook::standard`], so every book holds all four roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spellbook {
    spells: Vec<Spell>,
}

impl Spellbook {
    /// Build and validate a spellbook.
    pub fn new(spells: Vec<Spell>) -> DuelResult<Self> {
        let book = Self { spells };
        book.validate()?;
        Ok(book)
    }

    /// Parse a JSON array of spells.
    pub fn from_json(json: &str) -> DuelResult<Self> {
        let spells: Vec<Spell> = serde_json::from_str(json)?;
        Self::new(spells)
    }

    /// Serialize to a JSON array of spells.
    pub fn to_json(&self) -> DuelResult<String> {
        Ok(serde_json::to_string_pretty(&self.spells)?)
    }

    /// All spells in book order.
    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    /// Number of spells.
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    /// True if there are no spells.
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Look a spell up by id.
    pub fn get(&self, id: SpellId) -> Option<&Spell> {
        self.spells.iter().find(|s| s.id == id)
    }

    /// Look a spell up by position.
    pub fn at(&self, index: usize) -> Option<&Spell> {
        self.spells.get(index)
    }

    /// Case-insensitive lookup by name.
    pub fn by_name(&self, name: &str) -> Option<&Spell> {
        self.spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn find(&self, pred: impl Fn(&Spell) -> bool) -> Option<&Spell> {
        self.spells.iter().find(|s| pred(s))
    }

    /// The healing spell.
    pub fn heal(&self) -> &Spell {
        self.role(Role::Heal)
    }

    /// The defence self-buff.
    pub fn resilience(&self) -> &Spell {
        self.role(Role::Resilience)
    }

    /// The offensive self-buff.
    pub fn foray(&self) -> &Spell {
        self.role(Role::Foray)
    }

    /// The action-point spell.
    pub fn recharge(&self) -> &Spell {
        self.role(Role::Recharge)
    }

    fn role(&self, role: Role) -> &Spell {
        self.find(|s| role.matches(s))
            .unwrap_or_else(|| &self.spells[0])
    }

    fn validate(&self) -> DuelResult<()> {
        if self.spells.is_empty() {
            return Err(DuelError::InvalidSpellbook("no spells".into()));
        }
        for role in Role::ALL {
            if self.find(|s| role.matches(s)).is_none() {
                return Err(DuelError::InvalidSpellbook(format!(
                    "missing a {} spell",
                    role.label()
                )));
            }
        }
        for (i, spell) in self.spells.iter().enumerate() {
            if self.spells[..i].iter().any(|s| s.id == spell.id) {
                return Err(DuelError::InvalidSpellbook(format!(
                    "duplicate spell id {}",
                    spell.id
                )));
            }
            if !spell.is_recharge() && spell.action_cost == 0 {
                return Err(DuelError::InvalidSpellbook(format!(
                    "'{}' must cost at least 1 AP",
                    spell.name
                )));
            }
            if spell.is_recharge() && spell.cooldown == 0 {
                return Err(DuelError::InvalidSpellbook(format!(
                    "'{}' needs a cooldown",
                    spell.name
                )));
            }
            match spell.effect {
                SpellEffect::Grant { status } if status.target() != StatusTarget::Caster => {
                    return Err(DuelError::InvalidSpellbook(format!(
                        "'{}' grants {status}, which only lands on opponents",
                        spell.name
                    )));
                }
                SpellEffect::Damage {
                    inflicts: Some(status),
                } if status.target() != StatusTarget::Opponent => {
                    return Err(DuelError::InvalidSpellbook(format!(
                        "'{}' inflicts {status}, which only lands on the caster",
                        spell.name
                    )));
                }
                _ => {}
            }
            if !spell.category_fits_effect() {
                return Err(DuelError::InvalidSpellbook(format!(
                    "'{}' is listed as {} but its effect does not match",
                    spell.name, spell.category
                )));
            }
            if !spell.dice.within_limits() {
                return Err(DuelError::InvalidSpellbook(format!(
                    "'{}' rolls {} d{}, over the limit of {MAX_COUNT} dice of {MAX_SIDES} sides",
                    spell.name,
                    spell.dice.count,
                    spell.dice.die.sides()
                )));
            }
        }
        Ok(())
    }

    /// The built-in nine-spell set.
    pub fn standard() -> Self {
        let spells = vec![
            spell(
                0,
                "Heal",
                SpellCategory::Utility,
                SpellEffect::Heal,
                (1, 3),
                DiceSpec::new(2, Die::D8),
                Some(Attribute::Wis),
                "Mend your wounds. Never misses.",
            ),
            spell(
                1,
                "Resilience",
                SpellCategory::Utility,
                SpellEffect::Grant {
                    status: StatusKind::IncreasedDefence,
                },
                (1, 2),
                DiceSpec::none(),
                None,
                "Harden yourself; attackers need a higher roll until your next turn.",
            ),
            spell(
                2,
                "Foray Stance",
                SpellCategory::Utility,
                SpellEffect::Grant {
                    status: StatusKind::IncreasedAttack,
                },
                (1, 3),
                DiceSpec::none(),
                None,
                "+3 to hit and to every amount you roll until your next turn.",
            ),
            spell(
                3,
                "Chain Jail",
                SpellCategory::Stun,
                SpellEffect::Damage {
                    inflicts: Some(StatusKind::Stunned),
                },
                (2, 4),
                DiceSpec::new(1, Die::D6),
                Some(Attribute::Int),
                "Bind the foe in spectral chains; on hit they lose their next turn.",
            ),
            spell(
                4,
                "Cripple",
                SpellCategory::Debuff,
                SpellEffect::Damage {
                    inflicts: Some(StatusKind::DecreasedAttack),
                },
                (1, 3),
                DiceSpec::new(1, Die::D6),
                Some(Attribute::Dex),
                "A hamstringing strike; on hit the foe attacks at -3.",
            ),
            spell(
                5,
                "Sword of Ret'ul",
                SpellCategory::Offensive,
                SpellEffect::Damage { inflicts: None },
                (1, 1),
                DiceSpec::new(1, Die::D8),
                Some(Attribute::Str),
                "A conjured blade strikes true.",
            ),
            spell(
                6,
                "Ice Shards",
                SpellCategory::Offensive,
                SpellEffect::Damage { inflicts: None },
                (1, 1),
                DiceSpec::new(2, Die::D4),
                Some(Attribute::Int),
                "A volley of frozen needles.",
            ),
            spell(
                7,
                "Fireball",
                SpellCategory::Offensive,
                SpellEffect::Damage { inflicts: None },
                (2, 2),
                DiceSpec::new(3, Die::D6),
                Some(Attribute::Int),
                "A roaring sphere of flame.",
            ),
            spell(
                8,
                "Recharge",
                SpellCategory::Utility,
                SpellEffect::Recharge { amount: 1 },
                (0, 3),
                DiceSpec::none(),
                None,
                "Gain 1 AP. Free, and does not count as your utility spell.",
            ),
        ];
        Self { spells }
    }
}

impl Default for Spellbook {
    fn default() -> Self {
        Self::standard()
    }
}

#[allow(clippy::too_many_arguments)]
fn spell(
    id: u32,
    name: &str,
    category: SpellCategory,
    effect: SpellEffect,
    (action_cost, cooldown): (u32, u32),
    dice: DiceSpec,
    modifier: Option<Attribute>,
    description: &str,
) -> Spell {
    Spell {
        id: SpellId(id),
        name: name.to_string(),
        category,
        effect,
        action_cost,
        cooldown,
        dice,
        modifier,
        description: description.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Heal,
    Resilience,
    Foray,
    Recharge,
}

impl Role {
    const ALL: [Role; 4] = [Role::Heal, Role::Resilience, Role::Foray, Role::Recharge];

    fn matches(self, spell: &Spell) -> bool {
        match self {
            Self::Heal => spell.effect == SpellEffect::Heal,
            Self::Resilience => {
                spell.effect
                    == SpellEffect::Grant {
                        status: StatusKind::IncreasedDefence,
                    }
            }
            Self::Foray => {
                spell.effect
                    == SpellEffect::Grant {
                        status: StatusKind::IncreasedAttack,
                    }
            }
            Self::Recharge => spell.is_recharge(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Heal => "heal",
            Self::Resilience => "defence buff",
            Self::Foray => "attack buff",
            Self::Recharge => "recharge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_book_is_valid() {
        let book = Spellbook::standard();
        assert!(book.validate().is_ok());
        assert_eq!(book.len(), 9);
        assert_eq!(book.heal().name, "Heal");
        assert_eq!(book.resilience().name, "Resilience");
        assert_eq!(book.foray().name, "Foray Stance");
        assert_eq!(book.recharge().name, "Recharge");
    }

    #[test]
    fn lookups() {
        let book = Spellbook::standard();
        assert_eq!(book.get(SpellId(7)).map(|s| s.name.as_str()), Some("Fireball"));
        assert!(book.get(SpellId(42)).is_none());
        assert_eq!(book.by_name("chain jail").map(|s| s.id), Some(SpellId(3)));
        assert_eq!(book.at(0).map(|s| s.id), Some(SpellId(0)));
    }

    #[test]
    fn latch_applies_to_utility_except_recharge() {
        let book = Spellbook::standard();
        assert!(book.heal().is_latched_utility());
        assert!(book.resilience().is_latched_utility());
        assert!(!book.recharge().is_latched_utility());
        assert_eq!(book.recharge().effective_cost(), 0);
        let fireball = book.get(SpellId(7)).unwrap();
        assert!(!fireball.is_latched_utility());
        assert_eq!(fireball.effective_cost(), 2);
    }

    #[test]
    fn json_round_trip_keeps_the_book() {
        let book = Spellbook::standard();
        let json = book.to_json().unwrap();
        let back = Spellbook::from_json(&json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn json_defaults_optional_fields() {
        let json = r#"[
            {"id": 0, "name": "Mend", "category": "Utility", "effect": {"kind": "heal"},
             "action_cost": 1, "cooldown": 2, "dice": {"die": "D6", "count": 1}},
            {"id": 1, "name": "Guard", "category": "Utility",
             "effect": {"kind": "grant", "status": "IncreasedDefence"}, "action_cost": 1, "cooldown": 2},
            {"id": 2, "name": "Rage", "category": "Utility",
             "effect": {"kind": "grant", "status": "IncreasedAttack"}, "action_cost": 1, "cooldown": 2},
            {"id": 3, "name": "Focus", "category": "Utility",
             "effect": {"kind": "recharge", "amount": 1}, "action_cost": 0, "cooldown": 3},
            {"id": 4, "name": "Jab", "category": "Offensive",
             "effect": {"kind": "damage"}, "action_cost": 1, "cooldown": 1,
             "dice": {"die": "D4", "count": 1}, "modifier": "Str"}
        ]"#;
        let book = Spellbook::from_json(json).unwrap();
        assert_eq!(book.len(), 5);
        assert_eq!(book.resilience().dice, DiceSpec::none());
        assert_eq!(
            book.by_name("jab").map(|s| s.effect),
            Some(SpellEffect::Damage { inflicts: None })
        );
    }

    #[test]
    fn missing_role_is_rejected() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells.retain(|s| !s.is_recharge());
        let err = Spellbook::new(spells).unwrap_err();
        assert!(err.to_string().contains("recharge"));
    }

    #[test]
    fn zero_cost_attack_is_rejected() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells[5].action_cost = 0;
        assert!(matches!(
            Spellbook::new(spells),
            Err(DuelError::InvalidSpellbook(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells[6].id = SpellId(5);
        assert!(Spellbook::new(spells).is_err());
    }

    #[test]
    fn misdirected_status_is_rejected() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells[3].effect = SpellEffect::Damage {
            inflicts: Some(StatusKind::IncreasedAttack),
        };
        assert!(Spellbook::new(spells).is_err());
    }

    #[test]
    fn category_must_match_effect() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells[5].category = SpellCategory::Utility;
        let err = Spellbook::new(spells).unwrap_err();
        assert!(err.to_string().contains("Sword of Ret'ul"));

        let mut spells = Spellbook::standard().spells().to_vec();
        spells[4].category = SpellCategory::Stun;
        assert!(Spellbook::new(spells).is_err());

        let book = Spellbook::standard();
        assert!(book.spells().iter().all(Spell::category_fits_effect));
    }

    #[test]
    fn oversized_dice_are_rejected() {
        let mut spells = Spellbook::standard().spells().to_vec();
        spells[7].dice = DiceSpec::new(3, Die::Custom(u32::MAX));
        assert!(matches!(
            Spellbook::new(spells),
            Err(DuelError::InvalidSpellbook(_))
        ));

        let mut spells = Spellbook::standard().spells().to_vec();
        spells[7].dice = DiceSpec::new(MAX_COUNT + 1, Die::D6);
        assert!(Spellbook::new(spells).is_err());
    }

    #[test]
    fn garbage_json_is_a_format_error() {
        assert!(matches!(
            Spellbook::from_json("{"),
            Err(DuelError::SpellbookFormat(_))
        ));
    }
}
