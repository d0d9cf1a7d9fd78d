//! The six attributes and their modifiers.

use serde::{Deserialize, Serialize};

use crate::dice::DiceRoller;

/// One of the six ability attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Strength.
    Str,
    /// Dexterity.
    Dex,
    /// Constitution.
    Con,
    /// Intelligence.
    Int,
    /// Wisdom.
    Wis,
    /// Charisma.
    Cha,
}

impl Attribute {
    /// All attributes in generation order.
    pub const ALL: [Attribute; 6] = [
        Attribute::Str,
        Attribute::Dex,
        Attribute::Con,
        Attribute::Int,
        Attribute::Wis,
        Attribute::Cha,
    ];

    fn index(self) -> usize {
        match self {
            Self::Str => 0,
            Self::Dex => 1,
            Self::Con => 2,
            Self::Int => 3,
            Self::Wis => 4,
            Self::Cha => 5,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        };
        write!(f, "{name}")
    }
}

/// `floor((score - 10) / 2)`.
pub fn modifier_for(score: u32) -> i32 {
    (score as i32 - 10).div_euclid(2)
}

/// A full set of attribute scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    scores: [u32; 6],
}

impl Attributes {
    /// Build from explicit scores in [`Attribute::ALL`] order.
    pub fn new(scores: [u32; 6]) -> Self {
        Self { scores }
    }

    /// Roll all six scores, strength first.
    pub fn generate(dice: &mut DiceRoller) -> Self {
        let mut scores = [0; 6];
        for score in &mut scores {
            *score = dice.generate_attribute_score();
        }
        Self { scores }
    }

    /// The raw score.
    pub fn score(&self, attribute: Attribute) -> u32 {
        self.scores[attribute.index()]
    }

    /// The derived modifier.
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        modifier_for(self.score(attribute))
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self { scores: [10; 6] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_floors_toward_negative() {
        assert_eq!(modifier_for(10), 0);
        assert_eq!(modifier_for(11), 0);
        assert_eq!(modifier_for(12), 1);
        assert_eq!(modifier_for(18), 4);
        assert_eq!(modifier_for(9), -1);
        assert_eq!(modifier_for(8), -1);
        assert_eq!(modifier_for(3), -4);
    }

    #[test]
    fn generate_reads_in_order() {
        // Strength gets the first four draws, dexterity the next four.
        let mut draws = vec![6, 6, 6, 1, 1, 1, 1, 1];
        draws.extend(std::iter::repeat_n(3, 16));
        let mut dice = DiceRoller::scripted(draws);
        let attrs = Attributes::generate(&mut dice);
        assert_eq!(attrs.score(Attribute::Str), 18);
        assert_eq!(attrs.score(Attribute::Dex), 3);
        assert_eq!(attrs.score(Attribute::Cha), 9);
        assert_eq!(attrs.modifier(Attribute::Str), 4);
        assert_eq!(attrs.modifier(Attribute::Dex), -4);
    }

    #[test]
    fn display_is_short_name() {
        assert_eq!(Attribute::Wis.to_string(), "WIS");
    }
}
