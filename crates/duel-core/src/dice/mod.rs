//! Dice types, dice specs, and rolling.
//!
//! Supports the polyhedral dice a spell can name (d4 through d20), the
//! "no dice" placeholder `D0`, and custom dice. Rolling goes through a
//! [`RollSource`] so matches can be driven by a seeded RNG or by a fixed
//! script of draws.

pub mod roller;

pub use roller::{D20Roll, DiceRoller, RollSource, ScriptedRolls};

use serde::{Deserialize, Serialize};

/// Most sides a die may have.
pub const MAX_SIDES: u32 = 1000;
/// Most dice a single spec may roll.
pub const MAX_COUNT: u32 = 1000;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// No die; always rolls 0.
    D0,
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D0 => 0,
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::Custom(n) => n,
        }
    }

    /// Parse a die from a string like "d20", "d6", "d0".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "d0" => Some(Self::D0),
            "d4" => Some(Self::D4),
            "d6" => Some(Self::D6),
            "d8" => Some(Self::D8),
            "d10" => Some(Self::D10),
            "d12" => Some(Self::D12),
            "d20" => Some(Self::D20),
            other => {
                let num = other.strip_prefix('d')?.parse::<u32>().ok()?;
                if (2..=MAX_SIDES).contains(&num) {
                    Some(Self::Custom(num))
                } else {
                    None
                }
            }
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// How many of which die a spell rolls for its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpec {
    /// The die to roll.
    pub die: Die,
    /// How many times to roll it.
    pub count: u32,
}

impl DiceSpec {
    /// Create a spec for `count` rolls of `die`.
    pub fn new(count: u32, die: Die) -> Self {
        Self { die, count }
    }

    /// A spec that never rolls anything.
    pub fn none() -> Self {
        Self {
            die: Die::D0,
            count: 0,
        }
    }

    /// True when rolling this spec always yields 0.
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.die == Die::D0
    }

    /// True when the spec stays within [`MAX_COUNT`] dice of at most
    /// [`MAX_SIDES`] sides.
    pub fn within_limits(&self) -> bool {
        self.count <= MAX_COUNT && self.die.sides() <= MAX_SIDES
    }

    /// Parse `NdM` notation such as "2d8" or "d20" (count defaults to 1).
    /// Specs outside the dice limits are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let idx = s.find('d')?;
        let (count, die) = s.split_at(idx);
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().ok()?
        };
        let spec = Self::new(count, Die::from_str_tag(die)?);
        spec.within_limits().then_some(spec)
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}{}", self.count, self.die)
        }
    }
}
