//! Random draws behind every roll in a match.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DiceSpec, Die};

/// A source of uniform integer draws.
///
/// Implementations must return a value in `low..=high`.
pub trait RollSource: std::fmt::Debug + Send {
    /// Draw one value uniformly from the inclusive range.
    fn next_in(&mut self, low: u32, high: u32) -> u32;
}

impl RollSource for StdRng {
    fn next_in(&mut self, low: u32, high: u32) -> u32 {
        self.random_range(low..=high)
    }
}

/// A fixed sequence of draws, replayed in order.
///
/// Values are clamped into the requested range. Once the script runs
/// out every draw returns the range's low end.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    values: VecDeque<u32>,
}

impl ScriptedRolls {
    /// Create a script from the given values.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Draws left in the script.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RollSource for ScriptedRolls {
    fn next_in(&mut self, low: u32, high: u32) -> u32 {
        self.values
            .pop_front()
            .map_or(low, |v| v.clamp(low, high))
    }
}

/// The outcome of the distinguished attack die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D20Roll {
    /// The face that came up.
    pub value: u32,
    /// True on a natural 20.
    pub critical: bool,
}

/// Rolls dice for one match.
#[derive(Debug)]
pub struct DiceRoller {
    source: Box<dyn RollSource>,
}

impl DiceRoller {
    /// A roller backed by a seeded [`StdRng`].
    pub fn seeded(seed: u64) -> Self {
        Self::from_source(StdRng::seed_from_u64(seed))
    }

    /// A roller that replays a fixed list of draws.
    pub fn scripted(values: impl IntoIterator<Item = u32>) -> Self {
        Self::from_source(ScriptedRolls::new(values))
    }

    /// A roller backed by any draw source.
    pub fn from_source(source: impl RollSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Roll `count` dice of the given kind and return each face.
    ///
    /// Dice with zero sides roll nothing and consume no draws.
    pub fn roll_each(&mut self, die: Die, count: u32) -> Vec<u32> {
        let sides = die.sides();
        if sides == 0 {
            return Vec::new();
        }
        (0..count).map(|_| self.source.next_in(1, sides)).collect()
    }

    /// Sum of `count` dice of the given kind, saturating at `u32::MAX`.
    pub fn roll(&mut self, die: Die, count: u32) -> u32 {
        self.roll_each(die, count)
            .into_iter()
            .fold(0, u32::saturating_add)
    }

    /// Sum of a spell's dice.
    pub fn roll_spec(&mut self, spec: DiceSpec) -> u32 {
        self.roll(spec.die, spec.count)
    }

    /// Roll the attack die.
    pub fn roll_d20(&mut self) -> D20Roll {
        let value = self.source.next_in(1, 20);
        D20Roll {
            value,
            critical: value == 20,
        }
    }

    /// A uniform draw from `low..=high`.
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.source.next_in(low, high)
    }

    /// A uniform index into a collection of `len` items.
    pub fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let high = u32::try_from(len - 1).unwrap_or(u32::MAX);
        self.source.next_in(0, high) as usize
    }

    /// Four d6, dropping one lowest die.
    pub fn generate_attribute_score(&mut self) -> u32 {
        let faces = self.roll_each(Die::D6, 4);
        let lowest = faces.iter().copied().min().unwrap_or(0);
        faces.iter().sum::<u32>() - lowest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rolls_are_reproducible() {
        let mut a = DiceRoller::seeded(42);
        let mut b = DiceRoller::seeded(42);
        let ra: Vec<u32> = (0..20).map(|_| a.roll(Die::D20, 1)).collect();
        let rb: Vec<u32> = (0..20).map(|_| b.roll(Die::D20, 1)).collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn zero_sided_die_is_a_no_op() {
        let mut dice = DiceRoller::scripted([5, 5]);
        assert_eq!(dice.roll(Die::D0, 3), 0);
        // Nothing was consumed.
        assert_eq!(dice.roll(Die::D6, 2), 10);
    }

    #[test]
    fn huge_faces_saturate_instead_of_overflowing() {
        let mut dice = DiceRoller::scripted([u32::MAX, u32::MAX]);
        assert_eq!(dice.roll(Die::Custom(u32::MAX), 2), u32::MAX);
    }

    #[test]
    fn sums_scripted_faces() {
        let mut dice = DiceRoller::scripted([3, 4, 6]);
        assert_eq!(dice.roll(Die::D6, 3), 13);
    }

    #[test]
    fn scripted_values_are_clamped() {
        let mut dice = DiceRoller::scripted([99, 0]);
        assert_eq!(dice.roll(Die::D8, 1), 8);
        assert_eq!(dice.roll(Die::D8, 1), 1);
        // Exhausted script falls back to the low end.
        assert_eq!(dice.roll(Die::D8, 1), 1);
    }

    #[test]
    fn natural_twenty_is_critical() {
        let mut dice = DiceRoller::scripted([20, 19]);
        assert_eq!(
            dice.roll_d20(),
            D20Roll {
                value: 20,
                critical: true
            }
        );
        assert!(!dice.roll_d20().critical);
    }

    #[test]
    fn attribute_drops_one_lowest() {
        let mut dice = DiceRoller::scripted([2, 5, 2, 6]);
        assert_eq!(dice.generate_attribute_score(), 13);
        let mut dice = DiceRoller::scripted([1, 1, 1, 1]);
        assert_eq!(dice.generate_attribute_score(), 3);
    }

    #[test]
    fn pick_stays_in_bounds() {
        let mut dice = DiceRoller::seeded(7);
        for _ in 0..200 {
            assert!(dice.pick(9) < 9);
        }
        assert_eq!(dice.pick(0), 0);
    }

    #[test]
    fn range_is_inclusive() {
        let mut dice = DiceRoller::scripted([11, 18]);
        assert_eq!(dice.range(11, 18), 11);
        assert_eq!(dice.range(11, 18), 18);
    }
}
