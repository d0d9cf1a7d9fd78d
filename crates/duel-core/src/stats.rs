//! Per-match totals and lifetime records.
//!
//! Totals are counted from the player's point of view: damage the player
//! dealt, damage the player took, and healing the player received.

use serde::{Deserialize, Serialize};

use crate::side::Side;

/// Running totals for the current match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Damage the player dealt to the enemy.
    pub damage_dealt: u64,
    /// Damage the enemy dealt to the player.
    pub damage_taken: u64,
    /// HP the player restored.
    pub damage_healed: u64,
    /// Time spent in the match, as reported by the host clock.
    pub duration_seconds: f64,
}

impl MatchStats {
    /// Record damage landed on `target`.
    pub fn record_damage(&mut self, target: Side, amount: u32) {
        match target {
            Side::Enemy => self.damage_dealt += u64::from(amount),
            Side::Player => self.damage_taken += u64::from(amount),
        }
    }

    /// Record healing received by `target`.
    pub fn record_heal(&mut self, target: Side, amount: u32) {
        if target == Side::Player {
            self.damage_healed += u64::from(amount);
        }
    }
}

/// How a finished match went for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The enemy fell.
    Won,
    /// The player fell.
    Lost,
}

impl MatchOutcome {
    /// The outcome for the player given the winning side.
    pub fn for_winner(winner: Side) -> Self {
        match winner {
            Side::Player => Self::Won,
            Side::Enemy => Self::Lost,
        }
    }
}

/// Receives the totals of every finished match.
pub trait StatsSink: Send {
    /// Called exactly once per match, when it ends.
    fn record_match(&mut self, outcome: MatchOutcome, stats: &MatchStats);
}

/// Lifetime records across matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
    /// The shortest finished match, won or lost, in seconds.
    pub best_time: Option<f64>,
    /// Damage dealt over all matches.
    pub lifetime_damage_dealt: u64,
    /// Damage taken over all matches.
    pub lifetime_damage_taken: u64,
    /// Healing over all matches.
    pub lifetime_damage_healed: u64,
    /// Time spent in matches.
    pub total_time_seconds: f64,
}

impl CareerStats {
    /// Matches played.
    pub fn matches(&self) -> u32 {
        self.wins + self.losses
    }

    /// Wins per loss; equal to the win count while unbeaten.
    pub fn win_loss_ratio(&self) -> f64 {
        if self.losses == 0 {
            f64::from(self.wins)
        } else {
            f64::from(self.wins) / f64::from(self.losses)
        }
    }
}

impl StatsSink for CareerStats {
    fn record_match(&mut self, outcome: MatchOutcome, stats: &MatchStats) {
        match outcome {
            MatchOutcome::Won => self.wins += 1,
            MatchOutcome::Lost => self.losses += 1,
        }
        let best = self
            .best_time
            .map_or(stats.duration_seconds, |b| b.min(stats.duration_seconds));
        self.best_time = Some(best);
        self.lifetime_damage_dealt += stats.damage_dealt;
        self.lifetime_damage_taken += stats.damage_taken;
        self.lifetime_damage_healed += stats.damage_healed;
        self.total_time_seconds += stats.duration_seconds;
    }
}

impl<T: StatsSink + ?Sized> StatsSink for std::sync::Arc<std::sync::Mutex<T>> {
    fn record_match(&mut self, outcome: MatchOutcome, stats: &MatchStats) {
        if let Ok(mut inner) = self.lock() {
            inner.record_match(outcome, stats);
        }
    }
}
