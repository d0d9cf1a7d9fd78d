//! Configuration for a duel match.

use crate::side::{PerSide, Side};

/// Who drives a side's decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Actions arrive through [`crate::MatchSession::request_action`].
    Manual,
    /// The built-in AI picks actions.
    Ai,
}

/// Tuning for the AI's spell search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiConfig {
    /// Rejected draws before falling back to the defence buff.
    pub max_rejections: u32,
    /// At or below this fraction of max HP, heal when possible.
    pub heal_below: f64,
    /// At or above this fraction of max HP, never heal.
    pub no_heal_above: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_rejections: 39,
            heal_below: 0.5,
            no_heal_above: 0.75,
        }
    }
}

/// Configuration for a match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// RNG seed for reproducible matches.
    pub seed: u64,
    /// Combatant names.
    pub names: PerSide<String>,
    /// Who controls each side.
    pub control: PerSide<Control>,
    /// AI search tuning.
    pub ai: AiConfig,
    /// Actions an AI side may take in one turn before it is ended for it.
    pub max_actions_per_turn: u32,
    /// Presented phases kept in the log (0 = unlimited).
    pub max_events: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            names: PerSide::new("Player".to_string(), "Enemy".to_string()),
            control: PerSide::new(Control::Manual, Control::Ai),
            ai: AiConfig::default(),
            max_actions_per_turn: 16,
            max_events: 0,
        }
    }
}

impl MatchConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set a combatant's name.
    pub fn with_name(mut self, side: Side, name: impl Into<String>) -> Self {
        *self.names.get_mut(side) = name.into();
        self
    }

    /// Set who controls a side.
    pub fn with_control(mut self, side: Side, control: Control) -> Self {
        *self.control.get_mut(side) = control;
        self
    }

    /// Put both sides under AI control.
    pub fn ai_vs_ai(self) -> Self {
        self.with_control(Side::Player, Control::Ai)
            .with_control(Side::Enemy, Control::Ai)
    }

    /// Set the AI tuning.
    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    /// Set the per-turn action guard (at least 1).
    pub fn with_max_actions_per_turn(mut self, max: u32) -> Self {
        self.max_actions_per_turn = max.max(1);
        self
    }

    /// Set the maximum number of logged phases (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
