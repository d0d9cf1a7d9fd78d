//! The turn state machine.
//!
//! The player opens every round. A turn ends when its side runs out of AP
//! (or, for the AI, hits its per-turn action guard, or for a manual side,
//! chooses to end it). A stunned side's turn begins as usual and is then
//! passed straight to the opponent.

use serde::{Deserialize, Serialize};

use crate::events::BattleEvent;
use crate::side::Side;
use crate::state::BattleState;
use crate::status::StatusEffects;

/// Whether the match is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Nobody has fallen yet.
    InProgress,
    /// The enemy fell.
    PlayerWon,
    /// The player fell.
    EnemyWon,
}

impl MatchStatus {
    /// The terminal status for a winner.
    pub fn won_by(winner: Side) -> Self {
        match winner {
            Side::Player => Self::PlayerWon,
            Side::Enemy => Self::EnemyWon,
        }
    }

    /// The winner, once there is one.
    pub fn winner(self) -> Option<Side> {
        match self {
            Self::InProgress => None,
            Self::PlayerWon => Some(Side::Player),
            Self::EnemyWon => Some(Side::Enemy),
        }
    }
}

/// Whose turn it is and how far the match has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// The side whose turn it is.
    pub current: Side,
    /// Rounds started so far; a round starts with each player turn.
    pub round: u32,
    /// Match outcome.
    pub status: MatchStatus,
    /// The current side is stunned and its turn will be passed on.
    pub skip_pending: bool,
    /// Actions resolved in the current turn.
    pub actions_this_turn: u32,
}

impl TurnState {
    /// Before the first turn.
    pub fn new() -> Self {
        Self {
            current: Side::Player,
            round: 0,
            status: MatchStatus::InProgress,
            skip_pending: false,
            actions_this_turn: 0,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

/// Start `side`'s turn.
///
/// A player turn opens a new round and refills both sides' AP. Every turn
/// then clears the statuses `side` authored, reopens its utility latch and
/// ticks its cooldowns. A stunned side is flagged to be skipped.
pub fn begin_turn(state: &mut BattleState, side: Side) {
    if !state.in_progress() {
        return;
    }

    state.turn.current = side;
    state.turn.actions_this_turn = 0;
    state.turn.skip_pending = false;
    if side == Side::Player {
        state.turn.round += 1;
    }
    let round = state.turn.round;
    state.emit(BattleEvent::TurnChanged { side, round });
    tracing::info!(%side, round, "turn started");

    if side == Side::Player {
        for each in Side::BOTH {
            let combatant = state.combatants.get_mut(each);
            combatant.reset_ap();
            let current = combatant.current_ap;
            state.emit(BattleEvent::ActionPointsChanged {
                side: each,
                current,
            });
        }
    }

    let cleared = StatusEffects::clear_authored_by(side, &mut state.combatants);
    state.emit_all(cleared);
    state.effects.reset_latch(side);

    let ticked = state.cooldowns.get_mut(side).tick_all();
    for (spell, remaining) in ticked {
        state.emit(BattleEvent::CooldownTicked {
            side,
            spell,
            remaining,
        });
    }

    if state.combatant(side).status.stunned {
        state.turn.skip_pending = true;
        tracing::debug!(%side, "stunned, turn will be skipped");
        state.emit(BattleEvent::TurnSkipped { side });
    }
}

/// Re-check the turn after `actor` resolved an action.
///
/// Passes the turn when the actor is out of AP or has used `action_limit`
/// actions. Returns true if the turn changed hands.
pub fn after_resolution(state: &mut BattleState, actor: Side, action_limit: Option<u32>) -> bool {
    if !state.in_progress() || state.turn.current != actor {
        return false;
    }
    state.turn.actions_this_turn += 1;
    let exhausted = state.combatant(actor).current_ap == 0;
    let capped = action_limit.is_some_and(|limit| state.turn.actions_this_turn >= limit);
    if exhausted || capped {
        if capped && !exhausted {
            tracing::debug!(%actor, "per-turn action guard reached");
        }
        begin_turn(state, actor.opponent());
        return true;
    }
    false
}

/// Hand the turn to the opponent.
pub fn pass_turn(state: &mut BattleState) {
    let next = state.turn.current.opponent();
    begin_turn(state, next);
}
