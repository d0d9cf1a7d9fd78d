//! The phased event stream a match produces.
//!
//! Resolving an action commits all state changes at once and queues the
//! phases describing it. Presenters pull phases one at a time and pace
//! them however they like; subscribers see each phase as it is pulled.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::dice::DiceSpec;
use crate::side::Side;
use crate::spell::SpellId;
use crate::status::StatusKind;

/// Something that happened in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A side's turn began.
    TurnChanged {
        /// Whose turn it is now.
        side: Side,
        /// The current round.
        round: u32,
    },
    /// A side committed to a spell.
    ActionAnnounced {
        /// The caster.
        side: Side,
        /// The spell cast.
        spell: SpellId,
    },
    /// The attack die was rolled.
    RollRevealed {
        /// The face that came up.
        value: u32,
        /// The caster's attribute modifier.
        modifier: i32,
        /// The to-hit total after floors and buffs.
        total: i32,
        /// A natural 20.
        is_critical: bool,
    },
    /// The attack was compared against the target's defence.
    HitResolved {
        /// Whether the attack landed.
        success: bool,
        /// What the total had to reach; `None` on a critical.
        threshold: Option<i32>,
    },
    /// The damage or healing dice were rolled.
    AmountRolled {
        /// What was rolled.
        dice: DiceSpec,
        /// Sum of the dice, after critical doubling.
        subtotal: u32,
        /// The amount that will be applied.
        total: u32,
        /// Whether the subtotal was doubled.
        critical: bool,
    },
    /// A combatant lost HP.
    DamageApplied {
        /// Who was hit.
        target: Side,
        /// HP removed.
        amount: u32,
    },
    /// A combatant regained HP.
    HealApplied {
        /// Who was healed.
        target: Side,
        /// HP restored, after the max-HP cap.
        amount: u32,
    },
    /// A status flag was set or cleared.
    StatusChanged {
        /// The holder of the flag.
        target: Side,
        /// Which flag.
        kind: StatusKind,
        /// Its new value.
        enabled: bool,
    },
    /// A combatant's AP changed.
    ActionPointsChanged {
        /// Whose AP.
        side: Side,
        /// The new value.
        current: u32,
    },
    /// A cooldown counted down at turn start.
    CooldownTicked {
        /// The side owning the cooldown.
        side: Side,
        /// The spell.
        spell: SpellId,
        /// Turns left.
        remaining: u32,
    },
    /// A stunned side loses its turn.
    TurnSkipped {
        /// The stunned side.
        side: Side,
    },
    /// An action finished resolving.
    ResolutionComplete {
        /// The caster.
        side: Side,
        /// The spell cast.
        spell: SpellId,
    },
    /// The AI gave up searching and fell back to its default spell.
    PolicyDegraded {
        /// The AI-controlled side.
        side: Side,
        /// How many draws were rejected.
        rejected_draws: u32,
    },
    /// Both combatants were regenerated before the first action.
    CombatantsRerolled,
    /// The match is decided.
    MatchEnded {
        /// The surviving side.
        winner: Side,
    },
}

impl BattleEvent {
    /// Check whether a side is involved in this event.
    pub fn involves(&self, who: Side) -> bool {
        match self {
            Self::TurnChanged { side, .. }
            | Self::ActionAnnounced { side, .. }
            | Self::ActionPointsChanged { side, .. }
            | Self::CooldownTicked { side, .. }
            | Self::TurnSkipped { side }
            | Self::ResolutionComplete { side, .. }
            | Self::PolicyDegraded { side, .. } => *side == who,
            Self::DamageApplied { target, .. }
            | Self::HealApplied { target, .. }
            | Self::StatusChanged { target, .. } => *target == who,
            Self::MatchEnded { .. } | Self::CombatantsRerolled => true,
            Self::RollRevealed { .. } | Self::HitResolved { .. } | Self::AmountRolled { .. } => {
                false
            }
        }
    }
}

/// An event stamped with its position in the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic sequence number, starting at 0.
    pub seq: u64,
    /// The round the event happened in.
    pub round: u32,
    /// What happened.
    pub event: BattleEvent,
}

/// Receives every phase as it is pulled from a match.
pub trait EventSink: Send {
    /// Called once per phase, in order.
    fn on_event(&mut self, record: &EventRecord);
}

impl<F> EventSink for F
where
    F: FnMut(&EventRecord) + Send,
{
    fn on_event(&mut self, record: &EventRecord) {
        self(record)
    }
}

/// Phases committed but not yet presented.
#[derive(Debug, Default)]
pub struct PhaseQueue {
    pending: VecDeque<EventRecord>,
    next_seq: u64,
}

impl PhaseQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for `round`.
    pub fn emit(&mut self, round: u32, event: BattleEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push_back(EventRecord { seq, round, event });
    }

    /// Sequence number of the most recently queued phase.
    pub fn last_seq(&self) -> Option<u64> {
        self.next_seq.checked_sub(1)
    }

    /// Take the oldest queued phase.
    pub fn pop(&mut self) -> Option<EventRecord> {
        self.pending.pop_front()
    }

    /// Look at the queued phases without taking them.
    pub fn pending(&self) -> impl Iterator<Item = &EventRecord> {
        self.pending.iter()
    }

    /// Number of queued phases.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Keeps the phases a match has presented.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<EventRecord>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append a record, dropping the oldest if the log exceeds its capacity.
    pub fn push(&mut self, record: EventRecord) {
        self.events.push(record);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Return all events from the given round.
    pub fn events_in_round(&self, round: u32) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.round == round).collect()
    }

    /// Return all events involving the given side.
    pub fn events_for_side(&self, side: Side) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.event.involves(side)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seq: u64, round: u32, event: BattleEvent) -> EventRecord {
        EventRecord { seq, round, event }
    }

    #[test]
    fn queue_stamps_sequence_numbers() {
        let mut queue = PhaseQueue::new();
        queue.emit(1, BattleEvent::CombatantsRerolled);
        queue.emit(2, BattleEvent::TurnSkipped { side: Side::Enemy });
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.last_seq(), Some(1));
        let first = queue.pop().unwrap();
        assert_eq!((first.seq, first.round), (0, 1));
        let second = queue.pop().unwrap();
        assert_eq!((second.seq, second.round), (1, 2));
        assert!(queue.is_empty());
    }

    #[test]
    fn log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(record(i, 1, BattleEvent::CombatantsRerolled));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].seq, 3);
        assert_eq!(log.events()[1].seq, 4);
    }

    #[test]
    fn log_queries_by_round_and_side() {
        let mut log = EventLog::new(0);
        log.push(record(
            0,
            1,
            BattleEvent::TurnChanged {
                side: Side::Player,
                round: 1,
            },
        ));
        log.push(record(
            1,
            1,
            BattleEvent::DamageApplied {
                target: Side::Enemy,
                amount: 4,
            },
        ));
        log.push(record(
            2,
            2,
            BattleEvent::TurnChanged {
                side: Side::Player,
                round: 2,
            },
        ));
        assert_eq!(log.events_in_round(1).len(), 2);
        assert_eq!(log.events_for_side(Side::Player).len(), 2);
        assert_eq!(log.events_for_side(Side::Enemy).len(), 1);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn involvement() {
        let hit = BattleEvent::HitResolved {
            success: true,
            threshold: Some(12),
        };
        assert!(!hit.involves(Side::Player));
        let end = BattleEvent::MatchEnded {
            winner: Side::Enemy,
        };
        assert!(end.involves(Side::Player));
        let status = BattleEvent::StatusChanged {
            target: Side::Enemy,
            kind: StatusKind::Stunned,
            enabled: true,
        };
        assert!(status.involves(Side::Enemy));
        assert!(!status.involves(Side::Player));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: &EventRecord| seen.push(r.seq);
            sink.on_event(&record(9, 1, BattleEvent::CombatantsRerolled));
        }
        assert_eq!(seen, vec![9]);
    }
}
