//! Turn-based two-combatant spell duel engine.
//!
//! Provides dice rolling, combatant generation, a spellbook of immutable
//! spell records, per-spell cooldowns, buff and debuff tracking, an attack
//! and amount resolver, a bounded-search AI, and a turn state machine.
//! [`MatchSession`] ties them together and exposes the match as a stream
//! of presentation phases. The engine does no I/O: given the same seed and
//! the same requests it replays the same match.

pub mod ai;
pub mod attributes;
pub mod combatant;
pub mod config;
pub mod cooldown;
pub mod dice;
pub mod error;
pub mod events;
pub mod resolver;
pub mod session;
pub mod side;
pub mod spell;
pub mod state;
pub mod stats;
pub mod status;
pub mod turn;

pub use ai::{AiChoice, ChoiceReason, EnemyAi};
pub use attributes::{Attribute, Attributes};
pub use combatant::{ApChange, Combatant};
pub use config::{AiConfig, Control, MatchConfig};
pub use cooldown::{CooldownEntry, CooldownTracker};
pub use dice::{DiceRoller, DiceSpec, Die, RollSource, ScriptedRolls};
pub use error::{DuelError, DuelResult};
pub use events::{BattleEvent, EventLog, EventRecord, EventSink};
pub use resolver::{Outcome, Resolution};
pub use session::MatchSession;
pub use side::{PerSide, Side};
pub use spell::{Spell, SpellCategory, SpellEffect, SpellId, Spellbook};
pub use stats::{CareerStats, MatchOutcome, MatchStats, StatsSink};
pub use status::{StatusFlags, StatusKind};
pub use turn::{MatchStatus, TurnState};
