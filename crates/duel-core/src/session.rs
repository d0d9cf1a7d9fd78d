//! A match from first roll to last phase.
//!
//! `MatchSession` owns the combatants, the spellbook, the dice, the AI and
//! the phase queue. Hosts drive it two ways: manual sides submit actions
//! with [`MatchSession::request_action`], and presenters pull phases with
//! [`MatchSession::advance`]. AI-controlled sides and stunned turns move on
//! their own, one step each time the queue runs dry.

use std::sync::Arc;
use std::time::Duration;

use crate::ai::EnemyAi;
use crate::combatant::Combatant;
use crate::config::{Control, MatchConfig};
use crate::cooldown::CooldownTracker;
use crate::dice::DiceRoller;
use crate::error::{DuelError, DuelResult};
use crate::events::{BattleEvent, EventLog, EventRecord, EventSink};
use crate::resolver::{self, Resolution};
use crate::side::Side;
use crate::spell::{Spell, SpellId, Spellbook};
use crate::state::BattleState;
use crate::stats::{MatchOutcome, MatchStats, StatsSink};
use crate::turn::{self, MatchStatus, TurnState};

/// A single duel.
pub struct MatchSession {
    state: BattleState,
    spellbook: Arc<Spellbook>,
    config: MatchConfig,
    ai: EnemyAi,
    log: EventLog,
    sinks: Vec<Box<dyn EventSink>>,
    stats_sinks: Vec<Box<dyn StatsSink>>,
    in_flight_until: Option<u64>,
    first_action_taken: bool,
    reroll_used: bool,
    stats_flushed: bool,
}

impl std::fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("turn", &self.state.turn)
            .field("player", &self.state.combatants.player)
            .field("enemy", &self.state.combatants.enemy)
            .field("pending", &self.state.phases.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl MatchSession {
    /// Roll two combatants from the config's seed and open round 1.
    pub fn new(config: MatchConfig, spellbook: Arc<Spellbook>) -> Self {
        let mut dice = DiceRoller::seeded(config.seed);
        let player = Combatant::generate(config.names.player.clone(), &mut dice);
        let enemy = Combatant::generate(config.names.enemy.clone(), &mut dice);
        Self::from_combatants(config, spellbook, player, enemy, dice)
    }

    /// A match with the built-in spellbook.
    pub fn standard(config: MatchConfig) -> Self {
        Self::new(config, Arc::new(Spellbook::standard()))
    }

    /// Open round 1 with prepared combatants and dice.
    pub fn from_combatants(
        config: MatchConfig,
        spellbook: Arc<Spellbook>,
        player: Combatant,
        enemy: Combatant,
        dice: DiceRoller,
    ) -> Self {
        let mut state = BattleState::new(&spellbook, player, enemy, dice);
        turn::begin_turn(&mut state, Side::Player);
        tracing::debug!(
            seed = config.seed,
            player = %state.combatants.player,
            enemy = %state.combatants.enemy,
            "match opened"
        );
        Self {
            state,
            spellbook,
            ai: EnemyAi::new(config.ai),
            log: EventLog::new(config.max_events),
            config,
            sinks: Vec::new(),
            stats_sinks: Vec::new(),
            in_flight_until: None,
            first_action_taken: false,
            reroll_used: false,
            stats_flushed: false,
        }
    }

    /// Register a phase subscriber. Subscribers are called in registration order.
    pub fn subscribe<S: EventSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    /// Register a sink for the end-of-match totals.
    pub fn add_stats_sink<S: StatsSink + 'static>(&mut self, sink: S) {
        self.stats_sinks.push(Box::new(sink));
    }

    /// Cast `spell` for a manually controlled `side`.
    ///
    /// On rejection nothing changes and the specific reason is returned.
    pub fn request_action(&mut self, side: Side, spell: SpellId) -> DuelResult<Resolution> {
        self.check_manual_turn(side)?;

        let book = Arc::clone(&self.spellbook);
        let spell = book.get(spell).ok_or(DuelError::UnknownSpellId(spell))?;
        let cooldowns = self.state.cooldowns.get(side);
        if cooldowns.is_on_cooldown(spell.id) {
            return Err(DuelError::SpellOnCooldown {
                spell: spell.id,
                remaining: cooldowns.remaining(spell.id),
            });
        }
        let available = self.state.combatant(side).current_ap;
        if available < spell.effective_cost() {
            return Err(DuelError::InsufficientActionPoints {
                needed: spell.effective_cost(),
                available,
            });
        }
        if spell.is_latched_utility() && self.state.effects.utility_used(side) {
            return Err(DuelError::UtilityAlreadyUsed);
        }

        Ok(self.commit(side, spell))
    }

    /// End a manually controlled side's turn early.
    pub fn end_turn(&mut self, side: Side) -> DuelResult<()> {
        self.check_manual_turn(side)?;
        tracing::debug!(%side, "turn ended by request");
        turn::pass_turn(&mut self.state);
        Ok(())
    }

    /// Regenerate both combatants. Allowed once, before anyone has acted.
    pub fn request_reroll(&mut self) -> DuelResult<()> {
        if !self.state.in_progress() {
            return Err(DuelError::MatchAlreadyEnded);
        }
        if self.reroll_used || self.first_action_taken {
            return Err(DuelError::RerollUnavailable);
        }
        let dice = &mut self.state.dice;
        let player = Combatant::generate(self.config.names.player.clone(), dice);
        let enemy = Combatant::generate(self.config.names.enemy.clone(), dice);
        self.state.combatants.player = player;
        self.state.combatants.enemy = enemy;
        self.reroll_used = true;
        tracing::debug!(
            player = %self.state.combatants.player,
            enemy = %self.state.combatants.enemy,
            "combatants rerolled"
        );
        self.state.emit(BattleEvent::CombatantsRerolled);
        Ok(())
    }

    /// Pull the next phase.
    ///
    /// When nothing is queued, lets the match move on by itself first: a
    /// stunned turn is passed, or an AI side takes one action. Returns
    /// `None` when the match is over or waiting for a manual side.
    pub fn advance(&mut self) -> Option<EventRecord> {
        if self.state.phases.is_empty() {
            self.step_automation();
        }
        let record = self.state.phases.pop()?;
        if self.in_flight_until.is_some_and(|last| record.seq >= last) {
            self.in_flight_until = None;
        }
        for sink in &mut self.sinks {
            sink.on_event(&record);
        }
        if matches!(record.event, BattleEvent::MatchEnded { .. }) {
            self.flush_stats();
        }
        self.log.push(record.clone());
        Some(record)
    }

    /// Pull phases until the match ends or needs manual input.
    pub fn run_until_input(&mut self) -> Vec<EventRecord> {
        std::iter::from_fn(|| self.advance()).collect()
    }

    /// Like [`run_until_input`](Self::run_until_input), but also stops once
    /// `max_round` is exceeded. Returns the number of phases pulled.
    pub fn run_rounds(&mut self, max_round: u32) -> usize {
        let mut pulled = 0;
        while self.state.turn.round <= max_round {
            if self.advance().is_none() {
                break;
            }
            pulled += 1;
        }
        pulled
    }

    /// Count wall-clock time towards the match duration.
    ///
    /// Time keeps counting until the `MatchEnded` phase has been pulled,
    /// when the totals go to the stats sinks.
    pub fn elapse(&mut self, elapsed: Duration) {
        if !self.stats_flushed {
            self.state.stats.duration_seconds += elapsed.as_secs_f64();
        }
    }

    /// One combatant.
    pub fn combatant(&self, side: Side) -> &Combatant {
        self.state.combatant(side)
    }

    /// One side's cooldowns.
    pub fn cooldowns(&self, side: Side) -> &CooldownTracker {
        self.state.cooldowns.get(side)
    }

    /// Turn, round, and outcome.
    pub fn turn(&self) -> &TurnState {
        &self.state.turn
    }

    /// The side whose turn it is.
    pub fn current_side(&self) -> Side {
        self.state.turn.current
    }

    /// The current round.
    pub fn round(&self) -> u32 {
        self.state.turn.round
    }

    /// Match outcome so far.
    pub fn status(&self) -> MatchStatus {
        self.state.turn.status
    }

    /// The winner, once decided.
    pub fn winner(&self) -> Option<Side> {
        self.state.turn.status.winner()
    }

    /// Whether `side` already used its utility effect this turn.
    pub fn utility_used(&self, side: Side) -> bool {
        self.state.effects.utility_used(side)
    }

    /// Totals so far.
    pub fn stats(&self) -> &MatchStats {
        &self.state.stats
    }

    /// Phases presented so far.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The spellbook in play.
    pub fn spellbook(&self) -> &Arc<Spellbook> {
        &self.spellbook
    }

    /// The configuration the match was opened with.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Phases queued but not yet pulled.
    pub fn pending_phases(&self) -> usize {
        self.state.phases.len()
    }

    /// True while a cast still has phases waiting.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight_until.is_some()
    }

    /// True when only a manual action (or end of turn) can move the match on.
    pub fn is_waiting_for_input(&self) -> bool {
        self.state.in_progress()
            && self.state.phases.is_empty()
            && !self.state.turn.skip_pending
            && self.control(self.state.turn.current) == Control::Manual
    }

    fn control(&self, side: Side) -> Control {
        *self.config.control.get(side)
    }

    fn check_manual_turn(&self, side: Side) -> DuelResult<()> {
        if !self.state.in_progress() {
            return Err(DuelError::MatchAlreadyEnded);
        }
        if self.is_in_flight() {
            return Err(DuelError::ActionInFlight);
        }
        if self.control(side) == Control::Ai {
            return Err(DuelError::AutomatedSide(side));
        }
        if self.state.turn.current != side || self.state.turn.skip_pending {
            return Err(DuelError::NotYourTurn(side));
        }
        Ok(())
    }

    fn commit(&mut self, side: Side, spell: &Spell) -> Resolution {
        let resolution = resolver::resolve_spell(&mut self.state, spell, side);
        self.in_flight_until = self.state.phases.last_seq();
        self.first_action_taken = true;
        let limit = (self.control(side) == Control::Ai).then_some(self.config.max_actions_per_turn);
        turn::after_resolution(&mut self.state, side, limit);
        resolution
    }

    fn step_automation(&mut self) {
        if !self.state.in_progress() {
            return;
        }
        if self.state.turn.skip_pending {
            turn::pass_turn(&mut self.state);
            return;
        }
        let side = self.state.turn.current;
        if self.control(side) != Control::Ai {
            return;
        }
        if self.state.combatant(side).current_ap == 0 {
            turn::pass_turn(&mut self.state);
            return;
        }

        let choice = {
            let (view, dice) = self.state.ai_view_and_dice(side);
            self.ai.choose_spell(&view, &self.spellbook, dice)
        };
        if choice.is_degraded() {
            self.state.emit(BattleEvent::PolicyDegraded {
                side,
                rejected_draws: choice.rejected_draws,
            });
        }
        let book = Arc::clone(&self.spellbook);
        let spell = book.get(choice.spell).unwrap_or_else(|| book.resilience());
        self.commit(side, spell);
    }

    fn flush_stats(&mut self) {
        if self.stats_flushed {
            return;
        }
        let Some(winner) = self.state.turn.status.winner() else {
            return;
        };
        let outcome = MatchOutcome::for_winner(winner);
        for sink in &mut self.stats_sinks {
            sink.record_match(outcome, &self.state.stats);
        }
        self.stats_flushed = true;
    }
}
