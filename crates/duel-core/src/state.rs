//! Everything a match mutates, in one place.

use crate::ai::AiView;
use crate::combatant::Combatant;
use crate::cooldown::CooldownTracker;
use crate::dice::DiceRoller;
use crate::events::{BattleEvent, PhaseQueue};
use crate::side::{PerSide, Side};
use crate::spell::Spellbook;
use crate::stats::MatchStats;
use crate::status::StatusEffects;
use crate::turn::{MatchStatus, TurnState};

/// Mutable match state shared by the resolver and the turn controller.
#[derive(Debug)]
pub struct BattleState {
    /// Both combatants.
    pub combatants: PerSide<Combatant>,
    /// Each side's cooldowns.
    pub cooldowns: PerSide<CooldownTracker>,
    /// Utility latches.
    pub effects: StatusEffects,
    /// Whose turn, which round, who won.
    pub turn: TurnState,
    /// Totals for this match.
    pub stats: MatchStats,
    /// The match's random source.
    pub dice: DiceRoller,
    /// Phases waiting to be presented.
    pub phases: PhaseQueue,
}

impl BattleState {
    /// Fresh state for two combatants; no turn has started yet.
    pub fn new(book: &Spellbook, player: Combatant, enemy: Combatant, dice: DiceRoller) -> Self {
        Self {
            combatants: PerSide::new(player, enemy),
            cooldowns: PerSide::new(
                CooldownTracker::for_spellbook(book),
                CooldownTracker::for_spellbook(book),
            ),
            effects: StatusEffects::new(),
            turn: TurnState::new(),
            stats: MatchStats::default(),
            dice,
            phases: PhaseQueue::new(),
        }
    }

    /// Queue a phase stamped with the current round.
    pub fn emit(&mut self, event: BattleEvent) {
        self.phases.emit(self.turn.round, event);
    }

    /// Queue several phases in order.
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Borrow one combatant.
    pub fn combatant(&self, side: Side) -> &Combatant {
        self.combatants.get(side)
    }

    /// True while nobody has won.
    pub fn in_progress(&self) -> bool {
        self.turn.status == MatchStatus::InProgress
    }

    /// Split borrows for an AI decision: the view of `side` and the dice.
    pub fn ai_view_and_dice(&mut self, side: Side) -> (AiView<'_>, &mut DiceRoller) {
        let view = AiView {
            actor: self.combatants.get(side),
            opponent: self.combatants.get(side.opponent()),
            cooldowns: self.cooldowns.get(side),
            utility_used: self.effects.utility_used(side),
        };
        (view, &mut self.dice)
    }

    /// Declare `winner` and stop the match. The loser is left with no AP.
    pub fn finish_match(&mut self, winner: Side) {
        if !self.in_progress() {
            return;
        }
        self.turn.status = MatchStatus::won_by(winner);
        self.combatants.get_mut(winner.opponent()).current_ap = 0;
        tracing::info!(%winner, round = self.turn.round, "match ended");
        self.emit(BattleEvent::MatchEnded { winner });
    }
}
