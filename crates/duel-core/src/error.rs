//! Error types for the duel engine.
//!
//! Every variant is a local rejection: a rejected request leaves the match
//! exactly as it was.

use crate::side::Side;
use crate::spell::SpellId;

/// Errors that can occur while driving a match.
#[derive(Debug, thiserror::Error)]
pub enum DuelError {
    /// The requesting side does not own the current turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    /// The requested spell is still cooling down.
    #[error("spell {spell} is on cooldown for {remaining} more turn(s)")]
    SpellOnCooldown {
        /// The spell that was requested.
        spell: SpellId,
        /// Turns left before it is usable again.
        remaining: u32,
    },

    /// The caster cannot pay the spell's action-point cost.
    #[error("not enough action points: need {needed}, have {available}")]
    InsufficientActionPoints {
        /// The spell's cost.
        needed: u32,
        /// The caster's current action points.
        available: u32,
    },

    /// The spell id is not part of the match's spellbook.
    #[error("unknown spell id: {0}")]
    UnknownSpellId(SpellId),

    /// The match has already been decided.
    #[error("match has already ended")]
    MatchAlreadyEnded,

    /// A utility effect was already used by this side this turn.
    #[error("a utility spell was already used this turn")]
    UtilityAlreadyUsed,

    /// A previous action still has phases waiting to be presented.
    #[error("another action is still being resolved")]
    ActionInFlight,

    /// The side is driven by the built-in AI and does not take requests.
    #[error("{0} is controlled by the AI")]
    AutomatedSide(Side),

    /// The one-time reroll was already spent or the match has begun.
    #[error("reroll is no longer available")]
    RerollUnavailable,

    /// A spellbook is missing a required spell or has an invalid entry.
    #[error("invalid spellbook: {0}")]
    InvalidSpellbook(String),

    /// A spellbook document could not be parsed.
    #[error("spellbook format error: {0}")]
    SpellbookFormat(#[from] serde_json::Error),
}

/// Convenience result type for duel operations.
pub type DuelResult<T> = Result<T, DuelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = DuelError::NotYourTurn(Side::Enemy);
        assert_eq!(err.to_string(), "it is not enemy's turn");

        let err = DuelError::SpellOnCooldown {
            spell: SpellId(7),
            remaining: 2,
        };
        assert!(err.to_string().contains("on cooldown for 2"));

        let err = DuelError::InsufficientActionPoints {
            needed: 2,
            available: 1,
        };
        assert_eq!(err.to_string(), "not enough action points: need 2, have 1");
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: DuelError = parse.into();
        assert!(matches!(err, DuelError::SpellbookFormat(_)));
    }
}
