//! Error taxonomy for the combat engine.

use thiserror::Error;

/// Errors surfaced by combat resolution and probability queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    /// Dice, army or loss counts outside the supported ranges.
    #[error("Invalid combat parameters: {0}")]
    InvalidCombatParameters(String),

    /// More armies committed than the attacking territory can spare.
    #[error("Cannot commit {committed} attackers from a territory holding {available} armies")]
    Overcommit { committed: u32, available: u32 },

    /// Requested state space exceeds the configured ceiling.
    #[error(
        "State space {attackers}x{defenders} has {states} transient states, limit is {limit}"
    )]
    StateSpaceTooLarge {
        attackers: u32,
        defenders: u32,
        states: usize,
        limit: usize,
    },

    /// The absorption solve produced an unusable distribution.
    #[error("Absorption solve failed: {0}")]
    SolveFailed(String),

    /// A thread panicked while holding a probability cache lock.
    #[error("Probability cache {0} lock poisoned")]
    CacheLockPoisoned(&'static str),
}

impl CombatError {
    /// Shorthand for an `InvalidCombatParameters` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidCombatParameters(message.into())
    }

    /// True for errors raised while rebuilding the probability cache.
    #[must_use]
    pub fn is_cache_rebuild_failure(&self) -> bool {
        matches!(self, Self::StateSpaceTooLarge { .. } | Self::SolveFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, CombatError>;
