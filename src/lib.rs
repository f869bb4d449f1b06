//! # conquest-combat
//!
//! Combat resolution and outcome-probability engine for a territorial
//! conquest board game played by scripted agents.
//!
//! ## Design Principles
//!
//! 1. **Exact Where Possible**: Round outcomes come from closed-form dice
//!    order statistics, whole battles from an absorbing Markov chain.
//!
//! 2. **Two Paths, One Contract**: Rolling round by round and sampling the
//!    solved chain are both [`AttackResolver`]s, picked by configuration.
//!
//! 3. **Explicit Shared State**: The probability cache is an object passed
//!    to whoever needs it. It grows, never shrinks, and is safe to share
//!    between games running on different threads.
//!
//! ## Architecture
//!
//! - **Dice Rule**: Attackers roll up to 3 dice, defenders up to 2. Highest
//!   dice are compared pairwise; ties go to the defender.
//!
//! - **Deterministic RNG**: Every random draw goes through [`CombatRng`] so a
//!   seed reproduces a battle exactly.
//!
//! ## Modules
//!
//! - `core`: Battle states, RNG, configuration, errors
//! - `dice`: Order statistics and the per-round outcome table
//! - `markov`: State space, sparse transitions, absorption solver
//! - `estimator`: Probability cache, outcome sampling, aggregates
//! - `combat`: Rounds, continuation policies, attack resolution

pub mod combat;
pub mod core;
pub mod dice;
pub mod estimator;
pub mod markov;

// Re-export commonly used types
pub use crate::core::{
    BattleState, CacheConfig, CombatConfig, CombatError, CombatRng, Result,
    MAX_ATTACK_DICE, MAX_DEFENCE_DICE,
};

pub use crate::dice::{round_outcome_probability, DiceModel, RoundOutcomeTable};

pub use crate::markov::{build_state_space, solve, AbsorptionDistribution, StateSpace, Transitions};

pub use crate::estimator::{BattleDistribution, CacheStats, ProbabilityCache, RemainderStats};

pub use crate::combat::{
    resolve_attack, AlwaysContinue, AnalyticResolver, AttackOutcome, AttackRequest, AttackResolver,
    BattleProgress, ContinuationPolicy, RoundResolver,
};

/// Terminal-state distribution for a battle, growing `cache` if needed.
///
/// Alias for [`ProbabilityCache::query`], named for the turn engine.
pub fn query_battle_distribution(
    cache: &ProbabilityCache,
    attacker_armies: u32,
    defender_armies: u32,
) -> Result<BattleDistribution> {
    cache.query(attacker_armies, defender_armies)
}
