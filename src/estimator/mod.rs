//! Battle outcome estimation on top of the Markov solver.
//!
//! - `cache`: shared, growable memo of the largest solved state space
//! - `distribution`: labelled terminal-state rows, sampling and aggregates

pub mod cache;
pub mod distribution;

pub use cache::{CacheStats, ProbabilityCache};
pub use distribution::{BattleDistribution, RemainderStats};
