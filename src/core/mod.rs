//! Core engine types: battle states, RNG, configuration, errors.
//!
//! Everything here is independent of how a battle is resolved; the
//! `dice`, `markov`, `estimator` and `combat` modules build on it.

pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use config::{CacheConfig, CombatConfig, MAX_ATTACK_DICE, MAX_DEFENCE_DICE};
pub use error::{CombatError, Result};
pub use rng::{CombatRng, DiceRoll, DIE_FACES};
pub use state::BattleState;
