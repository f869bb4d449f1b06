//! Absorbing Markov chain model of a whole battle.
//!
//! ## Overview
//!
//! A battle starting at `(A, D)` is a walk through states `(a, d)` that
//! ends as soon as one side reaches zero. This module:
//!
//! - enumerates the states (`state_space`)
//! - builds the sparse one-round transition blocks `Q` and `R` (`transition`)
//! - solves for the absorption distribution `F = (I - Q)^-1 R` (`solver`)
//!
//! ## Usage
//!
//! ```
//! use conquest_combat::core::BattleState;
//! use conquest_combat::markov::{build_state_space, solve};
//!
//! let (space, transitions) = build_state_space(5, 3).unwrap();
//! let dist = solve(&space, &transitions, 1e-9).unwrap();
//!
//! let row = dist.row(BattleState::new(5, 3)).unwrap();
//! let total: f64 = row.iter().sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```

pub mod solver;
pub mod state_space;
pub mod transition;

pub use solver::{solve, AbsorptionDistribution};
pub use state_space::{StateIndex, StateSpace};
pub use transition::{build_state_space, SparseRow, TransitionMatrix, Transitions};
