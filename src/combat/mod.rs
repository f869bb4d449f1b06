//! Resolving attacks between territories.
//!
//! ## Overview
//!
//! - `round`: one round of combat, rolled or deterministic
//! - `policy`: whether an attacker keeps fighting
//! - `resolver`: whole attacks, round by round or sampled analytically
//!
//! ## Usage
//!
//! ```
//! use conquest_combat::combat::{resolve_attack, AlwaysContinue, AttackRequest};
//! use conquest_combat::core::{CombatConfig, CombatRng};
//! use conquest_combat::estimator::ProbabilityCache;
//!
//! let cache = ProbabilityCache::new();
//! let config = CombatConfig::default().deterministic();
//! let mut rng = CombatRng::new(config.seed);
//!
//! let request = AttackRequest::new(5, 1, 4);
//! let outcome = resolve_attack(&config, &cache, &request, &AlwaysContinue, &mut rng).unwrap();
//!
//! assert!(outcome.conquered);
//! assert_eq!(outcome.attacker_losses, 1);
//! ```

pub mod policy;
pub mod resolver;
pub mod round;

pub use policy::{AlwaysContinue, BattleProgress, ContinuationPolicy, FavourableOdds, WithdrawBelow};
pub use resolver::{
    resolve_attack, resolver_for, AnalyticResolver, AttackOutcome, AttackRequest, AttackResolver,
    RoundResolver,
};
pub use round::{
    attrition_round, compare_dice, fight_round, roll_round, tally_rounds, RoundLosses, RoundTally,
};
