//! Engine configuration.
//!
//! Callers configure combat per attack with:
//! - `CombatConfig`: how a single attack is resolved (dice, analytic, forced)
//! - `CacheConfig`: limits on the shared probability cache
//!
//! Both are plain data with builder-style setters.

use serde::{Deserialize, Serialize};

/// Maximum dice the attacker rolls per round, however many armies it commits.
pub const MAX_ATTACK_DICE: u32 = 3;

/// Maximum dice the defender rolls per round.
pub const MAX_DEFENCE_DICE: u32 = 2;

/// Per-attack resolution settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Roll real dice. When false each round removes
    /// `min(attackers, defenders)` armies from both sides.
    pub stochastic: bool,

    /// Resolve the whole battle with one draw from the absorbing
    /// Markov chain instead of round by round.
    pub analytic: bool,

    /// "Death or glory": the attacker cannot withdraw once committed.
    pub force_continuation: bool,

    /// Seed for the combat RNG.
    pub seed: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            stochastic: true,
            analytic: false,
            force_continuation: true,
            seed: 42,
        }
    }
}

impl CombatConfig {
    /// Use the deterministic attrition rule instead of dice.
    #[must_use]
    pub fn deterministic(mut self) -> Self {
        self.stochastic = false;
        self
    }

    /// Resolve battles by sampling the Markov solution.
    #[must_use]
    pub fn with_analytic(mut self, analytic: bool) -> Self {
        self.analytic = analytic;
        self
    }

    /// Set the "death or glory" rule.
    #[must_use]
    pub fn with_force_continuation(mut self, force: bool) -> Self {
        self.force_continuation = force;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Limits for the probability cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of transient states a rebuild may solve.
    /// Prevents memory exhaustion on absurd army counts.
    pub max_states: usize,

    /// Allowed deviation of a solved row sum from 1.
    pub tolerance: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_states: 10_000,
            tolerance: 1e-9,
        }
    }
}

impl CacheConfig {
    /// Set the transient-state ceiling.
    #[must_use]
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    /// Set the row-sum tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CombatConfig::default();
        assert!(config.stochastic);
        assert!(!config.analytic);
        assert!(config.force_continuation);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CombatConfig::default()
            .deterministic()
            .with_analytic(true)
            .with_force_continuation(false)
            .with_seed(7);

        assert!(!config.stochastic);
        assert!(config.analytic);
        assert!(!config.force_continuation);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_cache_config() {
        let config = CacheConfig::default().with_max_states(2500).with_tolerance(1e-6);
        assert_eq!(config.max_states, 2500);
        assert_eq!(config.tolerance, 1e-6);
    }

    #[test]
    fn test_serialization() {
        let config = CombatConfig::default().with_analytic(true);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CombatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);

        let cache = CacheConfig::default();
        let json = serde_json::to_string(&cache).unwrap();
        let deserialized: CacheConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cache, deserialized);
    }
}
