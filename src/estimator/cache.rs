//! Growable, shareable cache of the largest solved battle chain.
//!
//! The cache holds at most one solved state space. A query inside its
//! coverage is a row lookup; a query outside it solves a new space covering
//! both the old coverage and the request, then replaces the old one.
//!
//! ## Concurrency
//!
//! The solved space sits behind an `RwLock` as an immutable `Arc` snapshot,
//! swapped whole on rebuild. Rebuilds are serialized by a separate mutex
//! and solved outside the `RwLock`, so readers whose request is already
//! covered never wait on a solve. A reader that needs a larger space takes
//! the rebuild mutex, re-checks coverage (another thread may have just
//! grown it) and only then solves. Readers never see a partial solve.
//!
//! ## Usage
//!
//! ```
//! use conquest_combat::estimator::ProbabilityCache;
//!
//! let cache = ProbabilityCache::new();
//! cache.warm(20, 20).unwrap();
//!
//! let odds = cache.win_probability(5, 3).unwrap();
//! assert!(odds > 0.5);
//! assert_eq!(cache.stats().rebuilds, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{BattleState, CacheConfig, CombatError, CombatRng, Result};
use crate::markov::{build_state_space, solve, AbsorptionDistribution, StateSpace};

use super::distribution::{BattleDistribution, RemainderStats};

/// Counters describing cache behaviour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Queries answered from the current snapshot.
    pub hits: u64,

    /// Queries that required a larger state space.
    pub misses: u64,

    /// Completed rebuilds.
    pub rebuilds: u64,

    /// Current `(attackers, defenders)` coverage, if anything is cached.
    pub coverage: Option<(u32, u32)>,
}

impl CacheStats {
    /// Fraction of queries answered without a rebuild.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-lifetime memo of the largest solved battle chain.
#[derive(Debug, Default)]
pub struct ProbabilityCache {
    config: CacheConfig,
    current: RwLock<Option<Arc<AbsorptionDistribution>>>,
    rebuild: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    rebuilds: AtomicU64,
}

impl ProbabilityCache {
    /// Create an empty cache with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with custom limits.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Current `(attackers, defenders)` coverage.
    pub fn coverage(&self) -> Result<Option<(u32, u32)>> {
        Ok(self
            .read()?
            .as_ref()
            .map(|dist| (dist.space().max_attackers(), dist.space().max_defenders())))
    }

    /// Make sure everything up to `(attackers, defenders)` is solved.
    ///
    /// Call once with a generous bound before a batch of games.
    pub fn warm(&self, attackers: u32, defenders: u32) -> Result<()> {
        self.covering(attackers, defenders).map(|_| ())
    }

    /// Terminal-state distribution for a battle starting at `(attackers, defenders)`.
    pub fn query(&self, attackers: u32, defenders: u32) -> Result<BattleDistribution> {
        let dist = self.covering(attackers, defenders)?;
        let start = BattleState::new(attackers, defenders);
        let row = dist.labelled_row(start).ok_or_else(|| {
            CombatError::SolveFailed(format!("{start} missing from {}", dist.space()))
        })?;
        Ok(BattleDistribution::from_row(start, row))
    }

    /// Probability that `attackers` eliminate `defenders`.
    pub fn win_probability(&self, attackers: u32, defenders: u32) -> Result<f64> {
        Ok(self.query(attackers, defenders)?.win_probability())
    }

    /// Mean and variance of final armies on each side.
    pub fn expected_remainder(&self, attackers: u32, defenders: u32) -> Result<RemainderStats> {
        Ok(self.query(attackers, defenders)?.remainder_stats())
    }

    /// Draw `repeats` terminal states for a battle.
    pub fn sample_outcomes(
        &self,
        attackers: u32,
        defenders: u32,
        repeats: usize,
        rng: &mut CombatRng,
    ) -> Result<Vec<BattleState>> {
        self.query(attackers, defenders)?.sample_outcomes(rng, repeats)
    }

    /// Snapshot of the hit, miss and rebuild counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            coverage: self.coverage().ok().flatten(),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Option<Arc<AbsorptionDistribution>>>> {
        self.current
            .read()
            .map_err(|_| CombatError::CacheLockPoisoned("snapshot"))
    }

    fn covered(&self, attackers: u32, defenders: u32) -> Result<Option<Arc<AbsorptionDistribution>>> {
        Ok(self
            .read()?
            .as_ref()
            .filter(|dist| dist.space().covers(attackers, defenders))
            .cloned())
    }

    fn covering(&self, attackers: u32, defenders: u32) -> Result<Arc<AbsorptionDistribution>> {
        if attackers == 0 || defenders == 0 {
            return Err(CombatError::invalid(format!(
                "battle ({attackers}, {defenders}) is already decided"
            )));
        }

        if let Some(dist) = self.covered(attackers, defenders)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(attackers, defenders, "probability cache hit");
            return Ok(dist);
        }

        let _rebuilding = self
            .rebuild
            .lock()
            .map_err(|_| CombatError::CacheLockPoisoned("rebuild"))?;

        // Another thread may have grown the cache while we waited.
        let previous = self.read()?.clone();
        if let Some(dist) = previous.as_ref().filter(|d| d.space().covers(attackers, defenders)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(dist));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let (target_attackers, target_defenders) = match &previous {
            Some(dist) => (
                dist.space().max_attackers().max(attackers),
                dist.space().max_defenders().max(defenders),
            ),
            None => (attackers, defenders),
        };

        let states = StateSpace::transient_count_for(target_attackers, target_defenders);
        if states > self.config.max_states {
            warn!(
                attackers = target_attackers,
                defenders = target_defenders,
                states,
                limit = self.config.max_states,
                "refusing probability cache rebuild"
            );
            return Err(CombatError::StateSpaceTooLarge {
                attackers: target_attackers,
                defenders: target_defenders,
                states,
                limit: self.config.max_states,
            });
        }

        let started = Instant::now();
        let (space, transitions) = build_state_space(target_attackers, target_defenders)?;
        let dist = Arc::new(solve(&space, &transitions, self.config.tolerance)?);

        *self
            .current
            .write()
            .map_err(|_| CombatError::CacheLockPoisoned("snapshot"))? =
            Some(Arc::clone(&dist));
        self.rebuilds.fetch_add(1, Ordering::Relaxed);

        info!(
            %space,
            states,
            nnz = transitions.transient.nnz() + transitions.absorbing.nnz(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rebuilt probability cache"
        );

        Ok(dist)
    }
}
