//! Attack resolution: the boundary to the turn engine.
//!
//! An attack commits some of a territory's armies against a neighbour.
//! It is resolved by one of two interchangeable [`AttackResolver`]s:
//!
//! - [`RoundResolver`]: rolls round after round (or applies deterministic
//!   attrition) until the rules or the continuation policy stop it
//! - [`AnalyticResolver`]: draws the final state of the whole battle from
//!   the solved Markov chain in one step
//!
//! [`resolve_attack`] picks one from a [`CombatConfig`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{CombatConfig, CombatError, CombatRng, Result};
use crate::estimator::ProbabilityCache;

use super::policy::{BattleProgress, ContinuationPolicy};
use super::round::fight_round;

/// What the turn engine asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Armies in the attacking territory.
    pub attacking_armies: u32,
    /// Armies in the defending territory.
    pub defending_armies: u32,
    /// Armies sent into battle. Must leave at least one behind.
    pub committed: u32,
    /// Armies the attacker would like to move in after a conquest.
    pub move_request: u32,
}

impl AttackRequest {
    /// Create a request with no explicit move preference.
    #[must_use]
    pub fn new(attacking_armies: u32, defending_armies: u32, committed: u32) -> Self {
        Self {
            attacking_armies,
            defending_armies,
            committed,
            move_request: 0,
        }
    }

    /// Ask to move `armies` into a conquered territory.
    #[must_use]
    pub fn with_move_request(mut self, armies: u32) -> Self {
        self.move_request = armies;
        self
    }

    /// Reject requests before any dice are rolled or odds computed.
    pub fn validate(&self) -> Result<()> {
        if self.committed >= self.attacking_armies {
            return Err(CombatError::Overcommit {
                committed: self.committed,
                available: self.attacking_armies,
            });
        }
        if self.committed == 0 {
            return Err(CombatError::invalid("attack with no committed armies"));
        }
        if self.defending_armies == 0 {
            return Err(CombatError::invalid("defending territory holds no armies"));
        }
        Ok(())
    }
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// The defending territory was emptied and changes hands.
    pub conquered: bool,
    /// Armies moved from the attacking into the conquered territory.
    pub armies_moved: u32,
    /// Rounds fought, or `None` when the battle was sampled in one step.
    pub rounds: Option<u32>,
}

impl AttackOutcome {
    /// Settle losses into an outcome, working out the conquest move.
    ///
    /// The attacker moves in at least its commitment, or as much of it as
    /// it can spare, and never empties its own territory.
    #[must_use]
    pub fn settle(
        request: &AttackRequest,
        attacker_losses: u32,
        defender_losses: u32,
        rounds: Option<u32>,
    ) -> Self {
        let conquered = defender_losses >= request.defending_armies;
        let armies_moved = if conquered {
            let movable = request
                .attacking_armies
                .saturating_sub(attacker_losses)
                .saturating_sub(1);
            let invaders = request.committed.min(movable);
            request.move_request.min(movable).max(invaders)
        } else {
            0
        };

        let outcome = Self {
            attacker_losses,
            defender_losses,
            conquered,
            armies_moved,
            rounds,
        };
        outcome.report();
        outcome
    }

    /// Armies left in the attacking territory after losses and the move.
    #[must_use]
    pub fn attacking_armies_after(&self, request: &AttackRequest) -> u32 {
        request
            .attacking_armies
            .saturating_sub(self.attacker_losses)
            .saturating_sub(self.armies_moved)
    }

    /// Armies in the defending territory afterwards, held by whoever owns it.
    #[must_use]
    pub fn defending_armies_after(&self, request: &AttackRequest) -> u32 {
        if self.conquered {
            self.armies_moved
        } else {
            request.defending_armies.saturating_sub(self.defender_losses)
        }
    }

    fn report(&self) {
        let verdict = if self.conquered {
            "Attacker wins"
        } else {
            "Defender holds"
        };
        info!(
            attacker_losses = self.attacker_losses,
            defender_losses = self.defender_losses,
            armies_moved = self.armies_moved,
            "{verdict}"
        );
    }
}

/// A way of resolving one attack.
pub trait AttackResolver {
    /// Resolve `request`. `policy` is consulted only by resolvers that
    /// fight round by round without "death or glory".
    fn resolve(
        &self,
        request: &AttackRequest,
        policy: &dyn ContinuationPolicy,
        rng: &mut CombatRng,
    ) -> Result<AttackOutcome>;
}

/// Round-by-round resolution with dice or deterministic attrition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResolver {
    pub stochastic: bool,
    pub force_continuation: bool,
}

impl RoundResolver {
    #[must_use]
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            stochastic: config.stochastic,
            force_continuation: config.force_continuation,
        }
    }
}

impl AttackResolver for RoundResolver {
    fn resolve(
        &self,
        request: &AttackRequest,
        policy: &dyn ContinuationPolicy,
        rng: &mut CombatRng,
    ) -> Result<AttackOutcome> {
        request.validate()?;

        let mut progress = BattleProgress::start(
            request.attacking_armies,
            request.defending_armies,
            request.committed,
        );

        while progress.can_continue()
            && (self.force_continuation || policy.should_continue(&progress))
        {
            let losses = fight_round(
                progress.attackers_in_play(),
                progress.defending_armies,
                self.stochastic,
                rng,
            )?;
            progress.apply(losses);
            debug!(
                round = progress.rounds,
                attacker_lost = losses.attacker,
                defender_lost = losses.defender,
                attackers = progress.attacking_armies,
                defenders = progress.defending_armies,
                "combat round"
            );
        }

        Ok(AttackOutcome::settle(
            request,
            progress.attacker_losses,
            progress.defender_losses,
            Some(progress.rounds),
        ))
    }
}

/// One-step resolution by sampling the absorbing Markov chain.
#[derive(Clone, Copy, Debug)]
pub struct AnalyticResolver<'a> {
    cache: &'a ProbabilityCache,
}

impl<'a> AnalyticResolver<'a> {
    #[must_use]
    pub fn new(cache: &'a ProbabilityCache) -> Self {
        Self { cache }
    }
}

impl AttackResolver for AnalyticResolver<'_> {
    fn resolve(
        &self,
        request: &AttackRequest,
        _policy: &dyn ContinuationPolicy,
        rng: &mut CombatRng,
    ) -> Result<AttackOutcome> {
        request.validate()?;

        let end = self
            .cache
            .query(request.committed, request.defending_armies)?
            .sample(rng)?;

        let (Some(attacker_losses), Some(defender_losses)) = (
            request.committed.checked_sub(end.attackers),
            request.defending_armies.checked_sub(end.defenders),
        ) else {
            return Err(CombatError::SolveFailed(format!(
                "sampled {end} outside battle ({}, {})",
                request.committed, request.defending_armies
            )));
        };

        Ok(AttackOutcome::settle(request, attacker_losses, defender_losses, None))
    }
}

/// The resolver a configuration asks for.
#[must_use]
pub fn resolver_for<'a>(
    config: &CombatConfig,
    cache: &'a ProbabilityCache,
) -> Box<dyn AttackResolver + 'a> {
    if config.analytic {
        Box::new(AnalyticResolver::new(cache))
    } else {
        Box::new(RoundResolver::from_config(config))
    }
}

/// Resolve one attack under `config`.
///
/// `cache` is only touched in analytic mode.
pub fn resolve_attack(
    config: &CombatConfig,
    cache: &ProbabilityCache,
    request: &AttackRequest,
    policy: &dyn ContinuationPolicy,
    rng: &mut CombatRng,
) -> Result<AttackOutcome> {
    resolver_for(config, cache).resolve(request, policy, rng)
}
