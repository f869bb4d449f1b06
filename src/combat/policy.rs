//! Continuation policies: whether the attacker keeps rolling.
//!
//! Only consulted in round-by-round mode when "death or glory" is off.
//! Any `Fn(&BattleProgress) -> bool` closure is also a policy.

use serde::{Deserialize, Serialize};

use crate::estimator::ProbabilityCache;

use super::round::RoundLosses;

/// Running state of an attack, shown to the policy before each round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleProgress {
    /// Armies left in the attacking territory.
    pub attacking_armies: u32,
    /// Armies left in the defending territory.
    pub defending_armies: u32,
    /// Armies the attacker committed. Fixed for the whole attack.
    pub committed: u32,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// Rounds fought so far.
    pub rounds: u32,
}

impl BattleProgress {
    /// Progress before the first round.
    #[must_use]
    pub fn start(attacking_armies: u32, defending_armies: u32, committed: u32) -> Self {
        Self {
            attacking_armies,
            defending_armies,
            committed,
            attacker_losses: 0,
            defender_losses: 0,
            rounds: 0,
        }
    }

    /// Armies fighting the next round: the commitment, capped so one army
    /// always stays home.
    #[must_use]
    pub fn attackers_in_play(&self) -> u32 {
        self.committed.min(self.attacking_armies.saturating_sub(1))
    }

    /// The rules still allow another round.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.attacking_armies > 1 && self.defending_armies > 0 && self.committed > 0
    }

    /// Apply one round of losses. Army counts floor at zero.
    pub fn apply(&mut self, losses: RoundLosses) {
        self.attacking_armies = self.attacking_armies.saturating_sub(losses.attacker);
        self.defending_armies = self.defending_armies.saturating_sub(losses.defender);
        self.attacker_losses += losses.attacker;
        self.defender_losses += losses.defender;
        self.rounds += 1;
    }
}

/// Decides whether an attack continues for another round.
pub trait ContinuationPolicy {
    fn should_continue(&self, progress: &BattleProgress) -> bool;
}

impl<F> ContinuationPolicy for F
where
    F: Fn(&BattleProgress) -> bool,
{
    fn should_continue(&self, progress: &BattleProgress) -> bool {
        self(progress)
    }
}

/// Fight until the rules stop the battle.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysContinue;

impl ContinuationPolicy for AlwaysContinue {
    fn should_continue(&self, _progress: &BattleProgress) -> bool {
        true
    }
}

/// Withdraw once fewer than `min_attackers` armies could fight the next round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawBelow {
    pub min_attackers: u32,
}

impl ContinuationPolicy for WithdrawBelow {
    fn should_continue(&self, progress: &BattleProgress) -> bool {
        progress.attackers_in_play() >= self.min_attackers
    }
}

/// Keep attacking while the exact odds of winning from here reach `threshold`.
///
/// Withdraws if the odds cannot be computed.
#[derive(Clone, Copy, Debug)]
pub struct FavourableOdds<'a> {
    pub cache: &'a ProbabilityCache,
    pub threshold: f64,
}

impl ContinuationPolicy for FavourableOdds<'_> {
    fn should_continue(&self, progress: &BattleProgress) -> bool {
        self.cache
            .win_probability(progress.attackers_in_play(), progress.defending_armies)
            .is_ok_and(|odds| odds >= self.threshold)
    }
}
