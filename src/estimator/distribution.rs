//! Labelled battle outcome distributions and their aggregates.

use serde::{Deserialize, Serialize};

use crate::core::{BattleState, CombatError, CombatRng, Result};

/// Mean and variance of the armies each side has left when a battle ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RemainderStats {
    pub attacker_mean: f64,
    pub attacker_variance: f64,
    pub defender_mean: f64,
    pub defender_variance: f64,
}

/// Terminal-state distribution of one battle.
///
/// Only absorbing states with strictly positive mass are kept, in canonical
/// order: defender-holds states first, then attacker-wins states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleDistribution {
    start: BattleState,
    outcomes: Vec<(BattleState, f64)>,
}

impl BattleDistribution {
    /// Build from a labelled absorption row, dropping zero-mass states.
    pub fn from_row(start: BattleState, row: impl IntoIterator<Item = (BattleState, f64)>) -> Self {
        let outcomes = row.into_iter().filter(|&(_, p)| p > 0.0).collect();
        Self { start, outcomes }
    }

    /// The starting state this distribution was solved from.
    #[must_use]
    pub fn start(&self) -> BattleState {
        self.start
    }

    /// `(terminal state, probability)` pairs.
    #[must_use]
    pub fn outcomes(&self) -> &[(BattleState, f64)] {
        &self.outcomes
    }

    /// Number of reachable terminal states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Probability of ending in `state`.
    #[must_use]
    pub fn probability_of(&self, state: BattleState) -> f64 {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == state)
            .map_or(0.0, |&(_, p)| p)
    }

    /// Probability that the defender is eliminated.
    #[must_use]
    pub fn win_probability(&self) -> f64 {
        self.outcomes
            .iter()
            .filter(|(s, _)| s.attacker_won())
            .map(|&(_, p)| p)
            .sum()
    }

    /// Mean and variance of final armies on each side.
    #[must_use]
    pub fn remainder_stats(&self) -> RemainderStats {
        let moments = |side: fn(&BattleState) -> u32| {
            let (mean, square) = self.outcomes.iter().fold((0.0_f64, 0.0_f64), |(m, s), (state, p)| {
                let x = f64::from(side(state));
                (m + p * x, s + p * x * x)
            });
            (mean, (square - mean * mean).max(0.0))
        };

        let (attacker_mean, attacker_variance) = moments(|s| s.attackers);
        let (defender_mean, defender_variance) = moments(|s| s.defenders);

        RemainderStats {
            attacker_mean,
            attacker_variance,
            defender_mean,
            defender_variance,
        }
    }

    /// Draw one terminal state.
    pub fn sample(&self, rng: &mut CombatRng) -> Result<BattleState> {
        let weights: Vec<f64> = self.outcomes.iter().map(|&(_, p)| p).collect();
        self.draw(&weights, rng)
    }

    /// Draw `repeats` independent terminal states.
    pub fn sample_outcomes(&self, rng: &mut CombatRng, repeats: usize) -> Result<Vec<BattleState>> {
        let weights: Vec<f64> = self.outcomes.iter().map(|&(_, p)| p).collect();
        (0..repeats).map(|_| self.draw(&weights, rng)).collect()
    }

    fn draw(&self, weights: &[f64], rng: &mut CombatRng) -> Result<BattleState> {
        rng.choose_weighted(weights)
            .map(|i| self.outcomes[i].0)
            .ok_or_else(|| {
                CombatError::SolveFailed(format!("no reachable outcome from {}", self.start))
            })
    }
}
