//! Absorption probabilities for the battle chain.
//!
//! Solves `(I - Q) F = R` for `F`, the probability of ending in each
//! absorbing state from each transient state. No inverse is formed.
//!
//! Every round removes at least one army, so `Q` is strictly lower
//! triangular in row-major state order and `F` falls out of a single
//! forward substitution pass: `F[i] = R[i] + sum_j Q[i][j] F[j]` with every
//! `j < i` already solved. A `Q` without that structure is rejected.

use tracing::debug;

use crate::core::{BattleState, CombatError, Result};

use super::state_space::StateSpace;
use super::transition::{TransitionMatrix, Transitions};

/// Terminal-state distribution for every transient starting state.
///
/// Stored dense, row-major: one row of `absorbing_count` probabilities per
/// transient state. Read-only once solved.
#[derive(Clone, Debug, PartialEq)]
pub struct AbsorptionDistribution {
    space: StateSpace,
    probs: Vec<f64>,
}

impl AbsorptionDistribution {
    #[must_use]
    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// Row for the transient state at `index`.
    #[must_use]
    pub fn row_at(&self, index: usize) -> &[f64] {
        let width = self.space.absorbing_count();
        &self.probs[index * width..(index + 1) * width]
    }

    /// Row for a transient starting state, or `None` outside the space.
    #[must_use]
    pub fn row(&self, start: BattleState) -> Option<&[f64]> {
        self.space.transient_index(start).map(|i| self.row_at(i))
    }

    /// Labelled `(absorbing state, probability)` pairs for a start state.
    pub fn labelled_row(
        &self,
        start: BattleState,
    ) -> Option<impl Iterator<Item = (BattleState, f64)> + '_> {
        let row = self.row(start)?;
        Some(
            row.iter()
                .enumerate()
                .map(move |(j, &p)| (self.space.absorbing_state(j), p)),
        )
    }
}

/// Solve for the absorption distribution of `space`.
pub fn solve(space: &StateSpace, transitions: &Transitions, tolerance: f64) -> Result<AbsorptionDistribution> {
    let q = &transitions.transient;
    let r = &transitions.absorbing;
    let n = space.transient_count();
    let m = space.absorbing_count();

    if q.row_count() != n || q.column_count() != n || r.row_count() != n || r.column_count() != m {
        return Err(CombatError::SolveFailed(format!(
            "matrix shapes do not match {space}"
        )));
    }

    if !q.is_strictly_lower_triangular() {
        return Err(CombatError::SolveFailed(format!(
            "transient block of {space} is not strictly lower triangular"
        )));
    }

    let probs = forward_substitution(q, r, m);
    validate_rows(&probs, m, tolerance)?;
    debug!(%space, nnz = q.nnz() + r.nnz(), "solved absorption distribution");

    Ok(AbsorptionDistribution {
        space: *space,
        probs,
    })
}

fn forward_substitution(q: &TransitionMatrix, r: &TransitionMatrix, width: usize) -> Vec<f64> {
    let n = q.row_count();
    let mut probs = vec![0.0; n * width];

    for i in 0..n {
        let (solved, rest) = probs.split_at_mut(i * width);
        let row = &mut rest[..width];

        for &(j, p) in r.row(i) {
            row[j] += p;
        }
        for &(j, p) in q.row(i) {
            let prior = &solved[j * width..(j + 1) * width];
            for (cell, &f) in row.iter_mut().zip(prior) {
                *cell += p * f;
            }
        }
    }

    probs
}

fn validate_rows(probs: &[f64], width: usize, tolerance: f64) -> Result<()> {
    if width == 0 {
        return Ok(());
    }
    for (i, row) in probs.chunks(width).enumerate() {
        if row.iter().any(|p| !p.is_finite() || *p < -tolerance) {
            return Err(CombatError::SolveFailed(format!(
                "row {i} contains an invalid probability"
            )));
        }
        let total: f64 = row.iter().sum();
        if (total - 1.0).abs() > tolerance {
            return Err(CombatError::SolveFailed(format!(
                "row {i} sums to {total}"
            )));
        }
    }
    Ok(())
}
