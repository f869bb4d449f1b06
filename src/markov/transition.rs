//! Sparse one-round transition matrices.
//!
//! Each transient state has at most three successors (the defender loses
//! 0, 1 or 2 armies), so rows are stored inline as small vectors of
//! `(column, probability)` pairs.

use smallvec::SmallVec;

use crate::core::{BattleState, CombatError, Result};
use crate::dice::capped_outcome_probability;

use super::state_space::{StateIndex, StateSpace};

/// One sparse row: `(column, probability)` pairs.
pub type SparseRow = SmallVec<[(usize, f64); 3]>;

/// Row-sparse matrix with one row per transient state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionMatrix {
    rows: Vec<SparseRow>,
    columns: usize,
}

impl TransitionMatrix {
    /// Create an empty matrix with `rows x columns` shape.
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: vec![SparseRow::new(); rows],
            columns,
        }
    }

    /// Add `probability` at `(row, column)`.
    pub fn push(&mut self, row: usize, column: usize, probability: f64) {
        debug_assert!(column < self.columns);
        self.rows[row].push((column, probability));
    }

    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[(usize, f64)] {
        &self.rows[row]
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SmallVec::len).sum()
    }

    /// Sum of one row.
    #[must_use]
    pub fn row_sum(&self, row: usize) -> f64 {
        self.rows[row].iter().map(|&(_, p)| p).sum()
    }

    /// True when every entry sits strictly below the diagonal.
    #[must_use]
    pub fn is_strictly_lower_triangular(&self) -> bool {
        self.rows
            .iter()
            .enumerate()
            .all(|(i, row)| row.iter().all(|&(j, _)| j < i))
    }
}

/// The `Q` (transient to transient) and `R` (transient to absorbing) blocks
/// of the one-round transition matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transitions {
    pub transient: TransitionMatrix,
    pub absorbing: TransitionMatrix,
}

impl Transitions {
    /// Build `Q` and `R` for every transient state of `space`.
    ///
    /// From `(a, d)`, two armies change hands when both sides can roll two
    /// or more dice, otherwise one. Dice counts are capped at 3 and 2.
    pub fn build(space: &StateSpace) -> Result<Self> {
        let n = space.transient_count();
        let mut transient = TransitionMatrix::new(n, n);
        let mut absorbing = TransitionMatrix::new(n, space.absorbing_count());

        for (i, state) in space.transient_states().enumerate() {
            let max_losses = if state.attackers > 1 && state.defenders > 1 { 2 } else { 1 };

            for defender_losses in 0..=max_losses {
                let probability =
                    capped_outcome_probability(state.attackers, state.defenders, defender_losses)?;
                if probability <= 0.0 {
                    continue;
                }

                let attacker_losses = max_losses - defender_losses;
                let next = state.after_losses(attacker_losses, defender_losses);

                match space.index_of(next) {
                    Some(StateIndex::Transient(j)) => transient.push(i, j, probability),
                    Some(StateIndex::Absorbing(j)) => absorbing.push(i, j, probability),
                    None => {
                        return Err(CombatError::invalid(format!(
                            "transition {state} -> {next} leaves {space}"
                        )))
                    }
                }
            }
        }

        Ok(Self {
            transient,
            absorbing,
        })
    }

    /// One-step probability of moving from `from` to `to`.
    #[must_use]
    pub fn probability(&self, space: &StateSpace, from: BattleState, to: BattleState) -> f64 {
        let Some(i) = space.transient_index(from) else {
            return 0.0;
        };
        let (matrix, column) = match space.index_of(to) {
            Some(StateIndex::Transient(j)) => (&self.transient, j),
            Some(StateIndex::Absorbing(j)) => (&self.absorbing, j),
            None => return 0.0,
        };
        matrix
            .row(i)
            .iter()
            .filter(|&&(j, _)| j == column)
            .map(|&(_, p)| p)
            .sum()
    }
}

/// Enumerate the state space covering `(attackers, defenders)` with its transitions.
pub fn build_state_space(attackers: u32, defenders: u32) -> Result<(StateSpace, Transitions)> {
    let space = StateSpace::new(attackers, defenders)?;
    let transitions = Transitions::build(&space)?;
    Ok((space, transitions))
}
