//! Enumeration of battle states for an absorbing Markov chain.
//!
//! For coverage `(A, D)` the transient states are every `(a, d)` with
//! `1 <= a <= A`, `1 <= d <= D`, stored row-major by attacker count. The
//! absorbing states use the canonical order
//! `[(0, 1) .. (0, D), (1, 0) .. (A, 0)]`: every defender-holds state first,
//! then every attacker-wins state.

use serde::{Deserialize, Serialize};

use crate::core::{BattleState, CombatError, Result};

/// Position of a state within a [`StateSpace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateIndex {
    Transient(usize),
    Absorbing(usize),
}

/// All battle states reachable from `(A, D)`, each with a stable index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateSpace {
    max_attackers: u32,
    max_defenders: u32,
}

impl StateSpace {
    /// Create the state space covering `attackers x defenders`.
    pub fn new(max_attackers: u32, max_defenders: u32) -> Result<Self> {
        if max_attackers == 0 || max_defenders == 0 {
            return Err(CombatError::invalid(format!(
                "state space ({max_attackers}, {max_defenders}) needs at least one army per side"
            )));
        }
        Ok(Self {
            max_attackers,
            max_defenders,
        })
    }

    /// Transient states needed to cover `(attackers, defenders)`.
    #[must_use]
    pub fn transient_count_for(attackers: u32, defenders: u32) -> usize {
        attackers as usize * defenders as usize
    }

    #[inline]
    #[must_use]
    pub fn max_attackers(&self) -> u32 {
        self.max_attackers
    }

    #[inline]
    #[must_use]
    pub fn max_defenders(&self) -> u32 {
        self.max_defenders
    }

    /// Number of transient states.
    #[must_use]
    pub fn transient_count(&self) -> usize {
        Self::transient_count_for(self.max_attackers, self.max_defenders)
    }

    /// Number of absorbing states.
    #[must_use]
    pub fn absorbing_count(&self) -> usize {
        self.max_attackers as usize + self.max_defenders as usize
    }

    /// True if `(attackers, defenders)` is a transient state of this space.
    #[must_use]
    pub fn covers(&self, attackers: u32, defenders: u32) -> bool {
        attackers <= self.max_attackers && defenders <= self.max_defenders
    }

    /// Index of a state, or `None` if it lies outside this space.
    #[must_use]
    pub fn index_of(&self, state: BattleState) -> Option<StateIndex> {
        let BattleState {
            attackers,
            defenders,
        } = state;
        if !self.covers(attackers, defenders) {
            return None;
        }
        match (attackers, defenders) {
            (0, 0) => None,
            (0, d) => Some(StateIndex::Absorbing(d as usize - 1)),
            (a, 0) => Some(StateIndex::Absorbing(
                self.max_defenders as usize + a as usize - 1,
            )),
            (a, d) => Some(StateIndex::Transient(
                (a as usize - 1) * self.max_defenders as usize + (d as usize - 1),
            )),
        }
    }

    /// Index of a transient state.
    #[must_use]
    pub fn transient_index(&self, state: BattleState) -> Option<usize> {
        match self.index_of(state) {
            Some(StateIndex::Transient(i)) => Some(i),
            _ => None,
        }
    }

    /// Index of an absorbing state.
    #[must_use]
    pub fn absorbing_index(&self, state: BattleState) -> Option<usize> {
        match self.index_of(state) {
            Some(StateIndex::Absorbing(i)) => Some(i),
            _ => None,
        }
    }

    /// Transient state at `index`.
    #[must_use]
    pub fn transient_state(&self, index: usize) -> BattleState {
        let d = self.max_defenders as usize;
        BattleState::new((index / d) as u32 + 1, (index % d) as u32 + 1)
    }

    /// Absorbing state at `index`, in canonical order.
    #[must_use]
    pub fn absorbing_state(&self, index: usize) -> BattleState {
        let d = self.max_defenders as usize;
        if index < d {
            BattleState::new(0, index as u32 + 1)
        } else {
            BattleState::new((index - d) as u32 + 1, 0)
        }
    }

    /// Transient states in index order.
    pub fn transient_states(&self) -> impl Iterator<Item = BattleState> + '_ {
        (0..self.transient_count()).map(move |i| self.transient_state(i))
    }

    /// Absorbing states in canonical order.
    pub fn absorbing_states(&self) -> impl Iterator<Item = BattleState> + '_ {
        (0..self.absorbing_count()).map(move |i| self.absorbing_state(i))
    }
}

impl std::fmt::Display for StateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateSpace({}x{})", self.max_attackers, self.max_defenders)
    }
}
