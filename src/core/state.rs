//! Battle states: the army counts on each side of a single attack.

use serde::{Deserialize, Serialize};

/// Armies remaining on each side of a battle.
///
/// A state is *transient* while both sides hold armies and *absorbing*
/// once exactly one side has been wiped out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattleState {
    /// Attacking armies still fighting.
    pub attackers: u32,
    /// Defending armies still holding the territory.
    pub defenders: u32,
}

impl BattleState {
    /// Create a new battle state.
    #[must_use]
    pub const fn new(attackers: u32, defenders: u32) -> Self {
        Self {
            attackers,
            defenders,
        }
    }

    /// Both sides still have armies.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        self.attackers > 0 && self.defenders > 0
    }

    /// Exactly one side has been eliminated.
    #[must_use]
    pub const fn is_absorbing(self) -> bool {
        (self.attackers == 0) != (self.defenders == 0)
    }

    /// The defender was eliminated.
    #[must_use]
    pub const fn attacker_won(self) -> bool {
        self.attackers > 0 && self.defenders == 0
    }

    /// Apply one round of losses. Army counts floor at zero.
    #[must_use]
    pub const fn after_losses(self, attacker_losses: u32, defender_losses: u32) -> Self {
        Self {
            attackers: self.attackers.saturating_sub(attacker_losses),
            defenders: self.defenders.saturating_sub(defender_losses),
        }
    }
}

impl std::fmt::Display for BattleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.attackers, self.defenders)
    }
}
