//! Single combat rounds, rolled or deterministic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CombatError, CombatRng, Result, MAX_ATTACK_DICE, MAX_DEFENCE_DICE};

/// Armies lost by each side in one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundLosses {
    pub attacker: u32,
    pub defender: u32,
}

impl RoundLosses {
    #[must_use]
    pub const fn new(attacker: u32, defender: u32) -> Self {
        Self { attacker, defender }
    }

    /// Total armies removed this round.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.attacker + self.defender
    }
}

fn check_sides(attackers: u32, defenders: u32) -> Result<()> {
    if attackers == 0 || defenders == 0 {
        return Err(CombatError::invalid(format!(
            "round needs armies on both sides, got ({attackers}, {defenders})"
        )));
    }
    Ok(())
}

/// Compare two descending-sorted rolls pair by pair.
///
/// A strictly higher attacker die kills a defender; anything else,
/// ties included, kills an attacker.
#[must_use]
pub fn compare_dice(attack: &[u8], defence: &[u8]) -> RoundLosses {
    attack
        .iter()
        .zip(defence)
        .fold(RoundLosses::default(), |mut losses, (a, d)| {
            if a > d {
                losses.defender += 1;
            } else {
                losses.attacker += 1;
            }
            losses
        })
}

/// Roll one round with `attackers` fighting against `defenders`.
pub fn roll_round(attackers: u32, defenders: u32, rng: &mut CombatRng) -> Result<RoundLosses> {
    check_sides(attackers, defenders)?;
    let attack = rng.roll_dice(attackers.min(MAX_ATTACK_DICE) as usize);
    let defence = rng.roll_dice(defenders.min(MAX_DEFENCE_DICE) as usize);
    Ok(compare_dice(&attack, &defence))
}

/// Deterministic attrition: both sides lose `min(attackers, defenders)`.
pub fn attrition_round(attackers: u32, defenders: u32) -> Result<RoundLosses> {
    check_sides(attackers, defenders)?;
    let deaths = attackers.min(defenders);
    Ok(RoundLosses::new(deaths, deaths))
}

/// One round under either rule.
pub fn fight_round(
    attackers: u32,
    defenders: u32,
    stochastic: bool,
    rng: &mut CombatRng,
) -> Result<RoundLosses> {
    if stochastic {
        roll_round(attackers, defenders, rng)
    } else {
        attrition_round(attackers, defenders)
    }
}

/// Empirical frequencies of round outcomes.
#[derive(Clone, Debug, Default)]
pub struct RoundTally {
    counts: FxHashMap<RoundLosses, u32>,
    rounds: u32,
}

impl RoundTally {
    /// Rounds recorded.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Times `losses` came up.
    #[must_use]
    pub fn count(&self, losses: RoundLosses) -> u32 {
        self.counts.get(&losses).copied().unwrap_or(0)
    }

    /// Share of rounds that ended with `losses`.
    #[must_use]
    pub fn frequency(&self, losses: RoundLosses) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            f64::from(self.count(losses)) / f64::from(self.rounds)
        }
    }

    /// Outcomes seen, sorted.
    #[must_use]
    pub fn outcomes(&self) -> Vec<(RoundLosses, u32)> {
        let mut outcomes: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        outcomes.sort_unstable();
        outcomes
    }

    fn record(&mut self, losses: RoundLosses) {
        *self.counts.entry(losses).or_insert(0) += 1;
        self.rounds += 1;
    }
}

/// Roll `times` independent rounds and count each outcome.
pub fn tally_rounds(
    attackers: u32,
    defenders: u32,
    times: u32,
    rng: &mut CombatRng,
) -> Result<RoundTally> {
    let mut tally = RoundTally::default();
    for _ in 0..times {
        tally.record(roll_round(attackers, defenders, rng)?);
    }
    Ok(tally)
}
