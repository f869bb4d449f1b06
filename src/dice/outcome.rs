//! Per-round outcome distribution.
//!
//! `P(a, d, k)` is the probability that the defender loses exactly `k`
//! armies in one round when the attacker rolls `a` dice and the defender
//! rolls `d`. The whole table is 3 x 2 x 3 cells, so it is computed once
//! by exact enumeration and kept for the life of the process.
//!
//! ## Comparison rule
//!
//! Ranked dice are compared pairwise, highest against highest, then second
//! against second, for `min(a, d)` comparisons. The attacker wins a
//! comparison only with a strictly greater die; ties go to the defender.
//! Whoever loses a comparison loses one army.

use std::sync::OnceLock;

use crate::core::{CombatError, Result, MAX_ATTACK_DICE, MAX_DEFENCE_DICE};

use super::order_stats::{DiceModel, RankedRoll};

/// Most armies that can change hands in one round.
pub const MAX_ROUND_LOSSES: u32 = 2;

/// Exact per-round outcome probabilities for every dice combination.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcomeTable {
    /// Indexed `[attacker_dice - 1][defender_dice - 1][defender_losses]`.
    probs: [[[f64; 3]; 2]; 3],
}

impl RoundOutcomeTable {
    /// Build the table by enumerating ranked rolls on both sides.
    pub fn compute() -> Result<Self> {
        let mut probs = [[[0.0; 3]; 2]; 3];

        for attacker_dice in 1..=MAX_ATTACK_DICE {
            for defender_dice in 1..=MAX_DEFENCE_DICE {
                let cell = &mut probs[attacker_dice as usize - 1][defender_dice as usize - 1];
                let comparisons = attacker_dice.min(defender_dice);

                let attack = DiceModel::for_dice(attacker_dice)?.ranked_rolls();
                let defence = DiceModel::for_dice(defender_dice)?.ranked_rolls();

                for a in &attack {
                    for d in &defence {
                        let losses = defender_losses(a, d, comparisons);
                        cell[losses as usize] += a.probability * d.probability;
                    }
                }
            }
        }

        Ok(Self { probs })
    }

    /// The process-wide table, computed on first use.
    pub fn global() -> Result<&'static Self> {
        static TABLE: OnceLock<RoundOutcomeTable> = OnceLock::new();
        if let Some(table) = TABLE.get() {
            return Ok(table);
        }
        let table = Self::compute()?;
        Ok(TABLE.get_or_init(|| table))
    }

    /// Probability that the defender loses exactly `defender_losses` armies.
    ///
    /// Loss counts above `min(attackers, defenders)` are possible to ask
    /// about and have zero mass.
    pub fn probability(&self, attackers: u32, defenders: u32, defender_losses: u32) -> Result<f64> {
        validate(attackers, defenders, defender_losses)?;
        Ok(self.probs[attackers as usize - 1][defenders as usize - 1][defender_losses as usize])
    }

    /// Every valid `(attackers, defenders, defender_losses, probability)` cell.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, u32, f64)> + '_ {
        (1..=MAX_ATTACK_DICE).flat_map(move |a| {
            (1..=MAX_DEFENCE_DICE).flat_map(move |d| {
                (0..=a.min(d)).map(move |k| {
                    (a, d, k, self.probs[a as usize - 1][d as usize - 1][k as usize])
                })
            })
        })
    }
}

fn defender_losses(attack: &RankedRoll, defence: &RankedRoll, comparisons: u32) -> u32 {
    let mut losses = u32::from(attack.high > defence.high);
    if comparisons > 1 {
        if let (Some(a), Some(d)) = (attack.low, defence.low) {
            losses += u32::from(a > d);
        }
    }
    losses
}

fn validate(attackers: u32, defenders: u32, defender_losses: u32) -> Result<()> {
    if !(1..=MAX_ATTACK_DICE).contains(&attackers) {
        return Err(CombatError::invalid(format!(
            "{attackers} attacker dice, expected 1 to {MAX_ATTACK_DICE}"
        )));
    }
    if !(1..=MAX_DEFENCE_DICE).contains(&defenders) {
        return Err(CombatError::invalid(format!(
            "{defenders} defender dice, expected 1 to {MAX_DEFENCE_DICE}"
        )));
    }
    if defender_losses > MAX_ROUND_LOSSES {
        return Err(CombatError::invalid(format!(
            "{defender_losses} defender losses, expected 0 to {MAX_ROUND_LOSSES}"
        )));
    }
    Ok(())
}

/// `P(attackers, defenders, defender_losses)` from the process-wide table.
///
/// ```
/// use conquest_combat::dice::round_outcome_probability;
///
/// let p = round_outcome_probability(1, 1, 1).unwrap();
/// assert!((p - 15.0 / 36.0).abs() < 1e-12);
/// ```
pub fn round_outcome_probability(attackers: u32, defenders: u32, defender_losses: u32) -> Result<f64> {
    RoundOutcomeTable::global()?.probability(attackers, defenders, defender_losses)
}

/// Like [`round_outcome_probability`] but with army counts, capped to the dice each side rolls.
pub fn capped_outcome_probability(
    attacking_armies: u32,
    defending_armies: u32,
    defender_losses: u32,
) -> Result<f64> {
    if attacking_armies == 0 || defending_armies == 0 {
        return Err(CombatError::invalid(format!(
            "battle ({attacking_armies}, {defending_armies}) has no round to roll"
        )));
    }
    round_outcome_probability(
        attacking_armies.min(MAX_ATTACK_DICE),
        defending_armies.min(MAX_DEFENCE_DICE),
        defender_losses,
    )
}
