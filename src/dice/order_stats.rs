//! Order statistics of one, two or three fair six-sided dice.
//!
//! Combat only ever looks at the highest and second-highest die on each
//! side, so each dice count is modelled by the joint distribution of its
//! top two ranked values. Faces outside `1..=6`, and pairs with
//! `low > high`, carry zero mass.

use smallvec::SmallVec;

use crate::core::{CombatError, Result, DIE_FACES};

#[inline]
fn is_face(value: u8) -> bool {
    (1..=DIE_FACES).contains(&value)
}

/// Probability that a single die shows `value`.
#[must_use]
pub fn single_die(value: u8) -> f64 {
    if is_face(value) {
        1.0 / 6.0
    } else {
        0.0
    }
}

/// Joint probability that two dice, ranked, show `high` then `low`.
///
/// Doubles come up one way in 36, distinct ranked pairs two ways.
#[must_use]
pub fn top_two_of_two(high: u8, low: u8) -> f64 {
    if !is_face(high) || !is_face(low) || low > high {
        0.0
    } else if high == low {
        1.0 / 36.0
    } else {
        2.0 / 36.0
    }
}

/// Probability that the higher of two dice equals `high`.
#[must_use]
pub fn top_two_of_two_marginal(high: u8) -> f64 {
    if !is_face(high) {
        return 0.0;
    }
    (2.0 * f64::from(high) - 1.0) / 36.0
}

/// Joint probability that the top two of three dice, ranked, are `high` and `low`.
#[must_use]
pub fn top_two_of_three(high: u8, low: u8) -> f64 {
    if !is_face(high) || !is_face(low) || low > high {
        0.0
    } else if high == low {
        (3.0 * f64::from(high) - 2.0) / 216.0
    } else {
        (6.0 * f64::from(low) - 3.0) / 216.0
    }
}

/// Probability that the highest of three dice equals `high`.
///
/// Summing the joint over every `low <= high` gives
/// `(3h - 2 + 3(h - 1)^2) / 216 = (3h^2 - 3h + 1) / 216`, which is also
/// `(h^3 - (h - 1)^3) / 216`.
#[must_use]
pub fn top_two_of_three_marginal(high: u8) -> f64 {
    if !is_face(high) {
        return 0.0;
    }
    let h = f64::from(high);
    (3.0 * h * h - 3.0 * h + 1.0) / 216.0
}

/// A ranked roll: the top die, the second die when one was rolled, and its mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedRoll {
    pub high: u8,
    pub low: Option<u8>,
    pub probability: f64,
}

/// Distribution model picked by the number of dice in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiceModel {
    /// One die, uniform.
    Single,
    /// Two dice, ranked.
    TopTwoOfTwo,
    /// Top two of three dice, ranked.
    TopTwoOfThree,
}

impl DiceModel {
    /// Pick the model for `dice` dice. Only 1 to 3 dice are ever rolled.
    pub fn for_dice(dice: u32) -> Result<Self> {
        match dice {
            1 => Ok(Self::Single),
            2 => Ok(Self::TopTwoOfTwo),
            3 => Ok(Self::TopTwoOfThree),
            other => Err(CombatError::invalid(format!(
                "{other} dice in one roll, expected 1 to 3"
            ))),
        }
    }

    /// Joint mass of a ranked roll. `low` is ignored for a single die.
    #[must_use]
    pub fn joint(self, high: u8, low: u8) -> f64 {
        match self {
            Self::Single => single_die(high),
            Self::TopTwoOfTwo => top_two_of_two(high, low),
            Self::TopTwoOfThree => top_two_of_three(high, low),
        }
    }

    /// Mass of the top die alone.
    #[must_use]
    pub fn marginal(self, high: u8) -> f64 {
        match self {
            Self::Single => single_die(high),
            Self::TopTwoOfTwo => top_two_of_two_marginal(high),
            Self::TopTwoOfThree => top_two_of_three_marginal(high),
        }
    }

    /// Every ranked roll with non-zero mass.
    #[must_use]
    pub fn ranked_rolls(self) -> SmallVec<[RankedRoll; 21]> {
        let mut rolls = SmallVec::new();
        for high in 1..=DIE_FACES {
            if self == Self::Single {
                rolls.push(RankedRoll {
                    high,
                    low: None,
                    probability: single_die(high),
                });
                continue;
            }
            for low in 1..=high {
                rolls.push(RankedRoll {
                    high,
                    low: Some(low),
                    probability: self.joint(high, low),
                });
            }
        }
        rolls
    }
}
