//! Dice probability model.
//!
//! - `order_stats`: closed-form distributions of the top one or two dice
//! - `outcome`: exact per-round loss probabilities built from them

pub mod order_stats;
pub mod outcome;

pub use order_stats::{
    single_die, top_two_of_three, top_two_of_three_marginal, top_two_of_two,
    top_two_of_two_marginal, DiceModel, RankedRoll,
};
pub use outcome::{
    capped_outcome_probability, round_outcome_probability, RoundOutcomeTable, MAX_ROUND_LOSSES,
};
