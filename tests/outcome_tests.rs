//! Round outcome table integration tests.

use conquest_combat::combat::{tally_rounds, RoundLosses};
use conquest_combat::core::{CombatError, CombatRng};
use conquest_combat::dice::{
    round_outcome_probability, top_two_of_three, top_two_of_three_marginal, DiceModel,
    RoundOutcomeTable,
};

// =============================================================================
// Distribution Tests
// =============================================================================

#[test]
fn test_every_cell_sums_to_one() {
    for attackers in 1..=3 {
        for defenders in 1..=2 {
            let total: f64 = (0..=2)
                .map(|k| round_outcome_probability(attackers, defenders, k).unwrap())
                .sum();
            assert!(
                (total - 1.0).abs() < 1e-9,
                "({attackers}, {defenders}) sums to {total}"
            );
        }
    }
}

#[test]
fn test_known_reference_values() {
    let close = |a, d, k, v: f64| (round_outcome_probability(a, d, k).unwrap() - v).abs() < 5e-4;

    assert!(close(1, 1, 1, 0.417));
    assert!(close(1, 1, 0, 0.583));
    assert!(close(3, 2, 2, 0.372));
    assert!(close(3, 2, 1, 0.336));
    assert!(close(3, 2, 0, 0.293));
}

#[test]
fn test_more_dice_never_hurt_attacker() {
    for defenders in 1..=2 {
        let lose_nothing = |a| round_outcome_probability(a, defenders, 0).unwrap();
        assert!(lose_nothing(1) >= lose_nothing(2));
        assert!(lose_nothing(2) >= lose_nothing(3));
    }
}

#[test]
fn test_entries_match_lookup() {
    let table = RoundOutcomeTable::global().unwrap();
    for (a, d, k, p) in table.entries() {
        assert_eq!(round_outcome_probability(a, d, k).unwrap(), p);
    }
}

#[test]
fn test_out_of_range_parameters() {
    for (a, d, k) in [(0, 1, 0), (4, 2, 0), (1, 0, 0), (1, 3, 0), (3, 2, 3)] {
        assert!(matches!(
            round_outcome_probability(a, d, k),
            Err(CombatError::InvalidCombatParameters(_))
        ));
    }
}

// =============================================================================
// Order Statistics Tests
// =============================================================================

#[test]
fn test_three_dice_marginal_rederived_from_joint() {
    // The top-die marginal for three dice is the joint summed over the
    // second die, and must integrate to one over faces 1..=6.
    let mut total = 0.0;
    for high in 1..=6u8 {
        let summed: f64 = (1..=high).map(|low| top_two_of_three(high, low)).sum();
        assert!((summed - top_two_of_three_marginal(high)).abs() < 1e-12);
        total += top_two_of_three_marginal(high);
    }
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn test_dice_model_marginals_integrate_to_one() {
    for dice in 1..=3 {
        let model = DiceModel::for_dice(dice).unwrap();
        let total: f64 = (1..=6).map(|h| model.marginal(h)).sum();
        assert!((total - 1.0).abs() < 1e-12, "{dice} dice");
    }
}

// =============================================================================
// Empirical Agreement
// =============================================================================

#[test]
fn test_rolled_rounds_agree_with_table() {
    let mut rng = CombatRng::new(99);
    for (a, d, k, p) in RoundOutcomeTable::global().unwrap().entries() {
        let tally = tally_rounds(a, d, 10_000, &mut rng).unwrap();
        let observed = tally.frequency(RoundLosses::new(a.min(d) - k, k));
        assert!(
            (observed - p).abs() < 0.025,
            "P({a}, {d}, {k}) = {p}, rolled {observed}"
        );
    }
}
