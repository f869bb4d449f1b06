//! Attack resolution integration tests.

use conquest_combat::combat::{
    resolve_attack, AlwaysContinue, AnalyticResolver, AttackRequest, AttackResolver,
    BattleProgress, FavourableOdds, RoundResolver, WithdrawBelow,
};
use conquest_combat::core::{CombatConfig, CombatError, CombatRng};
use conquest_combat::estimator::ProbabilityCache;

fn deterministic() -> CombatConfig {
    CombatConfig::default().deterministic()
}

fn analytic() -> CombatConfig {
    CombatConfig::default().with_analytic(true)
}

// =============================================================================
// Deterministic Mode
// =============================================================================

#[test]
fn test_end_to_end_deterministic_conquest() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(0);
    let request = AttackRequest::new(5, 1, 4);

    let outcome = resolve_attack(&deterministic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

    assert!(outcome.conquered);
    assert_eq!(outcome.defender_losses, 1);
    assert_eq!(outcome.attacker_losses, 1);
    // Four would empty the attacking territory, which the rules forbid,
    // so the move is capped at the three armies that can leave.
    assert_eq!(outcome.armies_moved, 3);
    assert_eq!(outcome.attacking_armies_after(&request), 1);
}

#[test]
fn test_deterministic_one_loss_each_per_round() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(0);
    let request = AttackRequest::new(4, 1, 3);

    let outcome = resolve_attack(&deterministic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

    assert_eq!(outcome.rounds, Some(1));
    assert_eq!(outcome.attacker_losses, 1);
    assert_eq!(outcome.defender_losses, 1);
    assert!(outcome.conquered);
}

#[test]
fn test_deterministic_failed_attack() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(0);
    let request = AttackRequest::new(3, 5, 2).with_move_request(2);

    let outcome = resolve_attack(&deterministic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

    assert!(!outcome.conquered);
    assert_eq!(outcome.attacker_losses, 2);
    assert_eq!(outcome.defender_losses, 2);
    assert_eq!(outcome.armies_moved, 0);
    assert_eq!(outcome.defending_armies_after(&request), 3);
}

#[test]
fn test_deterministic_small_commitment_conquers() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(0);
    let request = AttackRequest::new(10, 5, 1);

    let outcome = resolve_attack(&deterministic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

    assert!(outcome.conquered);
    assert_eq!(outcome.rounds, Some(5));
    assert_eq!(outcome.attacker_losses, 5);
    assert_eq!(outcome.defender_losses, 5);
    assert_eq!(outcome.defending_armies_after(&request), 1);
}

// =============================================================================
// Analytic Mode
// =============================================================================

#[test]
fn test_analytic_four_against_one() {
    let cache = ProbabilityCache::new();
    let mut conquests = 0;

    for seed in 0..200 {
        let mut rng = CombatRng::new(seed);
        let request = AttackRequest::new(5, 1, 4);
        let outcome = resolve_attack(&analytic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

        assert!(outcome.attacker_losses <= 4);
        if outcome.conquered {
            conquests += 1;
            assert_eq!(outcome.defender_losses, 1);
            assert!(outcome.armies_moved >= 4 - outcome.attacker_losses);
        } else {
            assert_eq!(outcome.attacker_losses, 4);
        }
    }

    // Four attackers lose to one defender under 3% of the time.
    assert!(conquests >= 180, "{conquests} conquests");
    assert_eq!(cache.stats().rebuilds, 1);
}

#[test]
fn test_analytic_same_seed_same_outcome() {
    let cache = ProbabilityCache::new();
    let request = AttackRequest::new(12, 8, 11).with_move_request(5);

    let mut rng1 = CombatRng::new(77);
    let mut rng2 = CombatRng::new(77);
    let first = AnalyticResolver::new(&cache).resolve(&request, &AlwaysContinue, &mut rng1).unwrap();
    let second = AnalyticResolver::new(&cache).resolve(&request, &AlwaysContinue, &mut rng2).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.rounds, None);
}

#[test]
fn test_analytic_losses_are_terminal() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(5);
    for _ in 0..100 {
        let request = AttackRequest::new(9, 6, 8);
        let outcome = resolve_attack(&analytic(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();
        // Either every defender or every committed attacker is gone.
        assert!(outcome.defender_losses == 6 || outcome.attacker_losses == 8);
        assert_eq!(outcome.conquered, outcome.defender_losses == 6);
    }
}

// =============================================================================
// Rolled Mode
// =============================================================================

#[test]
fn test_rolled_battle_runs_to_decision() {
    let cache = ProbabilityCache::new();
    let config = CombatConfig::default().with_seed(3);
    let mut rng = CombatRng::new(config.seed);

    for _ in 0..100 {
        let request = AttackRequest::new(8, 5, 7);
        let outcome = resolve_attack(&config, &cache, &request, &AlwaysContinue, &mut rng).unwrap();
        assert!(outcome.conquered || outcome.attacker_losses == 7);
        assert!(outcome.rounds.unwrap() >= 3);
    }
    // Rolled mode never consults the cache.
    assert_eq!(cache.stats(), Default::default());
}

#[test]
fn test_rolled_single_die_commitment_runs_until_territory_spent() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(21);

    for _ in 0..100 {
        let request = AttackRequest::new(10, 5, 1);
        let outcome = resolve_attack(&CombatConfig::default(), &cache, &request, &AlwaysContinue, &mut rng).unwrap();

        // One die a round, so one army lost a round.
        assert_eq!(Some(outcome.attacker_losses + outcome.defender_losses), outcome.rounds);
        assert!(outcome.conquered || outcome.attacking_armies_after(&request) == 1);
        if outcome.conquered {
            assert_eq!(outcome.defender_losses, 5);
            assert!(outcome.armies_moved >= 1);
        } else {
            assert_eq!(outcome.attacker_losses, 9);
        }
    }
}

#[test]
fn test_rolled_and_analytic_agree_on_odds() {
    let cache = ProbabilityCache::new();
    let request = AttackRequest::new(7, 5, 6);
    let exact = cache.win_probability(6, 5).unwrap();

    let mut rng = CombatRng::new(123);
    let resolver = RoundResolver::from_config(&CombatConfig::default());
    let wins = (0..4000)
        .filter(|_| {
            resolver
                .resolve(&request, &AlwaysContinue, &mut rng)
                .unwrap()
                .conquered
        })
        .count() as f64
        / 4000.0;

    assert!((wins - exact).abs() < 0.03, "rolled {wins}, exact {exact}");
}

#[test]
fn test_withdrawal_without_death_or_glory() {
    let cache = ProbabilityCache::new();
    let config = CombatConfig::default().with_force_continuation(false);
    let mut rng = CombatRng::new(8);

    let request = AttackRequest::new(11, 10, 10);
    let policy = WithdrawBelow { min_attackers: 8 };
    let outcome = resolve_attack(&config, &cache, &request, &policy, &mut rng).unwrap();

    if !outcome.conquered {
        // Stopped as soon as fewer than 8 armies could fight on.
        assert!(10 - outcome.attacker_losses < 8);
        assert!(10 - outcome.attacker_losses >= 6);
    }
}

#[test]
fn test_favourable_odds_policy() {
    let cache = ProbabilityCache::new();
    cache.warm(20, 20).unwrap();
    let config = CombatConfig::default().with_force_continuation(false);
    let policy = FavourableOdds {
        cache: &cache,
        threshold: 0.6,
    };
    let mut rng = CombatRng::new(4);

    // Hopeless from the start: no dice are rolled.
    let request = AttackRequest::new(3, 12, 2);
    let outcome = resolve_attack(&config, &cache, &request, &policy, &mut rng).unwrap();
    assert_eq!(outcome.rounds, Some(0));
    assert!(!outcome.conquered);
}

#[test]
fn test_closure_policy_limits_rounds() {
    let cache = ProbabilityCache::new();
    let config = CombatConfig::default().with_force_continuation(false);
    let mut rng = CombatRng::new(10);
    let two_rounds = |p: &BattleProgress| p.rounds < 2;

    let outcome = resolve_attack(&config, &cache, &AttackRequest::new(20, 20, 19), &two_rounds, &mut rng).unwrap();
    assert_eq!(outcome.rounds, Some(2));
    assert_eq!(outcome.attacker_losses + outcome.defender_losses, 4);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_overcommit_in_every_mode() {
    let cache = ProbabilityCache::new();
    let mut rng = CombatRng::new(0);
    for config in [deterministic(), analytic(), CombatConfig::default()] {
        let result = resolve_attack(&config, &cache, &AttackRequest::new(3, 2, 5), &AlwaysContinue, &mut rng);
        assert!(matches!(
            result,
            Err(CombatError::Overcommit {
                committed: 5,
                available: 3
            })
        ));
    }
}
