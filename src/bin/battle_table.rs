//! Reference Tables
//!
//! Prints the exact per-round outcome table and a grid of whole-battle
//! win probabilities, optionally checked against rolled dice.

use clap::Parser;
use conquest_combat::combat::{tally_rounds, RoundLosses};
use conquest_combat::core::{CacheConfig, CombatRng};
use conquest_combat::dice::RoundOutcomeTable;
use conquest_combat::estimator::ProbabilityCache;

/// Exact battle odds for the conquest dice rules
#[derive(Parser, Debug)]
#[command(name = "battle_table")]
#[command(about = "Print per-round and whole-battle outcome probabilities")]
struct Args {
    /// Largest attacker count in the win-probability grid
    #[arg(long, default_value_t = 10)]
    attackers: u32,

    /// Largest defender count in the win-probability grid
    #[arg(long, default_value_t = 10)]
    defenders: u32,

    /// Rounds to roll per dice combination for an empirical check (0 = skip)
    #[arg(long, default_value_t = 0)]
    rolls: u32,

    /// Random seed for the empirical check
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Transient-state ceiling for the probability cache
    #[arg(long, default_value_t = 10_000)]
    max_states: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> conquest_combat::Result<()> {
    let table = RoundOutcomeTable::global()?;
    let mut rng = CombatRng::new(args.seed);

    println!("attackers defenders defender_losses probability");
    for (a, d, k, p) in table.entries() {
        if args.rolls > 0 {
            let tally = tally_rounds(a, d, args.rolls, &mut rng)?;
            let observed = tally.frequency(RoundLosses::new(a.min(d) - k, k));
            println!("{a:>9} {d:>9} {k:>15} {p:>11.3}  (rolled {observed:.3})");
        } else {
            println!("{a:>9} {d:>9} {k:>15} {p:>11.3}");
        }
    }

    let cache = ProbabilityCache::with_config(CacheConfig::default().with_max_states(args.max_states));
    cache.warm(args.attackers, args.defenders)?;

    println!();
    print!("A\\D");
    for d in 1..=args.defenders {
        print!("{d:>6}");
    }
    println!();
    for a in 1..=args.attackers {
        print!("{a:>3}");
        for d in 1..=args.defenders {
            print!("{:>6.3}", cache.win_probability(a, d)?);
        }
        println!();
    }

    let stats = cache.stats();
    tracing::info!(
        hits = stats.hits,
        rebuilds = stats.rebuilds,
        "win-probability grid complete"
    );
    Ok(())
}
