#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted game of snake in the terminal.

mod config;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_core::Command;
use snake_system_gameplay::Gameplay;
use snake_world::{self as world, query, World};

use crate::{config::Config, script::Script};

const DEFAULT_TICKS: usize = 32;

/// Plays a scripted game of snake and prints the board after every tick.
#[derive(Debug, Parser)]
#[command(name = "snake", version)]
struct Args {
    /// TOML file describing the board, the snake and the run.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the seed used for apple placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate; defaults to the script length or 32.
    #[arg(long)]
    ticks: Option<usize>,
    /// One move per tick: U, D, L, R to steer, + and - to hold and release
    /// the speed-up modifier, . to do nothing.
    #[arg(long, default_value = "")]
    moves: String,
    /// Log gameplay events at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    config.validate().context("invalid configuration")?;
    let script: Script = args.moves.parse().context("invalid --moves script")?;
    let ticks = args
        .ticks
        .unwrap_or_else(|| script.len().max(DEFAULT_TICKS));

    let mut world = World::new(config.setup());
    let mut gameplay = Gameplay::new(&world, ChaCha8Rng::seed_from_u64(config.run.seed));
    let mut events = Vec::new();
    let dt = config.tick();

    println!("{}", query::occupancy(&world));
    for tick in 0..ticks {
        if let Some(command) = script.command(tick) {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::IntegrateMotion { dt }, &mut events);
        let status = gameplay
            .advance(&mut world, &mut events)
            .with_context(|| format!("gameplay contract broken on tick {tick}"))?;

        for event in events.drain(..) {
            debug!("tick {tick}: {event:?}");
        }
        println!(
            "tick {tick}  score {}  speed-up {}",
            query::score(&world),
            query::is_speeding_up(&world)
        );
        println!("{}", query::occupancy(&world));

        if status.is_terminal() {
            info!("finished with {status:?} after {} ticks", tick + 1);
            break;
        }
    }
    Ok(())
}
