#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays out a seeded HexMage skirmish.

mod generator;
mod skirmish;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use crate::skirmish::SkirmishConfig;

/// Runs a seeded auto-battle between generated teams on a hex map.
#[derive(Parser, Debug)]
#[command(name = "hexmage")]
struct Args {
    /// Edge length of the square map.
    #[arg(long, default_value_t = 12)]
    size: usize,

    /// Number of competing teams.
    #[arg(long, default_value_t = 2)]
    teams: u32,

    /// Mobs generated for each team.
    #[arg(long, default_value_t = 3)]
    mobs_per_team: u32,

    /// Seed for map and roster generation.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Chance that a free cell becomes a wall.
    #[arg(long, default_value_t = 0.15)]
    wall_density: f64,

    /// Rounds played before the battle is called a draw.
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl From<&Args> for SkirmishConfig {
    fn from(args: &Args) -> Self {
        Self {
            size: args.size,
            teams: args.teams,
            mobs_per_team: args.mobs_per_team,
            seed: args.seed,
            wall_density: args.wall_density,
            max_rounds: args.max_rounds,
        }
    }
}

/// Entry point for the HexMage command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args = Args::parse();
    let summary = skirmish::run(&SkirmishConfig::from(&args)).context("skirmish failed")?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("failed to encode the summary")?;
        println!("{json}");
    } else {
        print!("{summary}");
    }
    Ok(())
}
