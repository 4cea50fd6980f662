//! Offline Q-learning training job. Runs the full simulated schedule and
//! writes the canonical Q-table snapshot the service loads at startup.
//!
//! Usage:
//!   cargo run --bin train -- [--episodes 2000] [--seed 42] [--out models/q_table.json]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use talentgate::rl::trainer::{train, TrainerConfig};
use talentgate::rl::ACTIONS;

struct Args {
    config: TrainerConfig,
    out: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut config = TrainerConfig::default();
    let mut out = PathBuf::from("models/q_table.json");
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--episodes" => {
                let v = args.next().context("Missing value for --episodes")?;
                config.episodes = v.parse().context("--episodes must be an integer")?;
            }
            "--seed" => {
                let v = args.next().context("Missing value for --seed")?;
                config.seed = v.parse().context("--seed must be an integer")?;
            }
            "--out" => {
                let v = args.next().context("Missing value for --out")?;
                out = PathBuf::from(v);
            }
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(Args { config, out })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args = parse_args()?;
    info!(
        "Training: {} episodes x {} steps, seed {}",
        args.config.episodes, args.config.steps_per_episode, args.config.seed
    );

    let table = train(&args.config);
    table.save(&args.out)?;
    info!(
        "Saved Q-table snapshot ({} states) to {}",
        table.len(),
        args.out.display()
    );

    // Quick sanity summary: mean value per action over all visited states.
    let mut sums = [0.0f64; 4];
    let mut count = 0u32;
    for state in table.states() {
        let values = table.values(state);
        for (i, v) in values.iter().enumerate() {
            sums[i] += v;
        }
        count += 1;
    }
    if count > 0 {
        for action in ACTIONS {
            info!(
                "mean value {}: {:.4}",
                action.as_str(),
                sums[action.index()] / f64::from(count)
            );
        }
    }

    Ok(())
}
