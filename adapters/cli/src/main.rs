#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Elemental Defence sessions headlessly.

mod runner;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::session::SessionPlan;

/// Command-line arguments; flags override values read from the session file.
#[derive(Debug, Parser)]
#[command(name = "elemental-defence", version)]
#[command(about = "Replays an Elemental Defence build order without a screen")]
struct Cli {
    /// TOML session file holding the seed, build order and upgrade targets.
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Seed of the simulation random stream.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of waves that must be cleared for victory.
    #[arg(long)]
    waves: Option<u32>,

    /// Ticks simulated before the run is abandoned.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Run the simulation at double speed.
    #[arg(long)]
    fast: bool,
}

impl Cli {
    fn plan(&self) -> Result<SessionPlan> {
        let mut plan = match &self.session {
            Some(path) => SessionPlan::load(path)?,
            None => SessionPlan::default(),
        };
        if let Some(seed) = self.seed {
            plan.seed = seed;
        }
        if let Some(waves) = self.waves {
            anyhow::ensure!(waves > 0, "--waves must be at least 1");
            plan.waves = waves;
        }
        if let Some(max_ticks) = self.max_ticks {
            plan.max_ticks = max_ticks;
        }
        plan.fast |= self.fast;
        Ok(plan)
    }
}

/// Entry point for the Elemental Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let plan = Cli::parse().plan()?;
    let summary = runner::run(&plan);
    println!("{summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["elemental-defence", "--seed", "5", "--waves", "3", "--fast"]);
        let plan = cli.plan().expect("plan");
        assert_eq!(plan.seed, 5);
        assert_eq!(plan.waves, 3);
        assert!(plan.fast);
        assert_eq!(plan.max_ticks, session::DEFAULT_MAX_TICKS);
    }

    #[test]
    fn zero_waves_flag_is_rejected() {
        let cli = Cli::parse_from(["elemental-defence", "--waves", "0"]);
        assert!(cli.plan().is_err());
    }

    #[test]
    fn missing_session_file_reports_its_path() {
        let cli = Cli::parse_from(["elemental-defence", "--session", "no/such/session.toml"]);
        let error = cli.plan().expect_err("missing file");
        assert!(format!("{error:#}").contains("no/such/session.toml"));
    }
}
