use crate::field::FieldKind;
use crate::policy::{Policy, PolicyKind, DEFAULT_SPREAD_CHANCE};
use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

const MIN_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 1000;

#[derive(Parser, Debug, Clone)]
#[command(name = "trailfade")]
#[command(about = "Paint with the mouse and watch the trail fade. Any key quits.")]
pub(crate) struct Settings {
    /// ms between simulation ticks (10..=1000)
    #[arg(long, default_value_t = 50)]
    pub(crate) tick_ms: u64,

    /// how a fresh trail spreads to its neighbors
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    pub(crate) policy: PolicyKind,

    /// storage for the trail
    #[arg(long, value_enum, default_value_t = FieldKind::Grid)]
    pub(crate) field: FieldKind,

    /// chance per neighbor for --policy random
    #[arg(long, default_value_t = DEFAULT_SPREAD_CHANCE)]
    pub(crate) spread_chance: f64,

    /// fixed RNG seed for a repeatable run
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// append logs here (RUST_LOG filters, default info)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }

    pub(crate) fn spread_policy(&self) -> Policy {
        Policy::from_kind(self.policy, self.spread_chance)
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// The terminal owns stdout, so logs only go to a file; without one they are
/// discarded.
pub(crate) fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}
