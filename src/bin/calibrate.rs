//! Offline calibration reports over a labeled case file.
//!
//! ```text
//! calibrate evaluate --cases public_cases.json [--config config/legacy.yaml]
//! calibrate compare  --cases public_cases.json --config a.yaml --config b.yaml
//! calibrate grid     --cases public_cases.json
//! calibrate fit      --cases public_cases.json [--features quadratic]
//! calibrate summary  --cases public_cases.json
//! ```
//!
//! Every report is printed to stdout as pretty JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use travel_reimbursement::calculation::ReimbursementCalculator;
use travel_reimbursement::calibration::{
    DEFAULT_WORST_CASES, FeatureSet, LinearGrid, evaluate, least_squares_fit, linear_grid_search,
    load_cases, rank_configs, summarize_cases,
};
use travel_reimbursement::config::{ConfigLoader, ReimbursementConfig};
use travel_reimbursement::logging;

#[derive(Debug, Parser)]
#[command(name = "calibrate")]
#[command(about = "Compare reimbursement constants against labeled cases")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay the cases through one constant set
    Evaluate {
        /// Labeled case file (JSON)
        #[arg(long)]
        cases: PathBuf,
        /// YAML constant set; defaults to the built-in legacy constants
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of worst residuals to report
        #[arg(long, default_value_t = DEFAULT_WORST_CASES)]
        worst: usize,
    },
    /// Rank several constant sets by score
    Compare {
        /// Labeled case file (JSON)
        #[arg(long)]
        cases: PathBuf,
        /// YAML constant sets to compare; the legacy constants are always included
        #[arg(long = "config")]
        configs: Vec<PathBuf>,
        /// Number of worst residuals to report per constant set
        #[arg(long, default_value_t = 0)]
        worst: usize,
    },
    /// Grid-search a flat linear formula
    Grid {
        /// Labeled case file (JSON)
        #[arg(long)]
        cases: PathBuf,
    },
    /// Least-squares fit of a feature set
    Fit {
        /// Labeled case file (JSON)
        #[arg(long)]
        cases: PathBuf,
        /// Feature set to fit
        #[arg(long, value_enum, default_value_t = Features::Linear)]
        features: Features,
    },
    /// Ranges and per-duration statistics of the cases
    Summary {
        /// Labeled case file (JSON)
        #[arg(long)]
        cases: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Features {
    Linear,
    Quadratic,
}

impl From<Features> for FeatureSet {
    fn from(features: Features) -> Self {
        match features {
            Features::Linear => FeatureSet::Linear,
            Features::Quadratic => FeatureSet::Quadratic,
        }
    }
}

fn load_config(path: &Path) -> Result<ReimbursementConfig> {
    let loader = ConfigLoader::load(path)
        .with_context(|| format!("loading constants from {}", path.display()))?;
    Ok(loader.into_config())
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Evaluate {
            cases,
            config,
            worst,
        } => {
            let cases = load_cases(&cases)?;
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ConfigLoader::legacy().into_config(),
            };
            let calculator = ReimbursementCalculator::new(config)?;
            print_json(&evaluate(&calculator, &cases, worst)?)
        }
        Command::Compare {
            cases,
            configs,
            worst,
        } => {
            let cases = load_cases(&cases)?;
            let mut candidates = vec![ConfigLoader::legacy().into_config()];
            for path in &configs {
                candidates.push(load_config(path)?);
            }
            print_json(&rank_configs(candidates, &cases, worst)?)
        }
        Command::Grid { cases } => {
            let cases = load_cases(&cases)?;
            print_json(&linear_grid_search(&cases, &LinearGrid::default())?)
        }
        Command::Fit { cases, features } => {
            let cases = load_cases(&cases)?;
            print_json(&least_squares_fit(&cases, features.into())?)
        }
        Command::Summary { cases } => {
            let cases = load_cases(&cases)?;
            print_json(&summarize_cases(&cases)?)
        }
    }
}
