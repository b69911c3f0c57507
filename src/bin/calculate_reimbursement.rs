//! Prints the reimbursement for one trip.
//!
//! ```text
//! calculate-reimbursement <trip_duration_days> <miles_traveled> <total_receipts_amount>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use travel_reimbursement::calculation::ReimbursementCalculator;
use travel_reimbursement::config::ConfigLoader;
use travel_reimbursement::error::EngineResult;
use travel_reimbursement::logging;

const USAGE: &str =
    "Usage: calculate-reimbursement <trip_duration_days> <miles_traveled> <total_receipts_amount>";

#[derive(Debug, Parser)]
#[command(name = "calculate-reimbursement")]
#[command(about = "Compute the travel reimbursement for a single trip")]
struct Cli {
    /// Trip duration in days
    #[arg(allow_negative_numbers = true)]
    trip_duration_days: String,

    /// Total miles traveled
    #[arg(allow_negative_numbers = true)]
    miles_traveled: String,

    /// Total receipt amount
    #[arg(allow_negative_numbers = true)]
    total_receipts_amount: String,

    /// YAML constant set to use instead of the built-in legacy constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> EngineResult<String> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::legacy(),
    };
    let calculator = ReimbursementCalculator::new(loader.into_config())?;

    let amount = calculator.compute_str(
        &cli.trip_duration_days,
        &cli.miles_traveled,
        &cli.total_receipts_amount,
    )?;
    Ok(format!("{:.2}", amount))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    logging::init_cli_logger(cli.verbose);

    match run(&cli) {
        Ok(amount) => {
            println!("{}", amount);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}
