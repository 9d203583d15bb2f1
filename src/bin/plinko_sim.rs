//! Windowless batch drops: how do balls spread over the slots?

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use plinko::GameConfig;
use plinko::modules::config::BoardConfig;
use plinko::modules::headless::{BatchSpec, run_batch};
use plinko::modules::perturb::PerturbationTable;

#[derive(Parser, Debug)]
#[command(name = "plinko-sim", about = "Drop many Plinko balls without a window and report the slot distribution")]
struct Args {
    /// JSON config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the 10-row, 11-slot board instead of the config's board
    #[arg(long)]
    ten_rows: bool,

    /// Balls dropped per run
    #[arg(long, default_value_t = 200)]
    balls: u32,

    /// Independent runs (parallel)
    #[arg(long, default_value_t = 4)]
    runs: u32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Ticks between drops
    #[arg(long, default_value_t = 15)]
    interval: u32,

    /// Tick budget per run
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u32,

    /// Wager per ball; 0 drops without wagering
    #[arg(long)]
    wager: Option<f64>,

    /// Gravity jitter table: three_tier or two_tier
    #[arg(long, value_parser = parse_table)]
    table: Option<PerturbationTable>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn parse_table(s: &str) -> Result<PerturbationTable, String> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "three_tier" | "three" => Ok(PerturbationTable::ThreeTier),
        "two_tier" | "two" => Ok(PerturbationTable::TwoTier),
        other => Err(format!("unknown table '{other}'")),
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match GameConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    if args.ten_rows {
        config.board = BoardConfig::ten_rows();
    }
    if let Some(table) = args.table {
        config.perturbation.table = table;
    }
    match args.wager {
        Some(w) if w > 0.0 => {
            config.wagering = true;
            config.default_wager = w;
        }
        Some(_) => config.wagering = false,
        None => {}
    }

    let spec = BatchSpec {
        balls_per_run: args.balls,
        runs: args.runs,
        seed: args.seed,
        drop_interval: args.interval,
        max_ticks: args.max_ticks,
    };

    let report = match run_batch(&config, &spec) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode report: {e}");
            ExitCode::FAILURE
        }
    }
}
