//! Dungeon balance simulator CLI.
//!
//! Runs seeded heroes through the real engine to see how a tier pays out.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                     # Default: 1000 heroes at tier E
//!   cargo run --bin simulate -- -n 100 -t C     # 100 heroes at tier C
//!   cargo run --bin simulate -- --seed 42       # Reproducible run

use solo_ascent::simulator::{run_simulation, SimConfig};
use solo_ascent::utils::build_info::{BUILD_COMMIT, BUILD_DATE};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some((config, json)) = parse_args(&args) else {
        return ExitCode::SUCCESS;
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SOLO ASCENT DUNGEON SIMULATOR                    ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Tier:           {}", config.tier);
    println!("  Dungeons/Run:   {}", config.dungeons_per_run);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report.to_text());

    if json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        if let Err(e) = std::fs::write(&filename, report.to_json()) {
            eprintln!("failed to write {filename}: {e}");
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

/// Returns None when the invocation only asked for help or the version.
fn parse_args(args: &[String]) -> Option<(SimConfig, bool)> {
    let mut config = SimConfig::default();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-t" | "--tier" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(tier) => config.tier = tier,
                        Err(e) => eprintln!("{e}, keeping tier {}", config.tier),
                    }
                    i += 1;
                }
            }
            "-d" | "--dungeons" => {
                if i + 1 < args.len() {
                    config.dungeons_per_run = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--json" => {
                json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-V" | "--version" => {
                println!(
                    "simulate {} ({} {})",
                    env!("CARGO_PKG_VERSION"),
                    BUILD_COMMIT,
                    BUILD_DATE
                );
                return None;
            }
            "-h" | "--help" => {
                print_help();
                return None;
            }
            _ => {}
        }
        i += 1;
    }

    Some((config, json))
}

fn print_help() {
    println!("Solo Ascent Dungeon Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>       Number of simulated heroes (default: 1000)");
    println!("    -t, --tier <T>       Dungeon tier E, D, C, B, A or S (default: E)");
    println!("    -d, --dungeons <D>   Dungeons per hero (default: 10)");
    println!("    -s, --seed <S>       Random seed for reproducibility");
    println!("    --json               Also write the report as JSON");
    println!("    -v, --verbose        Print every run");
    println!("    -V, --version        Print version and build info");
    println!("    -h, --help           Print this help");
    println!();
    println!("Set RUST_LOG=debug to trace engine events.");
}
