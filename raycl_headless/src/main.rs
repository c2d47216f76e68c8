// CLI entry point for the headless raycl driver.
//
// Builds a world from a JSON config (or the defaults), replays an input
// script at a fixed 30 ms cadence, and prints the final camera pose as
// JSON. Set `RUST_LOG=debug` for a per-tick pose log.
//
// Usage:
//   raycl-headless [OPTIONS]
//     --config <PATH>   World config JSON (default: built-in defaults)
//     --script <PATH>   Input script JSON (default: built-in demo walk)
//     --ticks <N>       Number of ticks to run (default: 120)
//     --out <PATH>      Write the final 16 KiB world buffer here

use std::path::PathBuf;

use log::info;
use raycl_headless::{Script, TICK_MS, run};
use raycl_sim::{World, WorldConfig};

struct Options {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    ticks: u64,
    out: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let options = parse_args();

    let config = match &options.config {
        Some(path) => WorldConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => WorldConfig::default(),
    };
    let script = match &options.script {
        Some(path) => Script::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load script {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => Script::demo(),
    };
    let mut world = World::with_config(config).unwrap_or_else(|e| {
        eprintln!("Failed to build world: {e}");
        std::process::exit(1);
    });

    let report = run(&mut world, &script, options.ticks, TICK_MS);
    info!(
        "ran {} ticks ({} failed), {} ms simulated",
        report.ticks,
        report.failed_ticks,
        world.elapsed_ms()
    );

    if let Some(path) = &options.out
        && let Err(e) = std::fs::write(path, &report.last_frame.world)
    {
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }

    match serde_json::to_string_pretty(&report.last_frame.camera) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to encode camera pose: {e}");
            std::process::exit(1);
        }
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Options {
    let mut options = Options {
        config: None,
        script: None,
        ticks: 120,
        out: None,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                options.config = Some(path_arg(&args, i, "--config"));
            }
            "--script" => {
                i += 1;
                options.script = Some(path_arg(&args, i, "--script"));
            }
            "--ticks" => {
                i += 1;
                options.ticks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--ticks requires a valid number");
                    std::process::exit(1);
                });
            }
            "--out" => {
                i += 1;
                options.out = Some(path_arg(&args, i, "--out"));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn path_arg(args: &[String], i: usize, flag: &str) -> PathBuf {
    args.get(i).map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("{flag} requires a path");
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("Usage: raycl-headless [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>   World config JSON (default: built-in defaults)");
    println!("  --script <PATH>   Input script JSON (default: built-in demo walk)");
    println!("  --ticks <N>       Number of ticks to run (default: 120)");
    println!("  --out <PATH>      Write the final 16 KiB world buffer here");
    println!("  --help, -h        Show this help");
}
