//! Allocate fixed-size chunks from one arena until a target total is reached or allocation fails.
//!
//! ```text
//! test_bruteforce [--target BYTES] [--chunk BYTES] [--min-chunk-size BYTES] [--json]
//! ```

use std::process::ExitCode;

extern crate bumpchain_allocator;

use bumpchain_allocator::{Arena, ArenaConfig, ArenaStats, MIN_CHUNK_SIZE};
use pico_args::Arguments;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// 4 MiB
const DEFAULT_TARGET: usize = 0x1000 * 1024;
const DEFAULT_CHUNK: usize = 1024;

struct Options {
    target: usize,
    chunk: usize,
    min_chunk_size: usize,
    json: bool,
}

#[derive(Serialize)]
struct Report {
    target: usize,
    chunk: usize,
    total: usize,
    stats: ArenaStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let config = ArenaConfig::default().with_min_chunk_size(options.min_chunk_size);
    let arena = match Arena::with_config(config, 0) {
        Ok(arena) => arena,
        Err(err) => {
            error!("failed to create arena: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = bruteforce(&arena, options.target, options.chunk);

    if options.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        if let Some(failure) = &report.failure {
            println!("Failed to allocate memory at {}: {failure}", report.total);
        }
        println!("Total memory allocated: {:#x}", report.total);
        println!("Nodes: {}", report.stats.nodes);
        println!("Capacity: {:#x}", report.stats.capacity);
        println!("Used: {:#x}", report.stats.used);
    }

    arena.destroy();
    ExitCode::SUCCESS
}

fn parse_args() -> Result<Options, pico_args::Error> {
    let mut args = Arguments::from_env();
    let options = Options {
        target: args.opt_value_from_str("--target")?.unwrap_or(DEFAULT_TARGET),
        chunk: args.opt_value_from_str("--chunk")?.unwrap_or(DEFAULT_CHUNK),
        min_chunk_size: args.opt_value_from_str("--min-chunk-size")?.unwrap_or(MIN_CHUNK_SIZE),
        json: args.contains("--json"),
    };
    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {rest:?}"),
        });
    }
    // A zero-sized chunk never reaches the target
    if options.chunk == 0 {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: "--chunk must be greater than 0".to_string(),
        });
    }
    Ok(options)
}

fn bruteforce(arena: &Arena, target: usize, chunk: usize) -> Report {
    let mut total = 0;
    let mut failure = None;
    while total < target {
        if let Err(err) = arena.alloc(chunk) {
            failure = Some(err.to_string());
            break;
        }
        total += chunk;
    }
    info!(total, nodes = arena.node_count(), "bruteforce finished");
    Report { target, chunk, total, stats: arena.stats(), failure }
}
