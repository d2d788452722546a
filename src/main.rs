//! CLI entry point for the level generator.
//!
//! Usage:
//!   tubesort-gen generate <COLORS> <HEIGHT> <EMPTY_TUBES> <OUTPUT> <NUM_LEVELS> [options]
//!   tubesort-gen solve <FILE>
//!
//! Options for generate:
//!   --min-moves <n>      Minimum accepted move count (default: 0)
//!   --max-moves <n>      Maximum accepted move count (default: 999)
//!   --seed <n>           Seed the random source for reproducible runs
//!   --max-attempts <n>   Give up on a level after n rejected candidates
//!   --max-states <n>     Abandon a single search after n states
//!   --timeout <seconds>  Abandon a single search after this much time
//!
//! Rejected candidates are retried without limit unless a cap is given.

mod canonical;
mod generator;
mod output;
mod pipeline;
mod puzzle;
mod solver;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use generator::LevelSpec;
use output::{JsonFileSink, LevelRecord};
use pipeline::{generate_levels, GenerateError, GenerationConfig, MoveWindow};
use solver::{solve, SearchLimits, SolveOutcome};

#[derive(Parser)]
#[command(name = "tubesort-gen")]
#[command(about = "Solvability-certified level generator for tube sorting puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random levels certified solvable within a move-count window
    Generate {
        /// Number of ball colors (2-26)
        colors: usize,

        /// Tube capacity in balls
        height: usize,

        /// Number of extra empty tubes
        empty_tubes: usize,

        /// Base name of the output JSON files (e.g. level.json)
        output: PathBuf,

        /// Number of levels to generate
        num_levels: usize,

        /// Minimum accepted move count
        #[arg(long, default_value = "0")]
        min_moves: usize,

        /// Maximum accepted move count
        #[arg(long, default_value = "999")]
        max_moves: usize,

        /// Seed for the random source (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Give up on a level after this many rejected candidates
        /// (default: retry forever)
        #[arg(long)]
        max_attempts: Option<u64>,

        /// Abandon a single solvability search after this many states
        /// (default: unbounded)
        #[arg(long)]
        max_states: Option<usize>,

        /// Abandon a single solvability search after this many seconds
        /// (default: unbounded)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Re-check a persisted level and report its minimum move count
    Solve {
        /// Path to a level JSON file
        file: PathBuf,
    },
}

/// Output format for the solve subcommand
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    states_explored: usize,
    time_elapsed_ms: u64,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            colors,
            height,
            empty_tubes,
            output,
            num_levels,
            min_moves,
            max_moves,
            seed,
            max_attempts,
            max_states,
            timeout,
        } => {
            let config = GenerationConfig {
                spec: LevelSpec {
                    colors,
                    height,
                    empty_tubes,
                },
                window: MoveWindow {
                    min_moves,
                    max_moves,
                },
                limits: SearchLimits {
                    max_states,
                    timeout: timeout.map(Duration::from_secs),
                },
                num_levels,
                max_attempts,
            };

            if let Err(e) = config.validate() {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }

            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let mut sink = JsonFileSink::new(output);

            match generate_levels(&config, &mut rng, &mut sink) {
                Ok(stats) => {
                    println!(
                        "generated {} levels from {} candidates",
                        stats.levels_generated, stats.total_attempts
                    );
                }
                Err(e @ GenerateError::Input(_)) => {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Solve { file } => {
            let json_content = match fs::read_to_string(&file) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading {}: {e}", file.display());
                    std::process::exit(1);
                }
            };

            let record: LevelRecord = match serde_json::from_str(&json_content) {
                Ok(record) => record,
                Err(e) => {
                    eprintln!("Error parsing level JSON: {e}");
                    std::process::exit(1);
                }
            };

            let Some(height) = record.implied_height() else {
                eprintln!("Error: level record is malformed: unequal color counts");
                std::process::exit(1);
            };

            let result = solve(
                &record.to_configuration(),
                height,
                &SearchLimits::default(),
            );
            let output = SolveOutput {
                solvable: matches!(result.outcome, SolveOutcome::Solved(_)),
                moves: match result.outcome {
                    SolveOutcome::Solved(moves) => Some(moves),
                    _ => None,
                },
                states_explored: result.states_explored,
                time_elapsed_ms: result.time_elapsed_ms,
            };

            println!("{}", serde_json::to_string_pretty(&output).unwrap());

            if output.solvable {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
    }
}
