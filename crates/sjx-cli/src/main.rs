//! sjx - run the greedy semi-join selection from the command line
//!
//! Usage:
//!   sjx run [--dataset <name> | --config <file.json>] [--rounds <n>] [--format text|json]
//!   sjx datasets
//!   sjx show <name>
//!
//! Examples:
//!   sjx run
//!   sjx run --dataset textbook --rounds 2
//!   sjx run --config query.json --format json

use clap::{Parser, Subcommand, ValueEnum};
use sjx_core::catalog::SemiJoinConfig;
use sjx_core::datasets::{self, DATASET_NAMES};
use sjx_core::display::render_program;
use sjx_core::search::SemiJoinSearch;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sjx")]
#[command(about = "Greedy cost-based semi-join selection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a semi-join program and print every round
    Run {
        /// Built-in dataset to run
        #[arg(short, long, default_value = "default", conflicts_with = "config")]
        dataset: String,

        /// JSON configuration file to run instead of a built-in dataset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of rounds
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List built-in datasets
    Datasets,

    /// Print the JSON configuration of a built-in dataset
    Show {
        /// Dataset name
        name: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sjx=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            dataset,
            config,
            rounds,
            format,
        } => cmd_run(&dataset, config, rounds, format),
        Commands::Datasets => {
            for name in DATASET_NAMES {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        Commands::Show { name } => cmd_show(&name),
    }
}

fn load_config(dataset: &str, path: Option<PathBuf>) -> Result<SemiJoinConfig, String> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            SemiJoinConfig::from_json(&source).map_err(|e| e.to_string())
        }
        None => datasets::dataset(dataset).map_err(|e| e.to_string()),
    }
}

fn cmd_run(
    dataset: &str,
    path: Option<PathBuf>,
    rounds: Option<usize>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(dataset, path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut catalog = match config.build() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    // --rounds wins over the configured bound.
    if let Some(rounds) = rounds {
        catalog = catalog.with_max_rounds(rounds);
    }

    let mut search = SemiJoinSearch::new(catalog);
    let program = match search.run() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Text => print!("{}", render_program(search.registry(), &program)),
        OutputFormat::Json => match serde_json::to_string_pretty(&program) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

fn cmd_show(name: &str) -> ExitCode {
    match datasets::dataset(name).and_then(|config| config.to_json_pretty()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
