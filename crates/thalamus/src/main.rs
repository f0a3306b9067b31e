// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thalamus - a two-tier query router for Ollama nodes.
//!
//! This is the binary entry point.

mod bench;
mod doctor;
mod route;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thalamus_config::ThalamusConfig;
use thalamus_core::Tier;

/// Thalamus - route queries between a fast triage node and a heavy node.
#[derive(Parser, Debug)]
#[command(name = "thalamus", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify and answer queries (arguments, or one per stdin line).
    Route {
        queries: Vec<String>,
        /// Pipelines allowed in flight at once.
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
    },
    /// Check configuration, node readiness and the log directory.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Measure time-to-first-token on one node and append it to the latency log.
    Bench {
        #[arg(long, value_enum, default_value_t = NodeArg::Cortex)]
        tier: NodeArg,
        /// Prompt to send instead of `bench.prompt`.
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum NodeArg {
    Cortex,
    Cerebellum,
}

impl From<NodeArg> for Tier {
    fn from(arg: NodeArg) -> Self {
        match arg {
            NodeArg::Cortex => Tier::Heavy,
            NodeArg::Cerebellum => Tier::Fast,
        }
    }
}

#[tokio::main]
async fn main() {
    // Node addresses may live in a .env file next to the binary's working dir.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => thalamus_config::load_and_validate_path(path),
        None => thalamus_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            thalamus_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);
    thalamus_agent::recording::register_metrics();

    let outcome = match cli.command {
        Commands::Route {
            queries,
            concurrency,
        } => route::run_route(&config, queries, concurrency).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
        Commands::Bench { tier, prompt } => bench::run_bench(&config, tier.into(), prompt).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = outcome {
        eprintln!("thalamus: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &ThalamusConfig) -> Result<(), thalamus_core::ThalamusError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| thalamus_core::ThalamusError::Config(format!("cannot render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("thalamus={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
