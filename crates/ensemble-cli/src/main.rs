use clap::{Parser, Subcommand};
use ensemble_core::Stage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ensemble", version, about = "Exogenesis Ensemble topology builder")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the deployment topology and publish its manifest.
    Synth {
        /// Path to the configuration file (defaults to ./ensemble.yaml when present)
        #[arg(long, short = 'c', env = "ENSEMBLE_CONFIG")]
        config: Option<PathBuf>,

        /// Stage to compose, overriding the stage signal (dev or prod)
        #[arg(long)]
        stage: Option<Stage>,

        /// Write the manifest to this file instead of stdout (.yaml/.yml selects YAML)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Parameter value as NAME=VALUE, consulted before configuration and environment
        #[arg(long = "parameter", short = 'p', value_parser = commands::parse_parameter)]
        parameters: Vec<(String, String)>,
    },

    /// Validate the configuration file and provider naming rules.
    Check {
        /// Path to the configuration file (defaults to ./ensemble.yaml when present)
        #[arg(long, short = 'c', env = "ENSEMBLE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the stage resolved from the environment.
    Stage {
        /// Path to the configuration file (defaults to ./ensemble.yaml when present)
        #[arg(long, short = 'c', env = "ENSEMBLE_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the manifest.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Synth {
            config,
            stage,
            output,
            parameters,
        } => commands::synth::run(commands::synth::SynthArgs {
            config,
            stage,
            output,
            parameters,
        }),
        Command::Check { config } => commands::check::run(config.as_deref()),
        Command::Stage { config } => commands::stage::run(config.as_deref()),
    }
}
