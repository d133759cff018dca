use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lifelog::cli;
use lifelog::config::{self, LifelogConfig};

#[derive(Parser)]
#[command(name = "lifelog", version, about = "Fetch Limitless lifelog entries and print them to stdout")]
struct Cli {
    /// Config file (default: ~/.lifelog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `lifelog=trace` (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a page (or, with --all, every page) of lifelog entries
    List(cli::list::ListArgs),
    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(cli::EXIT_API_ERROR)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = LifelogConfig::load_from(&config_path)?;

    // Log to stderr so stdout stays clean for entry output.
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::List(args) => cli::list::list(&config, &args).await,
        Command::Config => {
            cli::show_config::show_config(&config, &config_path);
            Ok(ExitCode::SUCCESS)
        }
    }
}
