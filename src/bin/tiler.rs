use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tiler_wm::common::config::{Config, config_file};
use tiler_wm::common::log;
use tiler_wm::sim::{Scenario, Simulation};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "tiler")]
#[command(about = "Tiling engine dry runs and configuration checks")]
struct Cli {
    /// Read the configuration from this file instead of ~/.tiler.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check the configuration for problems and exit.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted scenario against an in-memory compositor and print
    /// where every window ended up.
    Simulate { scenario: PathBuf },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(config_file);
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    Config::read(&path).with_context(|| format!("loading config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log::init_logging();

    let mut config = load_config(cli.config)?;

    let issues = config.validate();
    if cli.validate {
        if issues.is_empty() {
            println!("Configuration is valid");
            return Ok(());
        }
        for issue in &issues {
            println!("{issue}");
        }
        anyhow::bail!("{} configuration issues found", issues.len());
    }

    for issue in &issues {
        warn!("{issue}");
    }
    let fixed = config.auto_fix_values();
    if fixed > 0 {
        info!("Applied {fixed} automatic config fixes");
    }

    match cli.command {
        Some(Commands::Simulate { scenario }) => {
            let scenario = Scenario::read(&scenario)?;
            for window in Simulation::run(scenario, &config)? {
                println!("{window}");
            }
        }
        None => {
            println!("Nothing to do; see --help");
        }
    }
    Ok(())
}
