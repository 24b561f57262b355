use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config_manager::ConfigManager;
use crate::types::{MetricKind, RangeSelector};

#[derive(Parser)]
#[clap(name = "nodewatch", version, about = "Cluster resource metrics collector")]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/nodewatch/nodewatch.toml)
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the cluster on the configured interval until interrupted
    Run,
    /// Run a single collection cycle and exit
    Collect,
    /// Print per-node series for one metric kind as JSON
    Query {
        /// cpu, memory, disk or network
        kind: MetricKind,
        /// 1h, 24h or 7d (anything else falls back to 1h)
        #[clap(long, default_value = "1h")]
        range: String,
    },
    /// List nodes with no data in the trailing hour
    Status,
}

pub fn process_cli() -> Result<()> {
    let cli = Cli::parse();

    crate::tracing::init_tracing();

    let config = ConfigManager::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run => crate::run(config),
        Commands::Collect => crate::run_once(config),
        Commands::Query { kind, range } => {
            crate::query(config, kind, RangeSelector::parse(&range))
        }
        Commands::Status => crate::status(config),
    }
}
