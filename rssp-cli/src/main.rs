//! rssp - command line tool for the regional seismic survey station data.

use clap::Parser;
use rssp_cmd::DashboardConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rssp",
    version,
    about = "Regional Survey for Seismic Protection monitoring toolkit"
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory, overriding the configuration
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: rssp_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    log::debug!("Using data directory {}", config.data_dir.display());
    rssp_cmd::run(cli.command, &config)
}
