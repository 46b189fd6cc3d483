//! Home Monitor CLI
//!
//! Command-line interface for the home environment dashboard orchestrator.

use std::path::PathBuf;

use clap::Parser;
use home_monitor::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "home-monitor")]
#[command(about = "Home environment dashboard data orchestrator")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config file and environment)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Preferred AI model name (overrides config file and environment)
    #[arg(long)]
    default_model: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Initialize once, print the dashboard, and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_base_url={:?}, default_model={:?}, dashboard_port={:?}, once={}, log_level={:?}",
        args.config,
        args.api_base_url,
        args.default_model,
        args.dashboard_port,
        args.once,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_env_overrides();

    if let Some(api_base_url) = args.api_base_url {
        config.api.base_url = api_base_url;
    }
    if let Some(default_model) = args.default_model {
        config.api.default_model = Some(default_model);
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    if args.once {
        let text = home_monitor::run_once(config).await?;
        print!("{}", text);
        return Ok(());
    }

    tracing::info!("Starting home monitor");
    tracing::debug!(
        "API: {}, dashboard enabled: {}, port: {}",
        config.api.resolved_base_url(),
        config.dashboard.enabled,
        config.dashboard.port
    );

    home_monitor::run(config).await?;

    Ok(())
}
