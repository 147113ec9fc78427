use clap::Parser;
use gatewatch_domain::config::CliOverrides;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "gatewatch")]
#[command(version)]
#[command(about = "Gatewatch - gateway activity log dashboard")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for snapshot artifacts
    #[arg(long)]
    snapshot_dir: Option<String>,

    /// Write one snapshot for the given range and exit
    #[arg(long, value_name = "RANGE")]
    snapshot_once: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        web_port: cli.web_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        snapshot_dir: cli.snapshot_dir.clone(),
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting Gatewatch v{}", env!("CARGO_PKG_VERSION"));

    let services = di::Services::new(&config)?;

    if let Some(range) = cli.snapshot_once.as_deref() {
        return services.snapshot_once(&config, range).await;
    }

    let shutdown = CancellationToken::new();
    services.start_jobs(&config, shutdown.clone()).await;

    let state = services.app_state();
    let web_addr: SocketAddr = format!(
        "{}:{}",
        config.server.bind_address, config.server.web_port
    )
    .parse()?;

    tokio::select! {
        result = server::start_web_server(web_addr, state, &config.server.static_dir) => {
            if let Err(e) = result {
                error!(error = %e, "Web server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    shutdown.cancel();
    info!("Server shutdown complete");
    Ok(())
}
