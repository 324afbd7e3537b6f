use balance::monitor::BalanceMonitor;
use clap::Parser;
use orchestrator::{
    config::Config,
    connect_chains,
    metrics::{install_prometheus_exporter, Metrics},
    shutdown, start_monitoring, verify_chains,
};
use std::{collections::HashMap, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Monitor native balances of contracts across chains")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "MONITOR_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Override the Prometheus exporter port from the config file
    #[arg(long, env = "METRICS_PORT")]
    metrics_port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting contract monitor");
    info!("Loading config: {}", cli.config.display());

    let config = Config::from_file(&cli.config)?;
    let network = config.network();
    let metrics_port = cli.metrics_port.unwrap_or(config.metrics_port);

    info!("Loaded config:");
    info!("  Network: {}", network.id);
    info!("  Chains: {}", network.chains.len());
    info!("  Contracts: {}", config.contracts.len());
    info!("  Metrics port: {}", metrics_port);

    install_prometheus_exporter(metrics_port)?;
    let metrics = Metrics::new();

    let providers = connect_chains(&network, &config.rpc_endpoints)?;
    verify_chains(&network, &providers).await?;
    let clients: HashMap<_, _> = providers
        .into_iter()
        .map(|(chain_id, provider)| (chain_id, BalanceMonitor::new(provider)))
        .collect();

    let (trigger, shutdown) = shutdown::channel();
    let registry = config.registry();

    let handles = start_monitoring(
        &shutdown,
        &network,
        &config.rpc_endpoints,
        &registry,
        &clients,
        &metrics,
    )
    .await?;

    if handles.is_empty() {
        warn!("No contracts are being monitored");
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    trigger.cancel();
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Monitor task failed");
        }
    }

    Ok(())
}
