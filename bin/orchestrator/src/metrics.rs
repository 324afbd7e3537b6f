//! Prometheus metrics for contract balance monitoring.
//!
//! Pollers publish through the [`BalanceSink`] trait; [`Metrics`] is the
//! implementation backed by the global `metrics` registry.

use metrics::{describe_gauge, gauge};

/// Contract balance in display units, labeled by chain and contract name.
pub const CONTRACT_BALANCE: &str = "monitor_contract_balance_ether";

/// 1 when the contract balance is at or below its threshold, 0 otherwise.
pub const CONTRACT_BALANCE_LOW: &str = "monitor_contract_balance_low";

/// Destination of per-contract balance gauges.
///
/// Series are keyed by `(chain, name)`; each series has exactly one writer.
pub trait BalanceSink: Send + Sync + 'static {
    /// Set the current balance, in display units.
    fn set_contract_balance(&self, chain: &str, name: &str, balance: f64);

    /// Set the low-balance indicator.
    fn set_contract_balance_low(&self, chain: &str, name: &str, low: bool);
}

/// Aggregated metrics for the balance monitor.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_gauge!(
            CONTRACT_BALANCE,
            "Current native balance of a monitored contract in ether"
        );
        describe_gauge!(
            CONTRACT_BALANCE_LOW,
            "Whether a monitored contract balance is at or below its minimum (1) or not (0)"
        );
    }
}

impl BalanceSink for Metrics {
    fn set_contract_balance(&self, chain: &str, name: &str, balance: f64) {
        gauge!(CONTRACT_BALANCE, "chain" => chain.to_string(), "name" => name.to_string())
            .set(balance);
    }

    fn set_contract_balance_low(&self, chain: &str, name: &str, low: bool) {
        let value = if low { 1.0 } else { 0.0 };
        gauge!(CONTRACT_BALANCE_LOW, "chain" => chain.to_string(), "name" => name.to_string())
            .set(value);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
