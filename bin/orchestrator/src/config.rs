use ::config::{Chain, Network, NetworkId, RpcEndpoints};
use alloy_primitives::Address;
use registry::{ConfiguredRegistry, ContractEntry};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_METRICS_PORT: u16 = 9090;

/// Top-level monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network to monitor
    pub network: NetworkId,

    /// Port of the Prometheus exporter
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// CREATE3 factory used to derive contract addresses without an explicit address
    #[serde(default)]
    pub create3_factory: Option<Address>,

    /// Chains of the network
    pub chains: Vec<Chain>,

    /// RPC endpoints, keyed by chain name or chain ID
    #[serde(default)]
    pub rpc_endpoints: RpcEndpoints,

    /// Contracts to watch
    #[serde(default)]
    pub contracts: Vec<ContractEntry>,
}

const fn default_metrics_port() -> u16 {
    DEFAULT_METRICS_PORT
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.network().validate()?;

        Ok(config)
    }

    /// Network topology described by this config.
    pub fn network(&self) -> Network {
        Network::new(self.network, self.chains.clone())
    }

    /// Contract registry described by this config.
    pub fn registry(&self) -> ConfiguredRegistry {
        ConfiguredRegistry::new(self.contracts.clone(), self.create3_factory)
    }
}
