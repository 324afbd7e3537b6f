//! Contract registry for balance monitoring.
//!
//! This crate answers "which addresses should be watched on a network, and
//! below which balance are they considered underfunded":
//! - [`WatchedContract`] and its [`FundThresholds`]
//! - [`Addressing`], the address-resolution mode (static or staging-derived)
//! - [`ContractRegistry`], the provider trait, with a config-backed implementation

pub mod configured;
pub mod create3;

use alloy_primitives::{Address, U256};
use config::NetworkId;
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future};

pub use configured::{ConfiguredRegistry, ContractEntry, RegistryError};

/// Balance thresholds for a watched contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundThresholds {
    /// Balance (wei) at or below which the contract is considered low
    pub min_balance: U256,
}

impl FundThresholds {
    pub const fn new(min_balance: U256) -> Self {
        Self { min_balance }
    }
}

/// A contract whose native balance is monitored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedContract {
    /// Contract name, used as metric label
    pub name: String,
    /// Deployed address
    pub address: Address,
    /// Only monitor on the network's primary execution chain
    pub only_primary_chain: bool,
    /// Funding thresholds
    pub thresholds: FundThresholds,
}

/// RPC endpoint of the staging execution chain.
///
/// Staging addresses are derived from this chain's first block hash, so the
/// endpoint is fixed once at startup before any address is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRpc(String);

impl StagingRpc {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StagingRpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How deterministic contract addresses are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// Addresses derive from the network name only
    Static,
    /// Addresses derive from the staging execution chain's first block hash
    Staging(StagingRpc),
}

/// Provider of the contracts to monitor on a network.
pub trait ContractRegistry: Send + Sync {
    /// Contracts to watch on the given network, with their thresholds.
    fn to_fund(
        &self,
        network: NetworkId,
        addressing: &Addressing,
    ) -> impl Future<Output = eyre::Result<Vec<WatchedContract>>> + Send;
}
