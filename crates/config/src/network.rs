//! Network topology for balance monitoring.
//!
//! Provides network identities, their static parameters and the set of chains
//! that make up a network (devnet, staging, testnet, mainnet).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default number of decimals of a chain's native token.
pub const DEFAULT_NATIVE_DECIMALS: u8 = 18;

/// Largest decimals a U256 amount can be formatted with (10^77 < 2^256 < 10^78).
pub const MAX_NATIVE_DECIMALS: u8 = 77;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Native decimals beyond what a U256 amount can be scaled by
    #[error("chain {chain} has native_decimals {decimals}, maximum is {MAX_NATIVE_DECIMALS}")]
    InvalidDecimals { chain: String, decimals: u8 },
}

/// Network identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Devnet,
    Staging,
    Testnet,
    Mainnet,
}

/// Parameters fixed per network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkStatics {
    /// Chain ID of the network's primary execution chain
    pub execution_chain_id: u64,
}

impl NetworkId {
    /// Static parameters of this network.
    pub const fn statics(self) -> NetworkStatics {
        let execution_chain_id = match self {
            Self::Devnet => 1655,
            Self::Staging => 1654,
            Self::Testnet => 164,
            Self::Mainnet => 166,
        };

        NetworkStatics { execution_chain_id }
    }

    /// Lowercase network name, as used in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Staging => "staging",
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single EVM chain in the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Chain ID
    pub id: u64,
    /// Human-readable chain name, used as metric label
    pub name: String,
    /// Decimals of the native token (18 for ETH-like chains)
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
}

const fn default_native_decimals() -> u8 {
    DEFAULT_NATIVE_DECIMALS
}

impl Chain {
    /// Chain with the default native decimals.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            native_decimals: DEFAULT_NATIVE_DECIMALS,
        }
    }
}

/// Complete network topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    /// Network identity
    pub id: NetworkId,
    /// Configured chains
    pub chains: Vec<Chain>,
}

impl Network {
    pub const fn new(id: NetworkId, chains: Vec<Chain>) -> Self {
        Self { id, chains }
    }

    /// Look up a chain by ID.
    pub fn chain(&self, id: u64) -> Option<&Chain> {
        self.chains.iter().find(|chain| chain.id == id)
    }

    /// Chain ID of the primary execution chain.
    pub const fn execution_chain_id(&self) -> u64 {
        self.id.statics().execution_chain_id
    }

    /// Whether the given chain is the network's primary execution chain.
    pub const fn is_primary(&self, chain_id: u64) -> bool {
        chain_id == self.execution_chain_id()
    }

    /// Check that every chain's parameters are usable.
    pub fn validate(&self) -> Result<(), NetworkError> {
        match self
            .chains
            .iter()
            .find(|chain| chain.native_decimals > MAX_NATIVE_DECIMALS)
        {
            Some(chain) => Err(NetworkError::InvalidDecimals {
                chain: chain.name.clone(),
                decimals: chain.native_decimals,
            }),
            None => Ok(()),
        }
    }

    /// All EVM chains of the network, in configuration order.
    pub fn evm_chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.iter()
    }
}
