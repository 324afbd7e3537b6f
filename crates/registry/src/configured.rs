//! Registry backed by configuration entries.
//!
//! Entries either carry an explicit address or are resolved with CREATE3 from
//! a factory and a salt namespaced per network. On staging the namespace is the
//! execution chain's first block hash, fetched from the [`StagingRpc`].

use crate::{
    create3::{contract_salt, create3_address},
    Addressing, ContractRegistry, FundThresholds, StagingRpc, WatchedContract,
};
use alloy_primitives::{
    utils::{parse_ether, UnitsError},
    Address, B256,
};
use client::ClientError;
use config::NetworkId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Entry without address and no factory to derive it from
    #[error("contract {0} has no address and no create3 factory is configured")]
    MissingFactory(String),

    /// Threshold is not a valid ether amount
    #[error("invalid min_balance for contract {name}: {source}")]
    InvalidThreshold {
        name: String,
        #[source]
        source: UnitsError,
    },

    /// Staging salt could not be fetched
    #[error("failed to fetch staging salt from {rpc}: {source}")]
    StagingSalt {
        rpc: StagingRpc,
        #[source]
        source: ClientError,
    },
}

/// A configured contract to watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEntry {
    /// Contract name
    pub name: String,
    /// Explicit address; derived with CREATE3 when absent
    #[serde(default)]
    pub address: Option<Address>,
    /// Only monitor on the primary execution chain
    #[serde(default)]
    pub only_primary_chain: bool,
    /// Minimum balance in ether, e.g. "0.5"
    pub min_balance: String,
}

/// Contract registry built from configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredRegistry {
    entries: Vec<ContractEntry>,
    create3_factory: Option<Address>,
}

impl ConfiguredRegistry {
    pub const fn new(entries: Vec<ContractEntry>, create3_factory: Option<Address>) -> Self {
        Self {
            entries,
            create3_factory,
        }
    }

    fn resolve(
        &self,
        entry: &ContractEntry,
        namespace: Option<&[u8]>,
    ) -> Result<WatchedContract, RegistryError> {
        let min_balance =
            parse_ether(&entry.min_balance).map_err(|source| RegistryError::InvalidThreshold {
                name: entry.name.clone(),
                source,
            })?;

        let address = match (entry.address, self.create3_factory, namespace) {
            (Some(address), _, _) => address,
            (None, Some(factory), Some(namespace)) => {
                create3_address(factory, contract_salt(namespace, &entry.name))
            }
            (None, _, _) => return Err(RegistryError::MissingFactory(entry.name.clone())),
        };

        Ok(WatchedContract {
            name: entry.name.clone(),
            address,
            only_primary_chain: entry.only_primary_chain,
            thresholds: FundThresholds::new(min_balance),
        })
    }
}

impl ContractRegistry for ConfiguredRegistry {
    async fn to_fund(
        &self,
        network: NetworkId,
        addressing: &Addressing,
    ) -> eyre::Result<Vec<WatchedContract>> {
        let derives = self.entries.iter().any(|entry| entry.address.is_none());

        let derived_namespace = if derives && self.create3_factory.is_some() {
            Some(namespace(network, addressing).await?)
        } else {
            None
        };

        let contracts = self
            .entries
            .iter()
            .map(|entry| self.resolve(entry, derived_namespace.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%network, count = contracts.len(), "Resolved contracts to fund");

        Ok(contracts)
    }
}

/// Address namespace for derived contracts.
async fn namespace(network: NetworkId, addressing: &Addressing) -> Result<Vec<u8>, RegistryError> {
    match addressing {
        Addressing::Static => Ok(network.as_str().as_bytes().to_vec()),
        Addressing::Staging(rpc) => {
            let hash = fetch_staging_salt(rpc).await?;
            Ok(hash.to_vec())
        }
    }
}

/// Fetch the staging execution chain's first block hash.
async fn fetch_staging_salt(rpc: &StagingRpc) -> Result<B256, RegistryError> {
    let retry_strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .take(5);

    Retry::spawn(retry_strategy, || async move {
        let provider = client::create_provider(rpc.url())?;
        client::first_block_hash(&provider).await.map_err(|e| {
            warn!(rpc = %rpc, error = %e, "Staging salt fetch failed, will retry");
            e
        })
    })
    .await
    .map_err(|source| RegistryError::StagingSalt {
        rpc: rpc.clone(),
        source,
    })
}
