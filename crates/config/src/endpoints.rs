//! RPC endpoint table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// No endpoint configured under the chain's name or ID
    #[error("rpc endpoint not found for chain {name} ({id})")]
    NotFound { name: String, id: u64 },
}

/// RPC endpoints keyed by chain name (or decimal chain ID).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RpcEndpoints(HashMap<String, String>);

impl RpcEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint under the given key.
    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.0.insert(key.into(), url.into());
    }

    /// Resolve a chain's endpoint, trying the chain name first and its ID second.
    pub fn by_name_or_id(&self, name: &str, id: u64) -> Result<String, EndpointError> {
        self.0
            .get(name)
            .or_else(|| self.0.get(&id.to_string()))
            .cloned()
            .ok_or_else(|| EndpointError::NotFound {
                name: name.to_string(),
                id,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RpcEndpoints
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
