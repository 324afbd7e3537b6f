use alloy_primitives::B256;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::BlockNumberOrTag;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Endpoint serves a different chain than configured
    #[error("Chain mismatch: expected chain {expected}, endpoint reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// General error with context
    #[error("Client error: {0}")]
    Other(String),
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Verify that the provider's endpoint serves the expected chain.
pub async fn verify_chain_id<P>(provider: &P, expected_chain_id: u64) -> Result<(), ClientError>
where
    P: Provider,
{
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    if actual != expected_chain_id {
        return Err(ClientError::ChainMismatch {
            expected: expected_chain_id,
            actual,
        });
    }

    debug!(chain_id = actual, "Connected to chain");

    Ok(())
}

/// Hash of the chain's first block (block 1).
pub async fn first_block_hash<P>(provider: &P) -> Result<B256, ClientError>
where
    P: Provider,
{
    let block = provider
        .get_block_by_number(BlockNumberOrTag::Number(1))
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?
        .ok_or_else(|| ClientError::Other("first block not found".to_string()))?;

    Ok(block.header.hash)
}
