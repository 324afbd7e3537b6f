//! Balance monitoring for blockchain accounts and contracts.
//!
//! This crate provides the interface for querying native balances from
//! blockchain providers, plus the projections applied to each sample:
//! conversion to display units and the low-balance check.

pub mod monitor;
pub mod units;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use units::{is_low, to_display_units};

/// Represents a native balance at the latest block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The address holding the balance
    pub holder: Address,
    /// The balance amount in base units (wei)
    pub amount: U256,
}

/// Trait for querying balances on a blockchain.
pub trait Monitor: Send + Sync {
    /// Query the native balance of an address at the latest block.
    fn query_balance(&self, address: Address)
        -> impl Future<Output = eyre::Result<Balance>> + Send;
}
