//! Configuration types for the contract balance monitor.
//!
//! This crate provides:
//! - Network identities and their static parameters
//! - The chain topology of a network
//! - RPC endpoint lookup by chain name or id

pub mod endpoints;
pub mod network;

pub use endpoints::{EndpointError, RpcEndpoints};
pub use network::{Chain, Network, NetworkError, NetworkId, NetworkStatics, MAX_NATIVE_DECIMALS};
