//! CREATE3 address derivation.
//!
//! A CREATE3 deployment goes through a minimal proxy deployed with CREATE2,
//! which then deploys the contract with CREATE at nonce 1. The final address
//! therefore depends only on the factory and the salt.

use alloy_primitives::{b256, keccak256, Address, B256};

/// keccak256 of the CREATE3 proxy init code.
pub const PROXY_INITCODE_HASH: B256 =
    b256!("21c35dbe1b344a2488cf3321d6ce542f8e9f305544ff09e4993a62319a497c1f");

/// Address a CREATE3 deployment from `factory` with `salt` ends up at.
pub fn create3_address(factory: Address, salt: B256) -> Address {
    let proxy = factory.create2(salt.0, PROXY_INITCODE_HASH.0);
    proxy.create(1)
}

/// Salt for a named contract within an address namespace.
pub fn contract_salt(namespace: &[u8], name: &str) -> B256 {
    let mut preimage = Vec::with_capacity(namespace.len() + name.len());
    preimage.extend_from_slice(namespace);
    preimage.extend_from_slice(name.as_bytes());
    keccak256(preimage)
}
