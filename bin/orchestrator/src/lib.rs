//! Contract balance monitoring.
//!
//! [`start_monitoring`] resolves which contracts to watch on a network and
//! spawns one [`BalancePoller`] per applicable (contract, chain) pairing.

pub mod config;
pub mod metrics;
pub mod poller;
pub mod shutdown;

use crate::{metrics::BalanceSink, shutdown::Shutdown};
use ::config::{Chain, EndpointError, Network, NetworkId, RpcEndpoints};
use alloy_provider::Provider;
use balance::Monitor;
use client::ClientError;
use registry::{Addressing, ContractRegistry, StagingRpc, WatchedContract};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use poller::{BalancePoller, POLL_INTERVAL, POLL_TIMEOUT};

#[derive(Error, Debug)]
pub enum MonitorError {
    /// The staging topology lacks its execution chain
    #[error("network missing staging execution chain {0}")]
    MissingStagingChain(u64),

    /// No RPC endpoint for a chain that must be reached
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// RPC client could not be created or serves the wrong chain
    #[error(transparent)]
    Client(#[from] ClientError),

    /// No RPC client for a chain that has contracts to watch
    #[error("no rpc client for chain {chain} ({chain_id})")]
    MissingClient { chain: String, chain_id: u64 },
}

/// A contract paired with a chain it is monitored on.
#[derive(Debug, Clone)]
pub struct Pairing<'a> {
    pub chain: &'a Chain,
    pub contract: Arc<WatchedContract>,
}

/// Create an RPC client for every EVM chain of the network.
pub fn connect_chains(
    network: &Network,
    endpoints: &RpcEndpoints,
) -> Result<HashMap<u64, impl Provider + Clone>, MonitorError> {
    let mut clients = HashMap::new();

    for chain in network.evm_chains() {
        let rpc_url = endpoints.by_name_or_id(&chain.name, chain.id)?;
        let provider = client::create_provider(&rpc_url)?;
        clients.insert(chain.id, provider);
    }

    Ok(clients)
}

/// Check that every chain's endpoint serves the configured chain.
///
/// A chain mismatch is fatal. An unreachable endpoint only logs a warning:
/// its pollers still start and report failures until it comes back.
pub async fn verify_chains<P>(
    network: &Network,
    clients: &HashMap<u64, P>,
) -> Result<(), MonitorError>
where
    P: Provider,
{
    for chain in network.evm_chains() {
        let Some(provider) = clients.get(&chain.id) else {
            continue;
        };

        info!(chain = %chain.name, "Connecting...");
        let verified = client::verify_chain_id(provider, chain.id).await;
        tolerate_unreachable(chain, verified)?;
    }

    Ok(())
}

/// Downgrade a connection failure to a warning; any other error stands.
pub fn tolerate_unreachable(
    chain: &Chain,
    result: Result<(), ClientError>,
) -> Result<(), ClientError> {
    match result {
        Err(ClientError::Connection(err)) => {
            warn!(chain = %chain.name, error = %err, "Chain unreachable, monitoring it anyway");
            Ok(())
        }
        other => other,
    }
}

/// Resolve how contract addresses are derived on this network.
///
/// On staging, addresses derive from the execution chain, so its RPC endpoint
/// becomes the canonical source; every other network uses static addressing.
pub fn resolve_addressing(
    network: &Network,
    endpoints: &RpcEndpoints,
) -> Result<Addressing, MonitorError> {
    if network.id != NetworkId::Staging {
        return Ok(Addressing::Static);
    }

    let chain_id = NetworkId::Staging.statics().execution_chain_id;
    let chain = network
        .chain(chain_id)
        .ok_or(MonitorError::MissingStagingChain(chain_id))?;

    let rpc = endpoints.by_name_or_id(&chain.name, chain.id)?;
    info!(chain = %chain.name, "Using staging execution chain for address derivation");

    Ok(Addressing::Staging(StagingRpc::new(rpc)))
}

/// Every (contract, chain) pairing that should be monitored.
///
/// Contracts marked primary-only are paired with the primary execution chain alone.
pub fn plan_pairings<'a>(
    network: &'a Network,
    contracts: &[Arc<WatchedContract>],
) -> Vec<Pairing<'a>> {
    let mut pairings = Vec::new();

    for chain in network.evm_chains() {
        let is_primary = network.is_primary(chain.id);

        for contract in contracts {
            if contract.only_primary_chain && !is_primary {
                continue;
            }

            pairings.push(Pairing {
                chain,
                contract: Arc::clone(contract),
            });
        }
    }

    pairings
}

/// Start monitoring all contracts to fund on the network.
///
/// Returns as soon as the pollers are spawned; they run until `shutdown` fires.
/// A registry failure disables monitoring for this run and is not an error.
pub async fn start_monitoring<R, M, S>(
    shutdown: &Shutdown,
    network: &Network,
    endpoints: &RpcEndpoints,
    registry: &R,
    clients: &HashMap<u64, M>,
    sink: &S,
) -> Result<Vec<JoinHandle<()>>, MonitorError>
where
    R: ContractRegistry,
    M: Monitor + Clone + 'static,
    S: BalanceSink + Clone,
{
    info!(network = %network.id, "Monitoring contracts");

    let addressing = resolve_addressing(network, endpoints)?;

    let contracts = match registry.to_fund(network.id, &addressing).await {
        Ok(contracts) => contracts,
        Err(err) => {
            error!(error = %err, "Failed to get contract addresses to monitor - skipping monitoring");
            return Ok(Vec::new());
        }
    };
    let contracts: Vec<_> = contracts.into_iter().map(Arc::new).collect();

    let pollers = plan_pairings(network, &contracts)
        .into_iter()
        .map(|pairing| {
            let client = clients
                .get(&pairing.chain.id)
                .cloned()
                .ok_or_else(|| MonitorError::MissingClient {
                    chain: pairing.chain.name.clone(),
                    chain_id: pairing.chain.id,
                })?;

            Ok(BalancePoller::new(
                pairing.contract,
                pairing.chain,
                client,
                sink.clone(),
            ))
        })
        .collect::<Result<Vec<_>, MonitorError>>()?;

    let handles: Vec<_> = pollers
        .into_iter()
        .map(|poller| tokio::spawn(poller.run(shutdown.clone())))
        .collect();

    info!(tasks = handles.len(), "Started contract monitors");

    Ok(handles)
}
