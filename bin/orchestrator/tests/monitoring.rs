//! Tests for monitor orchestration: pairing, staging resolution and startup failures.


use config::{Chain, Network, NetworkId, RpcEndpoints};
use orchestrator::{
    plan_pairings, resolve_addressing, shutdown, start_monitoring, MonitorError, POLL_INTERVAL,
};
use registry::{Addressing, StagingRpc};
use setup::{contract, devnet, ether, settle, MockMonitor, MockRegistry, Recorded, RecordingSink};
use std::{collections::HashMap, sync::Arc};
use tokio::time;

fn clients_for(network: &Network, monitor: &MockMonitor) -> HashMap<u64, MockMonitor> {
    network
        .evm_chains()
        .map(|chain| (chain.id, monitor.clone()))
        .collect()
}

fn staging(with_execution_chain: bool) -> Network {
    let mut chains = vec![Chain::new(11155111, "sepolia")];
    if with_execution_chain {
        chains.push(Chain::new(1654, "omni_evm"));
    }
    Network::new(NetworkId::Staging, chains)
}

#[test]
fn test_primary_only_contracts_stay_on_primary_chain() {
    let network = devnet();
    let contracts = vec![
        Arc::new(contract("gas_station", true, ether(1))),
        Arc::new(contract("portal", false, ether(1))),
    ];

    let pairings = plan_pairings(&network, &contracts);

    for pairing in &pairings {
        if pairing.contract.only_primary_chain {
            assert!(network.is_primary(pairing.chain.id));
        }
    }

    let mut keys: Vec<_> = pairings
        .iter()
        .map(|p| (p.chain.name.as_str(), p.contract.name.as_str()))
        .collect();
    keys.sort_unstable();

    assert_eq!(
        keys,
        vec![
            ("arb_sepolia", "portal"),
            ("omni_evm", "gas_station"),
            ("omni_evm", "portal"),
            ("sepolia", "portal"),
        ]
    );
}

#[test]
fn test_no_contracts_no_pairings() {
    assert!(plan_pairings(&devnet(), &[]).is_empty());
}

#[test]
fn test_non_staging_uses_static_addressing() {
    let addressing = resolve_addressing(&devnet(), &RpcEndpoints::new()).unwrap();
    assert_eq!(addressing, Addressing::Static);
}

#[test]
fn test_staging_resolves_execution_chain_rpc() {
    let endpoints: RpcEndpoints = [("omni_evm", "http://omni-evm:8545")].into_iter().collect();

    let addressing = resolve_addressing(&staging(true), &endpoints).unwrap();

    assert_eq!(
        addressing,
        Addressing::Staging(StagingRpc::new("http://omni-evm:8545"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_spawns_one_task_per_pairing() {
    let (trigger, shutdown) = shutdown::channel();
    let network = devnet();
    let monitor = MockMonitor::fixed(ether(3));
    let sink = RecordingSink::default();
    let registry = MockRegistry::new(vec![
        contract("gas_station", true, ether(1)),
        contract("portal", false, ether(1)),
    ]);

    let handles = start_monitoring(
        &shutdown,
        &network,
        &RpcEndpoints::new(),
        &registry,
        &clients_for(&network, &monitor),
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(handles.len(), 4);
    assert_eq!(registry.addressing(), Some(Addressing::Static));

    settle().await;
    time::advance(POLL_INTERVAL).await;
    settle().await;

    // One balance update per pairing, each on its own series.
    let mut series: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            Recorded::Balance { chain, name, .. } => Some((chain, name)),
            Recorded::Low { .. } => None,
        })
        .collect();
    series.sort_unstable();
    series.dedup();
    assert_eq!(series.len(), 4);
    assert_eq!(monitor.calls(), 4);

    trigger.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_registry_failure_is_not_fatal() {
    let (_trigger, shutdown) = shutdown::channel();
    let network = devnet();
    let registry = MockRegistry::failing();

    let handles = start_monitoring(
        &shutdown,
        &network,
        &RpcEndpoints::new(),
        &registry,
        &clients_for(&network, &MockMonitor::default()),
        &RecordingSink::default(),
    )
    .await
    .unwrap();

    assert_eq!(registry.calls(), 1);
    assert!(handles.is_empty());
}

#[tokio::test]
async fn test_staging_without_execution_chain_fails() {
    let (_trigger, shutdown) = shutdown::channel();
    let network = staging(false);
    let endpoints: RpcEndpoints = [("sepolia", "http://sepolia:8545")].into_iter().collect();
    let registry = MockRegistry::new(vec![contract("portal", false, ether(1))]);

    let result = start_monitoring(
        &shutdown,
        &network,
        &endpoints,
        &registry,
        &clients_for(&network, &MockMonitor::default()),
        &RecordingSink::default(),
    )
    .await;

    assert!(matches!(result, Err(MonitorError::MissingStagingChain(1654))));
    assert_eq!(registry.calls(), 0);
}

#[tokio::test]
async fn test_staging_without_endpoint_fails() {
    let (_trigger, shutdown) = shutdown::channel();
    let network = staging(true);
    let registry = MockRegistry::new(vec![contract("portal", false, ether(1))]);

    let result = start_monitoring(
        &shutdown,
        &network,
        &RpcEndpoints::new(),
        &registry,
        &clients_for(&network, &MockMonitor::default()),
        &RecordingSink::default(),
    )
    .await;

    assert!(matches!(result, Err(MonitorError::Endpoint(_))));
    assert_eq!(registry.calls(), 0);
}

#[tokio::test]
async fn test_staging_passes_rpc_to_registry() {
    let (trigger, shutdown) = shutdown::channel();
    let network = staging(true);
    let endpoints: RpcEndpoints = [("1654", "http://omni-evm:8545")].into_iter().collect();
    let registry = MockRegistry::new(vec![contract("gas_station", true, ether(1))]);

    let handles = start_monitoring(
        &shutdown,
        &network,
        &endpoints,
        &registry,
        &clients_for(&network, &MockMonitor::default()),
        &RecordingSink::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        registry.addressing(),
        Some(Addressing::Staging(StagingRpc::new("http://omni-evm:8545")))
    );
    assert_eq!(handles.len(), 1);

    trigger.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_missing_client_spawns_nothing() {
    let (_trigger, shutdown) = shutdown::channel();
    let network = devnet();
    let registry = MockRegistry::new(vec![contract("portal", false, ether(1))]);

    let mut clients = clients_for(&network, &MockMonitor::default());
    clients.remove(&421614);

    let result = start_monitoring(
        &shutdown,
        &network,
        &RpcEndpoints::new(),
        &registry,
        &clients,
        &RecordingSink::default(),
    )
    .await;

    match result {
        Err(MonitorError::MissingClient { chain, chain_id }) => {
            assert_eq!(chain, "arb_sepolia");
            assert_eq!(chain_id, 421614);
        }
        other => panic!("expected missing client error, got {other:?}"),
    }
}
