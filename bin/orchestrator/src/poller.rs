//! Per-contract balance polling.
//!
//! One [`BalancePoller`] runs for every (contract, chain) pairing. It samples
//! the contract's native balance on a fixed interval, projects each sample
//! into the balance and low-balance gauges, and keeps retrying on failures
//! until shutdown.

use crate::{metrics::BalanceSink, shutdown::Shutdown};
use alloy_primitives::U256;
use balance::{is_low, to_display_units, Monitor};
use config::Chain;
use eyre::eyre;
use registry::WatchedContract;
use std::{sync::Arc, time::Duration};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, info_span, warn, Instrument};

/// Time between two balance samples.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Upper bound on a single balance query.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Polling,
    Cancelled,
}

/// A single balance observation, consumed as soon as it is recorded.
#[derive(Debug)]
struct BalanceSample<'a> {
    balance_wei: U256,
    chain_name: &'a str,
    contract_name: &'a str,
}

/// Polls one contract's balance on one chain.
pub struct BalancePoller<M, S> {
    contract: Arc<WatchedContract>,
    chain_name: String,
    native_decimals: u8,
    client: M,
    sink: S,
}

impl<M, S> BalancePoller<M, S>
where
    M: Monitor,
    S: BalanceSink,
{
    pub fn new(contract: Arc<WatchedContract>, chain: &Chain, client: M, sink: S) -> Self {
        Self {
            contract,
            chain_name: chain.name.clone(),
            native_decimals: chain.native_decimals,
            client,
            sink,
        }
    }

    /// Poll until `shutdown` fires.
    ///
    /// The first sample is taken one full interval after start.
    pub async fn run(self, shutdown: Shutdown) {
        let span = info_span!(
            "monitor",
            chain = %self.chain_name,
            name = %self.contract.name,
            address = %self.contract.address,
        );

        self.run_until_cancelled(shutdown).instrument(span).await
    }

    async fn run_until_cancelled(&self, mut shutdown: Shutdown) {
        info!("Monitoring account");

        let mut ticker = time::interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = PollState::Polling;
        while state == PollState::Polling {
            let cancelled = tokio::select! {
                biased;
                _ = shutdown.cancelled() => true,
                _ = ticker.tick() => false,
            };

            state = if cancelled {
                PollState::Cancelled
            } else {
                self.tick(&mut shutdown).await
            };
        }

        debug!("Monitoring stopped");
    }

    async fn tick(&self, shutdown: &mut Shutdown) -> PollState {
        let result = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return PollState::Cancelled,
            result = self.poll_once() => result,
        };

        if let Err(err) = result {
            warn!(error = %err, "Monitoring contract failed (will retry)");
        }

        PollState::Polling
    }

    async fn poll_once(&self) -> eyre::Result<()> {
        let balance = time::timeout(POLL_TIMEOUT, self.client.query_balance(self.contract.address))
            .await
            .map_err(|_| eyre!("balance query timed out after {:?}", POLL_TIMEOUT))??;

        self.record(BalanceSample {
            balance_wei: balance.amount,
            chain_name: &self.chain_name,
            contract_name: &self.contract.name,
        })
    }

    /// Publish both gauges for a sample.
    ///
    /// The low indicator depends only on the raw amount, so it is published
    /// even when the display conversion fails.
    fn record(&self, sample: BalanceSample<'_>) -> eyre::Result<()> {
        let balance = to_display_units(sample.balance_wei, self.native_decimals);
        if let Ok(balance) = &balance {
            self.sink
                .set_contract_balance(sample.chain_name, sample.contract_name, *balance);
        }

        let low = is_low(sample.balance_wei, self.contract.thresholds.min_balance);
        self.sink
            .set_contract_balance_low(sample.chain_name, sample.contract_name, low);

        let balance = balance?;
        debug!(balance, low, "Recorded contract balance");

        Ok(())
    }
}
