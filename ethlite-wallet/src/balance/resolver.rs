//! Balance resolution with failover and request coalescing
//!
//! A resolution walks the endpoint list in priority order. Each attempt is
//! bounded by the per-attempt timeout; a failed or timed out attempt is
//! followed by a short backoff before the next endpoint, except after the
//! last one. The first answer wins. When every endpoint fails the result
//! carries [`BalanceErrorKind::AllEndpointsFailed`].
//!
//! Concurrent calls for the same address share one resolution. The shared
//! entry is registered and looked up under a single lock, and is removed by a
//! guard owned by the spawned resolution task, so it disappears on every exit
//! path including a panic inside an endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::account::is_valid_address;
use crate::error::{Error, Result};
use super::config::ResolverConfig;
use super::endpoint::{BalanceEndpoint, JsonRpcEndpoint};
use super::types::{BalanceErrorKind, BalanceResult};

type PendingBalance = Shared<BoxFuture<'static, BalanceResult>>;

type InFlightMap = Arc<Mutex<HashMap<String, InFlight>>>;

/// A resolution that callers can attach to
struct InFlight {
    ticket: u64,
    pending: PendingBalance,
}

/// Removes an in-flight entry when the resolution task ends
struct InFlightGuard {
    in_flight: InFlightMap,
    key: String,
    ticket: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.get(&self.key).map(|entry| entry.ticket) == Some(self.ticket) {
            in_flight.remove(&self.key);
        }
    }
}

/// Timing policy for one endpoint sequence
#[derive(Debug, Clone, Copy)]
struct AttemptPolicy {
    attempt_timeout: Duration,
    backoff: Duration,
}

/// Resolves address balances across a prioritized list of endpoints
///
/// Cloning is cheap and clones share the same in-flight map.
#[derive(Clone)]
pub struct BalanceResolver {
    endpoints: Arc<Vec<Arc<dyn BalanceEndpoint>>>,
    policy: AttemptPolicy,
    in_flight: InFlightMap,
    next_ticket: Arc<AtomicU64>,
}

impl BalanceResolver {
    /// Build a resolver over JSON-RPC endpoints described by `config`
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;

        let endpoints = config
            .rpc_urls
            .iter()
            .map(|url| {
                JsonRpcEndpoint::new(url, config.attempt_timeout)
                    .map(|endpoint| Arc::new(endpoint) as Arc<dyn BalanceEndpoint>)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_endpoints(endpoints, config.attempt_timeout, config.backoff))
    }

    /// Build a resolver over arbitrary endpoints
    pub fn with_endpoints(
        endpoints: Vec<Arc<dyn BalanceEndpoint>>,
        attempt_timeout: Duration,
        backoff: Duration,
    ) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
            policy: AttemptPolicy { attempt_timeout, backoff },
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Endpoint identifiers in priority order
    pub fn endpoint_ids(&self) -> Vec<String> {
        self.endpoints.iter().map(|endpoint| endpoint.id().to_string()).collect()
    }

    /// Number of resolutions currently outstanding
    pub fn in_flight_count(&self) -> usize {
        self.lock_in_flight().len()
    }

    /// Resolve the balance of `address`
    ///
    /// Never fails: exhaustion and invalid input are reported through
    /// [`BalanceResult::error_kind`]. Must be called within a Tokio runtime.
    pub async fn get_balance(&self, address: &str) -> BalanceResult {
        if !is_valid_address(address) {
            warn!(%address, "Refusing balance lookup for invalid address");
            return BalanceResult::failure(BalanceErrorKind::InvalidAddress);
        }

        let key = address.to_ascii_lowercase();

        let pending = {
            let mut in_flight = self.lock_in_flight();

            match in_flight.get(&key) {
                Some(entry) => {
                    debug!(%address, "Reusing pending balance request");
                    entry.pending.clone()
                }
                None => {
                    let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                    let pending = self.spawn_resolution(key.clone(), address.to_string(), ticket);
                    in_flight.insert(key, InFlight { ticket, pending: pending.clone() });
                    pending
                }
            }
        };

        pending.await
    }

    /// Start the endpoint sequence on its own task
    ///
    /// Called with the in-flight lock held; the task's guard blocks on that
    /// lock, so the entry is always inserted before it can be removed.
    fn spawn_resolution(&self, key: String, address: String, ticket: u64) -> PendingBalance {
        let guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
            ticket,
        };
        let endpoints = Arc::clone(&self.endpoints);
        let policy = self.policy;

        let handle = tokio::spawn(async move {
            let _guard = guard;
            run_endpoint_sequence(&endpoints, &address, policy).await
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                error!("Balance resolution task aborted: {}", e);
                BalanceResult::failure(BalanceErrorKind::AllEndpointsFailed)
            })
        }
        .boxed()
        .shared()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BalanceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceResolver")
            .field("endpoints", &self.endpoint_ids())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Try each endpoint in order until one answers
async fn run_endpoint_sequence(
    endpoints: &[Arc<dyn BalanceEndpoint>],
    address: &str,
    policy: AttemptPolicy,
) -> BalanceResult {
    let total = endpoints.len();

    for (index, endpoint) in endpoints.iter().enumerate() {
        debug!("Trying RPC {}/{}: {}", index + 1, total, endpoint.id());

        let attempt = timeout(policy.attempt_timeout, endpoint.fetch_balance(address))
            .await
            .unwrap_or_else(|_| {
                Err(Error::Timeout(format!(
                    "{} did not answer within {:?}",
                    endpoint.id(),
                    policy.attempt_timeout
                )))
            });

        match attempt {
            Ok(wei) => {
                let result = BalanceResult::success(wei, endpoint.id());
                info!(
                    endpoint = endpoint.id(),
                    balance = %result.balance_in_eth,
                    "Fetched balance"
                );
                return result;
            }
            Err(e) => {
                warn!(endpoint = endpoint.id(), error = %e, "Balance query failed");
            }
        }

        if index + 1 < total {
            sleep(policy.backoff).await;
        }
    }

    error!(%address, "All RPC endpoints failed");
    BalanceResult::failure(BalanceErrorKind::AllEndpointsFailed)
}
