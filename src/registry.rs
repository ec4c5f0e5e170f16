//! Shared client instance management.
//!
//! # Responsibilities
//! - Memoize one client behind an async factory so call sites share a
//!   connection
//! - Verify liveness on every access and replace (never mutate) a dead
//!   instance
//! - Bound the rebuild loop with backoff instead of retrying forever
//!
//! The registry is an explicit value for the caller's composition root to
//! own, not process-wide mutable state.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::Mutex;

use crate::client::Client;
use crate::config::RetryConfig;
use crate::ledger::types::{ClientError, ClientResult};

type ClientFactory = dyn Fn() -> BoxFuture<'static, ClientResult<Arc<Client>>> + Send + Sync;

/// Hands out one liveness-checked [`Client`], rebuilding it on demand.
pub struct ClientRegistry {
    factory: Box<ClientFactory>,
    retry: RetryConfig,
    slot: Mutex<Option<Arc<Client>>>,
}

impl ClientRegistry {
    /// Create a registry around an async client factory.
    pub fn new<F, Fut>(retry: RetryConfig, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ClientResult<Arc<Client>>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || factory().boxed()),
            retry,
            slot: Mutex::new(None),
        }
    }

    /// Return the shared client, verified ready.
    ///
    /// A memoized instance that fails its readiness check is discarded and
    /// replaced by a fresh construction. Rebuilds back off exponentially
    /// and stop after `max_attempts`, surfacing the last connection error.
    pub async fn get(&self) -> ClientResult<Arc<Client>> {
        let mut slot = self.slot.lock().await;

        if let Some(client) = slot.as_ref() {
            match client.ensure_ready().await {
                Ok(()) => return Ok(Arc::clone(client)),
                Err(e) => {
                    tracing::warn!(error = %e, "shared client unusable, rebuilding");
                    *slot = None;
                }
            }
        }

        let mut last_err = None;
        for attempt in 0..self.retry.max_attempts {
            let delay = self.retry.delay_for(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let client = match (self.factory)().await {
                Ok(client) => client,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "client construction failed");
                    last_err = Some(e);
                    continue;
                }
            };
            match client.ensure_ready().await {
                Ok(()) => {
                    *slot = Some(Arc::clone(&client));
                    return Ok(client);
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "fresh client failed readiness check");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            ClientError::Connection("client factory produced no usable instance".to_string())
        }))
    }

    /// Drop the memoized instance so the next access rebuilds.
    pub async fn reset(&self) {
        *self.slot.lock().await = None;
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("max_attempts", &self.retry.max_attempts)
            .finish()
    }
}
