//! Connection lifecycle management.
//!
//! # Responsibilities
//! - Own the single transport session backing a client
//! - Reconnect transparently when the idle countdown dropped the socket
//! - Keep at most one pending idle timer, reset on every readiness check
//!
//! # Design Decisions
//! - The idle timer is an abortable task; aborting and respawning on each
//!   readiness check keeps the "one pending timer" invariant trivially true
//! - An idle disconnect trades a small reconnect latency on the next call
//!   for not holding unused sockets open indefinitely

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ledger::transport::LedgerRpc;
use crate::ledger::types::ClientResult;

/// Idle window applied when the configuration does not override it.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Owns the transport session and its idle countdown.
pub struct ConnectionManager {
    transport: Arc<dyn LedgerRpc>,
    /// `None` disables the idle disconnect entirely.
    idle_timeout: Option<Duration>,
    idle_timer: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new(transport: Arc<dyn LedgerRpc>, idle_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            idle_timeout,
            idle_timer: Mutex::new(None),
        }
    }

    /// Establish the transport session. Safe to call when already connected.
    pub async fn connect(&self) -> ClientResult<()> {
        if self.transport.is_connected() {
            return Ok(());
        }
        self.transport.connect().await
    }

    /// Tear down the session and cancel any pending idle countdown.
    pub async fn disconnect(&self) {
        self.cancel_idle_timer();
        self.transport.disconnect().await;
        tracing::debug!("transport disconnected");
    }

    /// Non-blocking connectivity snapshot.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Suspend until the session is connected and confirmed ready.
    ///
    /// Reconnects first if the idle countdown (or anything else) dropped
    /// the socket. On success the idle countdown is restarted.
    pub async fn ensure_ready(&self) -> ClientResult<()> {
        if !self.transport.is_connected() {
            tracing::debug!("transport not connected, reconnecting");
            self.transport.connect().await?;
        }
        self.transport.await_ready().await?;
        self.reset_idle_timer();
        Ok(())
    }

    fn cancel_idle_timer(&self) {
        if let Some(timer) = self.idle_timer.lock().expect("idle timer mutex poisoned").take() {
            timer.abort();
        }
    }

    fn reset_idle_timer(&self) {
        let Some(delay) = self.idle_timeout else {
            return;
        };
        let transport = Arc::clone(&self.transport);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(
                idle_secs = delay.as_secs(),
                "idle timeout reached, releasing transport"
            );
            transport.disconnect().await;
        });
        let mut slot = self.idle_timer.lock().expect("idle timer mutex poisoned");
        if let Some(prev) = slot.replace(timer) {
            prev.abort();
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(timer) = self.idle_timer.get_mut().expect("idle timer mutex poisoned").take() {
            timer.abort();
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connected", &self.is_connected())
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}
