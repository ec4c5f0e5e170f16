//! Client configuration.
//!
//! All types derive Serde traits so configuration can be loaded from
//! files or assembled in code; defaults are documented on each field.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ledger::connection::DEFAULT_IDLE_TIMEOUT;

/// Websocket endpoint of the main network.
pub const MAINNET_ENDPOINT: &str = "wss://rpc.crust.network";

/// Websocket endpoint of the Rocky test network.
pub const TESTNET_ENDPOINT: &str = "wss://rpc-rocky.crust.network";

/// Which of the two fixed networks to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
}

impl Network {
    /// Fixed websocket endpoint for this network.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Main => MAINNET_ENDPOINT,
            Self::Test => TESTNET_ENDPOINT,
        }
    }
}

/// Root configuration for a market client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Seed phrase for the signing surface. `None` builds a client that
    /// can only encode payloads and submit externally signed ones. The
    /// phrase is handed to the caller's signer implementation; the crate
    /// itself never derives keys from it.
    pub seeds: Option<String>,

    /// Target network (default: main).
    pub network: Network,

    /// Idle window after which an unused connection is dropped and lazily
    /// re-established on the next call. `None` disables the idle
    /// disconnect (default: 60 seconds).
    pub idle_timeout_secs: Option<u64>,

    /// Upper bound on one submission's broadcast-to-inclusion wait
    /// (default: 600 seconds).
    pub submission_timeout_secs: u64,

    /// Rebuild policy for the shared-instance registry.
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seeds: None,
            network: Network::Main,
            idle_timeout_secs: Some(DEFAULT_IDLE_TIMEOUT.as_secs()),
            submission_timeout_secs: 600,
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Endpoint selected by [`Self::network`].
    pub const fn endpoint(&self) -> &'static str {
        self.network.endpoint()
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    pub fn submission_timeout(&self) -> Duration {
        Duration::from_secs(self.submission_timeout_secs)
    }
}

/// Bounds for the registry's client-rebuild loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum fresh instances constructed per access before the terminal
    /// connection error surfaces (default: 5).
    pub max_attempts: u32,

    /// Base delay for the exponential backoff (default: 500 ms).
    pub base_delay_ms: u64,

    /// Cap on a single backoff delay (default: 10 s).
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}
