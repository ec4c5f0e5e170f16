//! Client library for the Crust Network storage market.
//!
//! Builds, optionally signs, and broadcasts the two market extrinsics
//! (`placeStorageOrder`, `addPrepaid`), waits for block inclusion, folds
//! the emitted events into a typed receipt, and reads current order state
//! for a content identifier.
//!
//! The chain RPC session and the signing key are caller-provided
//! capabilities behind the [`LedgerRpc`] and [`ExtrinsicSigner`] traits;
//! the crate owns the connection lifecycle (idle disconnect with
//! transparent reconnect) and the submission protocol.

pub mod client;
pub mod config;
pub mod ledger;
pub mod market;
pub mod registry;
mod retry;

pub use client::Client;
pub use config::{ClientConfig, Network, RetryConfig, MAINNET_ENDPOINT, TESTNET_ENDPOINT};
pub use ledger::connection::ConnectionManager;
pub use ledger::transport::{ExtrinsicSigner, LedgerRpc, StatusStream};
pub use ledger::types::{
    CallData, CallKind, ClientError, ClientResult, EventRecord, RawExtrinsic, StatusUpdate,
    StoredResource, TxStatus,
};
pub use market::{OrderStatus, Replica};
pub use registry::ClientRegistry;
