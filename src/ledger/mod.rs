//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Caller-provided capabilities (RPC session, signing key)
//!     → transport.rs (trait seams the rest of the crate talks to)
//!     → connection.rs (lifecycle, idle countdown, transparent reconnect)
//!     → types.rs (wire types, receipts, error taxonomy)
//! ```

pub mod connection;
pub mod transport;
pub mod types;

pub use connection::ConnectionManager;
pub use transport::{ExtrinsicSigner, LedgerRpc, StatusStream};
pub use types::{
    CallData, CallKind, ClientError, ClientResult, EventRecord, RawExtrinsic, StatusUpdate,
    StoredResource, TxStatus,
};
