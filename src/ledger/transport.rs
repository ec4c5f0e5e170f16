//! Transport and signing seams.
//!
//! The chain RPC session, key derivation, and the chain-native codec are
//! external capabilities. These traits are the only view the rest of the
//! crate has of them, which keeps the submission protocol testable against
//! scripted fakes.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::ledger::types::{CallData, ClientResult, RawExtrinsic, StatusUpdate};

/// Status subscription for one broadcast extrinsic.
///
/// The stream ends (or is dropped by the consumer) when the watcher is done
/// with it; dropping it releases the underlying subscription.
pub type StatusStream = BoxStream<'static, ClientResult<StatusUpdate>>;

/// RPC session with the ledger node.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Establish the transport session. Idempotent.
    async fn connect(&self) -> ClientResult<()>;

    /// Tear down the transport session. Safe to call when not connected.
    async fn disconnect(&self);

    /// Non-blocking connectivity snapshot.
    fn is_connected(&self) -> bool;

    /// Resolve once the session is usable for calls and queries.
    async fn await_ready(&self) -> ClientResult<()>;

    /// Encode a call into unsigned extrinsic bytes.
    async fn encode_call(&self, call: &CallData) -> ClientResult<RawExtrinsic>;

    /// Decode extrinsic bytes back into the embedded call.
    async fn decode_extrinsic(&self, xt: &RawExtrinsic) -> ClientResult<CallData>;

    /// Submit an extrinsic and watch its lifecycle.
    async fn broadcast(&self, xt: &RawExtrinsic) -> ClientResult<StatusStream>;

    /// Read the market order state for a cid as raw JSON, `None` when the
    /// chain has no entry.
    async fn query_order(&self, cid: &str) -> ClientResult<Option<serde_json::Value>>;
}

/// Signing capability, derived once from a seed phrase at construction.
///
/// Nonce management is the signer's concern; the client never sequences
/// concurrent submissions from the same key.
#[async_trait]
pub trait ExtrinsicSigner: Send + Sync {
    /// Account address of the signing key.
    fn address(&self) -> String;

    /// Produce a signed extrinsic from unsigned payload bytes.
    async fn sign(&self, xt: &RawExtrinsic) -> ClientResult<RawExtrinsic>;
}
