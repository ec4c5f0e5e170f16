//! Ledger-facing types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by market client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Endpoint unreachable or session readiness could not be confirmed.
    #[error("connection error: {0}")]
    Connection(String),

    /// The payload's embedded call does not match the invoked operation.
    #[error("wrong method: expected {expected}, got {actual}")]
    WrongMethod { expected: CallKind, actual: String },

    /// The cid embedded in a raw payload is not a well-formed string.
    #[error("invalid cid in payload: {0}")]
    InvalidCid(String),

    /// Transport or subscription failure while the extrinsic was in flight.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The extrinsic was included but the block carried no terminal
    /// system event for it.
    #[error("unexpected chain state: {0}")]
    UnexpectedChainState(String),

    /// The submission was not resolved within the configured bound.
    #[error("submission not resolved after {0} seconds")]
    SubmissionTimeout(u64),

    /// A signing operation was invoked on a client built without seeds.
    #[error("operation requires a signer, but none was configured")]
    NoSigner,

    /// Payload encoding or decoding failed at the transport seam.
    #[error("codec error: {0}")]
    Codec(String),
}

/// Result type for market client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// The two market extrinsics this client knows how to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Commit payment for storing a content identifier.
    PlaceStorageOrder,
    /// Top up the prepaid balance of an existing order.
    AddPrepaid,
}

impl CallKind {
    /// Full `pallet.call` path of the extrinsic.
    pub const fn method(self) -> &'static str {
        match self {
            Self::PlaceStorageOrder => "market.placeStorageOrder",
            Self::AddPrepaid => "market.addPrepaid",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// A pallet call in decoded form: method path plus positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallData {
    /// `pallet.call` path, e.g. `market.placeStorageOrder`.
    pub method: String,
    /// Positional call arguments in chain argument order.
    pub args: Vec<serde_json::Value>,
}

impl CallData {
    pub fn new(method: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Hex-encoded extrinsic bytes, `0x`-prefixed.
///
/// May or may not carry a signature; the transport decides what it will
/// accept for broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawExtrinsic(String);

impl RawExtrinsic {
    /// Wrap a hex string, validating the encoding.
    ///
    /// Accepts input with or without the `0x` prefix; the stored form is
    /// always prefixed.
    pub fn from_hex(hex_str: &str) -> ClientResult<Self> {
        let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        hex::decode(stripped)
            .map_err(|e| ClientError::Codec(format!("invalid extrinsic hex: {}", e)))?;
        Ok(Self(format!("0x{}", stripped)))
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The `0x`-prefixed hex form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Decode back to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // The inner string is validated at construction.
        hex::decode(self.0.trim_start_matches("0x")).unwrap_or_default()
    }
}

impl fmt::Display for RawExtrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a broadcast extrinsic, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Validated and waiting in the transaction pool.
    Ready,
    /// Gossiped to peers.
    Broadcast,
    /// Accepted into the block with the given hash.
    InBlock(String),
    /// The containing block was finalized.
    Finalized(String),
    /// The containing block was retracted from the best chain.
    Retracted(String),
    /// Dropped from the pool without inclusion.
    Dropped,
    /// Rejected as invalid.
    Invalid,
}

/// An event emitted for an extrinsic, in decoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// `pallet.Event` path, e.g. `market.FileSuccess`.
    pub method: String,
    /// Positional event arguments.
    pub args: Vec<serde_json::Value>,
}

/// One entry of the status subscription for a broadcast extrinsic.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    /// Hash of the watched extrinsic.
    pub tx_hash: String,
    /// Reported lifecycle status.
    pub status: TxStatus,
    /// Events attributed to this extrinsic, populated from inclusion on.
    pub events: Vec<EventRecord>,
}

/// Receipt for a successfully included market extrinsic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResource {
    /// Transaction hash for a placed order, block hash for a prepaid top-up.
    pub hash: String,
    /// Content identifier the chain acknowledged, when it reported one.
    pub cid: Option<String>,
}
