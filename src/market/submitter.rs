//! Extrinsic submission protocol.
//!
//! # Responsibilities
//! - Validate a payload against the operation that will interpret its result
//! - Broadcast, then watch the status subscription until inclusion
//! - Fold the included block's events into a typed receipt
//! - Resolve or fail exactly once, within a bounded time
//!
//! # Design Decisions
//! - Inclusion is terminal for resolution; finality updates are never
//!   observed because the subscription is dropped on every exit path
//! - Event folding is a pure reducer so the extraction rules are testable
//!   without a transport

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;

use crate::ledger::transport::{LedgerRpc, StatusStream};
use crate::ledger::types::{
    CallData, CallKind, ClientError, ClientResult, EventRecord, RawExtrinsic, StoredResource,
    TxStatus,
};

const FILE_SUCCESS: &str = "market.FileSuccess";
const EXTRINSIC_SUCCESS: &str = "system.ExtrinsicSuccess";
const EXTRINSIC_FAILED: &str = "system.ExtrinsicFailed";

/// Terminal verdict folded out of an included extrinsic's events.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EventOutcome {
    /// `ExtrinsicSuccess` seen; cid taken from a `FileSuccess` when present.
    Success { cid: Option<String> },
    /// `ExtrinsicFailed` seen.
    Failed { reason: String },
}

/// Reduce the events attributed to one extrinsic to a terminal verdict.
///
/// `FileSuccess` contributes its last argument as the acknowledged cid;
/// the system events decide success or failure. `None` means the block
/// carried no terminal system event for the extrinsic at all.
fn fold_events(events: &[EventRecord]) -> Option<EventOutcome> {
    let mut cid = None;
    let mut outcome = None;
    for event in events {
        match event.method.as_str() {
            FILE_SUCCESS => {
                cid = event
                    .args
                    .last()
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned);
            }
            EXTRINSIC_SUCCESS => outcome = Some(EventOutcome::Success { cid: None }),
            EXTRINSIC_FAILED => {
                let reason = event
                    .args
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "dispatch error".to_string());
                outcome = Some(EventOutcome::Failed { reason });
            }
            _ => {}
        }
    }
    match outcome {
        Some(EventOutcome::Success { .. }) => Some(EventOutcome::Success { cid }),
        other => other,
    }
}

/// Pull the cid argument out of a decoded `addPrepaid` call.
fn extract_cid(call: &CallData) -> ClientResult<String> {
    match call.args.first().and_then(serde_json::Value::as_str) {
        Some(cid) => Ok(cid.to_owned()),
        None => Err(ClientError::InvalidCid(format!(
            "expected a string cid argument, got {}",
            call.args
                .first()
                .map(ToString::to_string)
                .unwrap_or_else(|| "nothing".to_string())
        ))),
    }
}

/// Broadcasts extrinsics and resolves them into [`StoredResource`] receipts.
pub struct Submitter {
    transport: Arc<dyn LedgerRpc>,
    submission_timeout: Duration,
}

impl Submitter {
    pub fn new(transport: Arc<dyn LedgerRpc>, submission_timeout: Duration) -> Self {
        Self {
            transport,
            submission_timeout,
        }
    }

    /// Submit an extrinsic and await its inclusion receipt.
    ///
    /// The payload's embedded call is checked against `expected` before
    /// anything touches the network. `known_cid` is only consulted for
    /// `addPrepaid`; when absent there, the cid is read out of the payload
    /// itself (the externally-signed flow has no separate cid parameter).
    pub async fn submit(
        &self,
        xt: &RawExtrinsic,
        expected: CallKind,
        known_cid: Option<&str>,
    ) -> ClientResult<StoredResource> {
        let call = self.transport.decode_extrinsic(xt).await?;
        if call.method != expected.method() {
            return Err(ClientError::WrongMethod {
                expected,
                actual: call.method,
            });
        }

        let cid = match (expected, known_cid) {
            (CallKind::AddPrepaid, None) => Some(extract_cid(&call)?),
            (_, known) => known.map(str::to_owned),
        };

        let stream = self.transport.broadcast(xt).await?;
        tracing::debug!(method = %expected, "extrinsic broadcast, watching status");

        match timeout(self.submission_timeout, watch(stream, expected, cid)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::SubmissionTimeout(
                self.submission_timeout.as_secs(),
            )),
        }
    }
}

/// Consume status updates until the extrinsic lands in a block, then map
/// that single update to the receipt. Returning drops the subscription.
async fn watch(
    mut stream: StatusStream,
    expected: CallKind,
    cid: Option<String>,
) -> ClientResult<StoredResource> {
    while let Some(update) = stream.next().await {
        let update = update?;
        let block_hash = match &update.status {
            TxStatus::InBlock(hash) => hash.clone(),
            TxStatus::Dropped | TxStatus::Invalid => {
                return Err(ClientError::Submission(format!(
                    "extrinsic {:?} before inclusion",
                    update.status
                )));
            }
            status => {
                tracing::debug!(status = ?status, tx_hash = %update.tx_hash, "pre-inclusion status");
                continue;
            }
        };

        return match expected {
            // No corollary market event in this flow; the inclusion block
            // hash is the receipt.
            CallKind::AddPrepaid => Ok(StoredResource {
                hash: block_hash,
                cid,
            }),
            CallKind::PlaceStorageOrder => match fold_events(&update.events) {
                Some(EventOutcome::Success { cid: event_cid }) => {
                    if event_cid.is_none() {
                        tracing::warn!(
                            tx_hash = %update.tx_hash,
                            "order included without a FileSuccess event, no cid in receipt"
                        );
                    }
                    Ok(StoredResource {
                        hash: update.tx_hash,
                        cid: event_cid,
                    })
                }
                Some(EventOutcome::Failed { reason }) => Err(ClientError::Submission(format!(
                    "extrinsic failed in block {}: {}",
                    block_hash, reason
                ))),
                None => Err(ClientError::UnexpectedChainState(format!(
                    "included in block {} without a terminal system event",
                    block_hash
                ))),
            },
        };
    }
    Err(ClientError::Submission(
        "status stream ended before inclusion".to_string(),
    ))
}
