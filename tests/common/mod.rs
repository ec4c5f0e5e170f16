//! Shared mocks and helpers for the integration suite.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use crust_market_client::{
    CallData, Client, ClientConfig, ClientError, ClientResult, EventRecord, ExtrinsicSigner,
    LedgerRpc, Network, RawExtrinsic, StatusStream, StatusUpdate, TxStatus,
};

/// Initialize test logging once; later calls are no-ops.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crust_market_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Scripted status subscription handed out for one broadcast.
struct ScriptedStream {
    updates: Vec<ClientResult<StatusUpdate>>,
    /// Keep the stream open (pending) after the scripted updates instead
    /// of ending it.
    then_hang: bool,
}

/// Programmable in-memory ledger transport.
///
/// Broadcasts are recorded; each one consumes the next scripted stream.
/// Payload encoding is plain JSON bytes, which keeps encode/decode
/// symmetric without a chain codec.
#[derive(Default)]
pub struct MockLedger {
    connected: AtomicBool,
    connect_failures: AtomicU32,
    ready_failures: AtomicU32,
    broadcasts: Mutex<Vec<RawExtrinsic>>,
    scripts: Mutex<VecDeque<ScriptedStream>>,
    order: Mutex<Option<serde_json::Value>>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_stream(&self, updates: Vec<ClientResult<StatusUpdate>>) {
        self.scripts.lock().unwrap().push_back(ScriptedStream {
            updates,
            then_hang: false,
        });
    }

    pub fn push_hanging_stream(&self, updates: Vec<ClientResult<StatusUpdate>>) {
        self.scripts.lock().unwrap().push_back(ScriptedStream {
            updates,
            then_hang: true,
        });
    }

    pub fn fail_next_connects(&self, n: u32) {
        self.connect_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_readiness(&self, n: u32) {
        self.ready_failures.store(n, Ordering::SeqCst);
    }

    pub fn set_order(&self, value: serde_json::Value) {
        *self.order.lock().unwrap() = Some(value);
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }

    pub fn last_broadcast(&self) -> Option<RawExtrinsic> {
        self.broadcasts.lock().unwrap().last().cloned()
    }
}

fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn connect(&self) -> ClientResult<()> {
        if take_failure(&self.connect_failures) {
            return Err(ClientError::Connection("mock endpoint refused".to_string()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn await_ready(&self) -> ClientResult<()> {
        if !self.is_connected() {
            return Err(ClientError::Connection("not connected".to_string()));
        }
        if take_failure(&self.ready_failures) {
            return Err(ClientError::Connection("mock readiness refused".to_string()));
        }
        Ok(())
    }

    async fn encode_call(&self, call: &CallData) -> ClientResult<RawExtrinsic> {
        let bytes = serde_json::to_vec(call).map_err(|e| ClientError::Codec(e.to_string()))?;
        Ok(RawExtrinsic::from_bytes(&bytes))
    }

    async fn decode_extrinsic(&self, xt: &RawExtrinsic) -> ClientResult<CallData> {
        serde_json::from_slice(&xt.to_bytes()).map_err(|e| ClientError::Codec(e.to_string()))
    }

    async fn broadcast(&self, xt: &RawExtrinsic) -> ClientResult<StatusStream> {
        self.broadcasts.lock().unwrap().push(xt.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptedStream {
                updates: Vec::new(),
                then_hang: true,
            });
        let head = stream::iter(script.updates);
        if script.then_hang {
            Ok(head.chain(stream::pending()).boxed())
        } else {
            Ok(head.boxed())
        }
    }

    async fn query_order(&self, _cid: &str) -> ClientResult<Option<serde_json::Value>> {
        Ok(self.order.lock().unwrap().clone())
    }
}

/// Signer stub: counts calls and passes payload bytes through unchanged so
/// the mock codec still decodes them.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockSigner {
    sign_calls: AtomicU32,
}

#[allow(dead_code)]
impl MockSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sign_count(&self) -> u32 {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtrinsicSigner for MockSigner {
    fn address(&self) -> String {
        "cTMockAccount".to_string()
    }

    async fn sign(&self, xt: &RawExtrinsic) -> ClientResult<RawExtrinsic> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(xt.clone())
    }
}

/// Config pointed at the test network with a short submission bound.
#[allow(dead_code)]
pub fn test_config() -> ClientConfig {
    ClientConfig {
        network: Network::Test,
        submission_timeout_secs: 30,
        ..ClientConfig::default()
    }
}

#[allow(dead_code)]
pub fn signed_client(ledger: &Arc<MockLedger>, signer: &Arc<MockSigner>) -> Client {
    Client::new(
        Arc::clone(ledger) as Arc<dyn LedgerRpc>,
        Some(Arc::clone(signer) as Arc<dyn ExtrinsicSigner>),
        &test_config(),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn unsigned_client(ledger: &Arc<MockLedger>) -> Client {
    Client::new(Arc::clone(ledger) as Arc<dyn LedgerRpc>, None, &test_config()).unwrap()
}

/// Build one status update carrying `(event method, args)` pairs.
#[allow(dead_code)]
pub fn update(
    tx_hash: &str,
    status: TxStatus,
    events: Vec<(&str, Vec<serde_json::Value>)>,
) -> ClientResult<StatusUpdate> {
    Ok(StatusUpdate {
        tx_hash: tx_hash.to_string(),
        status,
        events: events
            .into_iter()
            .map(|(method, args)| EventRecord {
                method: method.to_string(),
                args,
            })
            .collect(),
    })
}
