//! Storage-market client facade.
//!
//! Composes the connection manager, call builder, submitter, and status
//! reader behind one type. Capabilities are flags, not subclasses: a
//! client without a signer still encodes payloads for external signing
//! and submits externally signed ones; a client without an idle timeout
//! simply never drops its socket.

use std::sync::Arc;

use url::Url;

use crate::config::ClientConfig;
use crate::ledger::connection::ConnectionManager;
use crate::ledger::transport::{ExtrinsicSigner, LedgerRpc};
use crate::ledger::types::{CallKind, ClientError, ClientResult, RawExtrinsic, StoredResource};
use crate::market::builder;
use crate::market::status::{self, OrderStatus};
use crate::market::submitter::Submitter;

/// Client for the storage market of one configured network.
pub struct Client {
    transport: Arc<dyn LedgerRpc>,
    connection: ConnectionManager,
    submitter: Submitter,
    signer: Option<Arc<dyn ExtrinsicSigner>>,
    endpoint: Url,
}

impl Client {
    /// Build a client over caller-provided transport and signing
    /// capabilities.
    ///
    /// The transport is expected to target [`ClientConfig::endpoint`];
    /// pass `signer: None` for the unsigned surface only.
    pub fn new(
        transport: Arc<dyn LedgerRpc>,
        signer: Option<Arc<dyn ExtrinsicSigner>>,
        config: &ClientConfig,
    ) -> ClientResult<Self> {
        let endpoint: Url = config.endpoint().parse().map_err(|e| {
            ClientError::Connection(format!("invalid endpoint '{}': {}", config.endpoint(), e))
        })?;

        if config.seeds.is_some() && signer.is_none() {
            tracing::warn!("config carries seeds but no signer was provided, signing surface disabled");
        }

        tracing::info!(
            endpoint = %endpoint,
            network = ?config.network,
            signing = signer.is_some(),
            "market client initialized"
        );

        Ok(Self {
            connection: ConnectionManager::new(Arc::clone(&transport), config.idle_timeout()),
            submitter: Submitter::new(Arc::clone(&transport), config.submission_timeout()),
            transport,
            signer,
            endpoint,
        })
    }

    // --- connection lifecycle ---

    pub async fn connect(&self) -> ClientResult<()> {
        self.connection.connect().await
    }

    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Suspend until the connection is usable, reconnecting if needed.
    pub async fn ensure_ready(&self) -> ClientResult<()> {
        self.connection.ensure_ready().await
    }

    // --- unsigned surface ---

    /// Unsigned `placeStorageOrder` payload, hex-encoded for external
    /// signing.
    pub async fn place_storage_order_raw(
        &self,
        cid: &str,
        size: u64,
        tips: u128,
        is_directory: bool,
    ) -> ClientResult<RawExtrinsic> {
        self.connection.ensure_ready().await?;
        let call = builder::place_storage_order(cid, size, tips, is_directory);
        self.transport.encode_call(&call).await
    }

    /// Unsigned `addPrepaid` payload, hex-encoded for external signing.
    pub async fn add_prepaid_raw(&self, cid: &str, amount: u128) -> ClientResult<RawExtrinsic> {
        self.connection.ensure_ready().await?;
        let call = builder::add_prepaid(cid, amount);
        self.transport.encode_call(&call).await
    }

    /// Submit an externally signed `placeStorageOrder` extrinsic.
    ///
    /// The acknowledged cid comes from the chain's events, so no cid
    /// parameter is needed here.
    pub async fn submit_signed_place_order(
        &self,
        xt: &RawExtrinsic,
    ) -> ClientResult<StoredResource> {
        self.connection.ensure_ready().await?;
        self.submitter
            .submit(xt, CallKind::PlaceStorageOrder, None)
            .await
    }

    /// Submit an externally signed `addPrepaid` extrinsic.
    ///
    /// The cid is read out of the payload itself and validated before
    /// broadcast.
    pub async fn submit_signed_add_prepaid(
        &self,
        xt: &RawExtrinsic,
    ) -> ClientResult<StoredResource> {
        self.connection.ensure_ready().await?;
        self.submitter.submit(xt, CallKind::AddPrepaid, None).await
    }

    // --- signing surface ---

    /// Sign an externally built payload with the configured key.
    pub async fn sign(&self, xt: &RawExtrinsic) -> ClientResult<RawExtrinsic> {
        self.require_signer()?.sign(xt).await
    }

    /// Place a storage order for a cid: build, sign, broadcast, and await
    /// the inclusion receipt.
    pub async fn place_storage_order(
        &self,
        cid: &str,
        size: u64,
        tips: u128,
        is_directory: bool,
    ) -> ClientResult<StoredResource> {
        let signer = self.require_signer()?;
        self.connection.ensure_ready().await?;
        let call = builder::place_storage_order(cid, size, tips, is_directory);
        let unsigned = self.transport.encode_call(&call).await?;
        let signed = signer.sign(&unsigned).await?;
        self.submitter
            .submit(&signed, CallKind::PlaceStorageOrder, None)
            .await
    }

    /// Top up the prepaid balance of an existing order.
    pub async fn add_prepaid_amount(
        &self,
        cid: &str,
        amount: u128,
    ) -> ClientResult<StoredResource> {
        let signer = self.require_signer()?;
        self.connection.ensure_ready().await?;
        let call = builder::add_prepaid(cid, amount);
        let unsigned = self.transport.encode_call(&call).await?;
        let signed = signer.sign(&unsigned).await?;
        self.submitter
            .submit(&signed, CallKind::AddPrepaid, Some(cid))
            .await
    }

    // --- reads ---

    /// Current on-chain order state for a cid, `None` when no order
    /// exists.
    pub async fn order_status(&self, cid: &str) -> ClientResult<Option<OrderStatus>> {
        self.connection.ensure_ready().await?;
        status::read_order_status(self.transport.as_ref(), cid).await
    }

    fn require_signer(&self) -> ClientResult<&Arc<dyn ExtrinsicSigner>> {
        self.signer.as_ref().ok_or(ClientError::NoSigner)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("signing", &self.signer.is_some())
            .field("connected", &self.is_connected())
            .finish()
    }
}
