//! Client façade and flow construction.
//!
//! # Data Flow
//! ```text
//! ClientContext
//!     → LinkClient (selector + relay client behind one Arc)
//!     → read-only queries against the registry (no caching)
//!     → add_request / register flows (pull-based state machines)
//! ```
//!
//! # Design Decisions
//! - Every query re-reads chain state; on-chain state moves independently
//!   of this client, so local caching would only serve stale answers
//! - Queries need a resolved provider but never a signer; flows that
//!   write require both and fail fast when either is missing

pub mod add_request;
pub mod register;
pub mod steps;

use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;

use crate::config::ClientContext;
use crate::contract::{RequestInfo, RequestStatus, ValidatorInfo};
use crate::error::LinkResult;
use crate::provider::ProviderSelector;
use crate::relay::RelayClient;

pub use add_request::AddRequestFlow;
pub use register::RegisterFlow;
pub use steps::{AddRequestStep, RegisterStep};

struct Inner {
    selector: ProviderSelector,
    relay: RelayClient,
}

/// Client for the email-to-address link registry.
///
/// Cheap to clone; clones share the same endpoint cursor and signer
/// binding.
#[derive(Clone)]
pub struct LinkClient {
    inner: Arc<Inner>,
}

impl LinkClient {
    /// Build a client from a resolved context.
    pub fn new(context: &ClientContext) -> LinkResult<Self> {
        let selector = ProviderSelector::from_context(context);
        let relay = RelayClient::new()?;
        tracing::info!(
            network = %context.network,
            endpoints = context.endpoints.len(),
            "Link client initialized"
        );
        Ok(Self {
            inner: Arc::new(Inner { selector, relay }),
        })
    }

    /// The endpoint selector shared by all clones of this client.
    pub fn selector(&self) -> &ProviderSelector {
        &self.inner.selector
    }

    pub(crate) fn relay(&self) -> &RelayClient {
        &self.inner.relay
    }

    /// Replace the bound signer.
    pub fn use_signer(&self, signer: PrivateKeySigner) {
        self.inner.selector.bind_signer(signer);
    }

    // --- Read-only query façade ---

    /// Chain id reported by the active endpoint.
    ///
    /// Useful for checking that the endpoint actually serves the
    /// configured network before submitting anything.
    pub async fn chain_id(&self) -> LinkResult<u64> {
        let provider = self.inner.selector.provider()?;
        Ok(provider.get_chain_id().await?)
    }

    /// Address linked to the given email hash, if any.
    pub async fn to_address(&self, email_hash: B256) -> LinkResult<Address> {
        let registry = self.inner.selector.registry()?;
        Ok(registry.toAddress(email_hash).call().await?)
    }

    /// Email hash linked to the given address, if any.
    pub async fn to_email(&self, address: Address) -> LinkResult<B256> {
        let registry = self.inner.selector.registry()?;
        Ok(registry.toEmail(address).call().await?)
    }

    /// Current signing nonce for the given address.
    pub async fn nonce_of(&self, address: Address) -> LinkResult<U256> {
        let registry = self.inner.selector.registry()?;
        Ok(registry.nonceOf(address).call().await?)
    }

    /// The registered validator set.
    pub async fn get_validators(&self) -> LinkResult<Vec<ValidatorInfo>> {
        let registry = self.inner.selector.registry()?;
        let validators = registry.getValidators().call().await?;
        Ok(validators.into_iter().map(Into::into).collect())
    }

    /// Authoritative status for a pending request id.
    pub async fn get_register_status(&self, id: B256) -> LinkResult<RequestStatus> {
        Ok(self.get_request_item(id).await?.status)
    }

    /// Full stored request record for an id.
    pub async fn get_request_item(&self, id: B256) -> LinkResult<RequestInfo> {
        let registry = self.inner.selector.registry()?;
        let item = registry.getRequestItem(id).call().await?;
        Ok(item.into())
    }

    /// Whether a candidate request id is still unused.
    pub async fn is_available(&self, id: B256) -> LinkResult<bool> {
        let registry = self.inner.selector.registry()?;
        Ok(registry.isAvailable(id).call().await?)
    }

    /// Assign a fresh relay endpoint and probe its health check.
    pub async fn is_relay_up(&self) -> LinkResult<bool> {
        let relay_url = self.inner.selector.assign_relay_endpoint().await?;
        Ok(self.inner.relay.is_up(&relay_url).await)
    }

    // --- Orchestrated flows ---

    /// Start the direct on-chain add-request flow.
    ///
    /// Drive it with [`AddRequestFlow::next_step`]; it yields
    /// `Adding { tx_hash }` on submission and `Done { .. }` once the
    /// confirmation event is matched.
    pub fn add_request(&self, email: &str) -> AddRequestFlow {
        AddRequestFlow::new(self.clone(), email.to_string())
    }

    /// Start the relayed register flow.
    ///
    /// Drive it with [`RegisterFlow::next_step`]; it yields
    /// `Sending { .. }` after the relay accepts the submission and exactly
    /// one terminal event once validator consensus settles or the polling
    /// ceiling elapses.
    pub fn register(&self, email: &str) -> RegisterFlow {
        RegisterFlow::new(self.clone(), email.to_string())
    }
}

impl std::fmt::Debug for LinkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkClient")
            .field("selector", &self.inner.selector)
            .finish()
    }
}
