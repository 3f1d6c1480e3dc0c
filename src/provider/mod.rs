//! Provider endpoint selection and failover.
//!
//! # Data Flow
//! ```text
//! ClientContext endpoints
//!     → one lazily-connecting provider per URL
//!     → cursor picks the active endpoint (round-robin rotation)
//!     → liveness probe / ensure_live sweep on demand
//!     → assign_relay_endpoint resolves a random validator's relay URL
//! ```
//!
//! # Design Decisions
//! - At most one endpoint is active; rotation wraps
//! - Probes return `false` on any failure, never an error; probing is
//!   advisory and must not crash flows that only need a working endpoint
//! - Validator selection is uniform-random per call to spread relay load;
//!   this is load spreading, not a security boundary
//! - Shared bindings (signer, relay URL, registry address) sit behind
//!   `arc-swap` so `&self` callers never race on them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use arc_swap::ArcSwapOption;
use rand::Rng;
use url::Url;

use crate::config::ClientContext;
use crate::contract::{LinkRegistry, ValidatorInfo};
use crate::error::{LinkError, LinkResult};

const CURSOR_UNSET: usize = usize::MAX;

/// One backend endpoint candidate.
#[derive(Clone)]
pub struct Endpoint {
    /// Endpoint URL.
    pub url: Url,
    provider: DynProvider,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("url", &self.url.as_str()).finish()
    }
}

/// A signer bound to the currently active endpoint.
#[derive(Clone)]
pub struct ConnectedSigner {
    /// Wallet-backed provider that can submit transactions.
    pub provider: DynProvider,
    /// The bound signer.
    pub signer: Arc<PrivateKeySigner>,
    /// The signer's own address.
    pub address: Address,
}

impl std::fmt::Debug for ConnectedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedSigner")
            .field("address", &self.address)
            .finish()
    }
}

/// Ordered endpoint list with an active cursor, signer binding and the
/// resolved relay URL. One instance per client; not shared across clients.
pub struct ProviderSelector {
    endpoints: Vec<Endpoint>,
    cursor: AtomicUsize,
    signer: ArcSwapOption<PrivateKeySigner>,
    relay_url: ArcSwapOption<Url>,
    link_address: ArcSwapOption<Address>,
}

impl ProviderSelector {
    /// Build a selector from a resolved context.
    pub fn from_context(context: &ClientContext) -> Self {
        let endpoints: Vec<Endpoint> = context
            .endpoints
            .iter()
            .map(|url| Endpoint {
                url: url.clone(),
                provider: ProviderBuilder::new().connect_http(url.clone()).erased(),
            })
            .collect();
        let cursor = if endpoints.is_empty() { CURSOR_UNSET } else { 0 };

        Self {
            endpoints,
            cursor: AtomicUsize::new(cursor),
            signer: ArcSwapOption::from_pointee(context.signer.clone()),
            relay_url: ArcSwapOption::empty(),
            link_address: ArcSwapOption::from_pointee(context.link_address),
        }
    }

    /// Replace the bound signer.
    pub fn bind_signer(&self, signer: PrivateKeySigner) {
        tracing::debug!(address = %signer.address(), "Signer bound");
        self.signer.store(Some(Arc::new(signer)));
    }

    /// The bound signer, if any.
    pub fn signer(&self) -> Option<Arc<PrivateKeySigner>> {
        self.signer.load_full()
    }

    /// Advance the cursor to the next endpoint, wrapping at the end.
    pub fn rotate(&self) -> LinkResult<()> {
        match self.endpoints.len() {
            0 => Err(LinkError::NoProvider),
            1 => Err(LinkError::NoOtherEndpoints),
            len => {
                let cursor = self.cursor.load(Ordering::Relaxed);
                let next = if cursor == CURSOR_UNSET { 0 } else { (cursor + 1) % len };
                self.cursor.store(next, Ordering::Relaxed);
                tracing::debug!(cursor = next, url = %self.endpoints[next].url, "Rotated endpoint");
                Ok(())
            }
        }
    }

    /// Index of the active endpoint, or `None` when unset.
    pub fn cursor(&self) -> Option<usize> {
        match self.cursor.load(Ordering::Relaxed) {
            CURSOR_UNSET => None,
            index => Some(index),
        }
    }

    /// The active endpoint, or `None` when unset.
    pub fn current(&self) -> Option<&Endpoint> {
        self.cursor().and_then(|index| self.endpoints.get(index))
    }

    /// Provider for the active endpoint.
    pub fn provider(&self) -> LinkResult<DynProvider> {
        self.current()
            .map(|endpoint| endpoint.provider.clone())
            .ok_or(LinkError::NoProvider)
    }

    /// Probe the active endpoint's basic connectivity.
    ///
    /// Returns `false` on any failure; never errors.
    pub async fn is_live(&self) -> bool {
        let Ok(provider) = self.provider() else {
            return false;
        };
        match provider.get_chain_id().await {
            Ok(_) => true,
            Err(e) => {
                let url = self.current().map(|e| e.url.to_string()).unwrap_or_default();
                tracing::warn!(url = %url, error = %e, "Liveness probe failed");
                false
            }
        }
    }

    /// Try each endpoint once in rotation order, stopping at the first
    /// live one.
    pub async fn ensure_live(&self) -> LinkResult<()> {
        if self.endpoints.is_empty() {
            return Err(LinkError::NoProvider);
        }
        for _ in 0..self.endpoints.len() {
            if self.is_live().await {
                return Ok(());
            }
            if self.endpoints.len() > 1 {
                self.rotate()?;
            }
        }
        Err(LinkError::NoProviderAvailable)
    }

    /// Registry contract bound to the active read-only provider.
    pub fn registry(&self) -> LinkResult<LinkRegistry::LinkRegistryInstance<DynProvider>> {
        let address = self.link_address()?;
        let provider = self.provider()?;
        Ok(LinkRegistry::new(address, provider))
    }

    /// Pick one registered validator uniformly at random and store its
    /// advertised endpoint as the relay URL.
    ///
    /// Re-invoked before every relay call that needs a fresh assignment.
    pub async fn assign_relay_endpoint(&self) -> LinkResult<Url> {
        let registry = self.registry()?;
        let validators: Vec<ValidatorInfo> = registry
            .getValidators()
            .call()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        if validators.is_empty() {
            return Err(LinkError::NoValidator);
        }

        let picked = pick_validator(&validators, &mut rand::thread_rng());
        let url: Url = picked.endpoint.parse()?;
        tracing::debug!(validator = %picked.address, endpoint = %url, "Relay endpoint assigned");
        self.relay_url.store(Some(Arc::new(url.clone())));
        Ok(url)
    }

    /// The relay URL resolved by the last assignment, if any.
    pub fn relay_url(&self) -> Option<Url> {
        self.relay_url.load_full().map(|url| (*url).clone())
    }

    /// The bound signer attached to the active endpoint's connection.
    pub fn connected_signer(&self) -> LinkResult<ConnectedSigner> {
        let signer = self.signer.load_full().ok_or(LinkError::NoSigner)?;
        let endpoint = self.current().ok_or(LinkError::NoProvider)?;

        let wallet = EthereumWallet::from(signer.as_ref().clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(endpoint.url.clone())
            .erased();
        let address = signer.address();

        Ok(ConnectedSigner {
            provider,
            signer,
            address,
        })
    }

    /// The link registry address.
    pub fn link_address(&self) -> LinkResult<Address> {
        self.link_address
            .load_full()
            .map(|address| *address)
            .ok_or(LinkError::NoLinkRegistry)
    }

    /// Reconfigure the link registry address.
    pub fn set_link_address(&self, address: Address) {
        self.link_address.store(Some(Arc::new(address)));
    }
}

impl std::fmt::Debug for ProviderSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSelector")
            .field("endpoints", &self.endpoints.len())
            .field("cursor", &self.cursor())
            .field("has_signer", &self.signer.load().is_some())
            .finish()
    }
}

/// Uniform-random validator pick. Split out so the distribution is
/// testable without a chain.
pub(crate) fn pick_validator<'a, R: Rng>(
    validators: &'a [ValidatorInfo],
    rng: &mut R,
) -> &'a ValidatorInfo {
    &validators[rng.gen_range(0..validators.len())]
}
