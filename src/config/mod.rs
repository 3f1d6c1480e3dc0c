//! Client context configuration.
//!
//! # Data Flow
//! ```text
//! ContextBuilder (network, endpoint URLs, address, signer)
//!     → scheme allow-list check per endpoint
//!     → registry address: explicit, else deployment table lookup
//!     → ClientContext (immutable once built)
//! ```
//!
//! # Design Decisions
//! - `build()` is lenient: endpoints and signer may be absent, operations
//!   needing them fail later with capability errors
//! - `build_strict()` demands the full surface up front with descriptive
//!   configuration errors
//! - Only `https:` endpoints are accepted; `http:` requires the explicit
//!   `allow_http(true)` test-mode switch

pub mod deployments;

pub use deployments::Network;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use url::Url;

use crate::error::{LinkError, LinkResult};

/// Resolved, immutable client configuration.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Target network.
    pub network: Network,
    /// Ordered RPC endpoint candidates; all equivalent for one provider.
    pub endpoints: Vec<Url>,
    /// Link registry contract address, if resolved.
    pub link_address: Option<Address>,
    /// Pre-bound signer, if any.
    pub signer: Option<PrivateKeySigner>,
}

/// Builder for [`ClientContext`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    network: Option<Network>,
    endpoints: Vec<String>,
    link_address: Option<Address>,
    signer: Option<PrivateKeySigner>,
    allow_http: bool,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target network.
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Append an RPC endpoint URL candidate.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoints.push(url.into());
        self
    }

    /// Set the link registry contract address explicitly, overriding the
    /// deployment table.
    pub fn link_address(mut self, address: Address) -> Self {
        self.link_address = Some(address);
        self
    }

    /// Pre-bind a signer.
    pub fn signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Additionally permit `http:` endpoints. Off by default; intended for
    /// tests against a local node.
    pub fn allow_http(mut self, allow: bool) -> Self {
        self.allow_http = allow;
        self
    }

    /// Build leniently: the network defaults to mainnet, endpoints and
    /// signer may be absent, and the registry address falls back to the
    /// deployment table for the chosen network.
    pub fn build(self) -> LinkResult<ClientContext> {
        let network = self.network.unwrap_or(Network::Mainnet);
        let endpoints = Self::resolve_endpoints(&self.endpoints, self.allow_http)?;
        let link_address = self.link_address.or_else(|| network.link_address());

        Ok(ClientContext {
            network,
            endpoints,
            link_address,
            signer: self.signer,
        })
    }

    /// Build strictly: network, registry address, signer and at least one
    /// endpoint are all required.
    pub fn build_strict(self) -> LinkResult<ClientContext> {
        let network = self.network.ok_or(LinkError::MissingNetwork)?;
        let link_address = self
            .link_address
            .or_else(|| network.link_address())
            .ok_or(LinkError::MissingLinkAddress)?;
        let signer = self.signer.ok_or(LinkError::MissingSigner)?;
        if self.endpoints.is_empty() {
            return Err(LinkError::MissingEndpoints);
        }
        let endpoints = Self::resolve_endpoints(&self.endpoints, self.allow_http)?;

        Ok(ClientContext {
            network,
            endpoints,
            link_address: Some(link_address),
            signer: Some(signer),
        })
    }

    fn resolve_endpoints(raw: &[String], allow_http: bool) -> LinkResult<Vec<Url>> {
        raw.iter()
            .map(|item| {
                let url: Url = item.parse()?;
                match url.scheme() {
                    "https" => Ok(url),
                    "http" if allow_http => Ok(url),
                    other => Err(LinkError::UnsupportedProtocol(other.to_string())),
                }
            })
            .collect()
    }
}
