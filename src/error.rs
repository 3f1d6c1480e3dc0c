//! Error taxonomy for the SDK.
//!
//! # Responsibilities
//! - One typed error per failure class (configuration, capability, relay, chain)
//! - Map relay response codes 1:1 onto typed errors
//! - Carry underlying alloy / reqwest errors without losing the source
//!
//! # Design Decisions
//! - Precondition failures (`NoSigner`, `NoProvider`, ...) are separate from
//!   configuration failures: the former fire per-operation, the latter at build time
//! - Probe failures and signature-verify failures are never represented here;
//!   they are absorbed as `false` at the call site

use thiserror::Error;

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum LinkError {
    // --- Configuration (strict context building) ---
    /// Network identifier absent at strict setup.
    #[error("Missing network")]
    MissingNetwork,

    /// No RPC endpoints configured at strict setup.
    #[error("No endpoints defined")]
    MissingEndpoints,

    /// Link registry address absent and not resolvable from deployments.
    #[error("Missing link registry address")]
    MissingLinkAddress,

    /// Signer absent at strict setup.
    #[error("Missing signer")]
    MissingSigner,

    /// Endpoint URL scheme outside the allow-list.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Network name or chain id not in the supported set.
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// Endpoint URL failed to parse.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // --- Capability preconditions ---
    /// Operation requires a bound signer.
    #[error("A signer is needed")]
    NoSigner,

    /// Operation requires a resolved provider endpoint.
    #[error("A provider is needed")]
    NoProvider,

    /// Every configured endpoint failed its liveness probe.
    #[error("No providers available")]
    NoProviderAvailable,

    /// Rotation requested with nothing to rotate to.
    #[error("No other endpoints")]
    NoOtherEndpoints,

    /// Operation requires the link registry address.
    #[error("A link registry address is needed")]
    NoLinkRegistry,

    /// Validator registry is empty; relaying is impossible.
    #[error("No validators")]
    NoValidator,

    // --- Relay response codes (body `code` field) ---
    /// Relay code 400.
    #[error("Parameter validation failed")]
    FailedParameterValidation,

    /// Relay code 401.
    #[error("Signature is not valid")]
    NotValidSignature,

    /// Relay code 402.
    #[error("Email is already registered")]
    AlreadyRegisteredEmail,

    /// Relay code 403.
    #[error("Address is already registered")]
    AlreadyRegisteredAddress,

    /// Relay code 500.
    #[error("Relay server error")]
    ServerError,

    /// Any relay code outside the enumerated set.
    #[error("Unknown relay error (code {0})")]
    UnknownError(u32),

    /// Relay answered with a non-success HTTP status before any body code.
    #[error("Relay returned HTTP status {0}")]
    RelayStatus(u16),

    /// Relay body missing or malformed.
    #[error("Invalid relay response: {0}")]
    InvalidResponse(String),

    // --- Chain ---
    /// Contract call or transaction submission failed.
    #[error("Contract error: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// RPC transport failure on a raw provider call.
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    /// Waiting for the transaction receipt failed.
    #[error("Confirmation error: {0}")]
    Confirmation(#[from] alloy::providers::PendingTransactionError),

    /// Message signing failed.
    #[error("Signer error: {0}")]
    Signer(#[from] alloy::signers::Error),

    /// The submitted transaction was reverted on-chain.
    #[error("Transaction reverted")]
    TransactionReverted,

    /// Transaction confirmed but the expected confirmation event is absent.
    /// Fatal: retrying the write could double-submit.
    #[error("Request added but confirmation event missing")]
    MissingConfirmationEvent,

    /// Request id generation exhausted its retry bound.
    #[error("Request id space exhausted after {0} attempts")]
    RequestIdExhausted(usize),

    // --- Transport ---
    /// HTTP transport failure talking to the relay.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for SDK operations.
pub type LinkResult<T> = Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(LinkError::NoSigner.to_string(), "A signer is needed");
        assert_eq!(LinkError::NoProvider.to_string(), "A provider is needed");
        assert_eq!(
            LinkError::AlreadyRegisteredEmail.to_string(),
            "Email is already registered"
        );
        assert_eq!(
            LinkError::UnsupportedProtocol("ftp".to_string()).to_string(),
            "Unsupported protocol: ftp"
        );
        assert!(LinkError::UnknownError(301).to_string().contains("301"));
    }
}
