//! Link registry contract bindings.
//!
//! # Responsibilities
//! - Typed RPC bindings for the on-chain link registry
//! - Domain views over raw ABI structs (`ValidatorInfo`, `RequestStatus`)
//!
//! The registry maps hashed emails to wallet addresses and back, tracks
//! per-address nonces, and records pending link requests that the validator
//! set votes on. Voting itself lives on-chain and is outside this crate.

use alloy::primitives::{Address, B256};
use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    contract LinkRegistry {
        struct ValidatorItem {
            address validator;
            uint256 index;
            string endpoint;
            uint256 status;
        }

        struct RequestItem {
            bytes32 id;
            bytes32 email;
            address wallet;
            uint256 status;
        }

        function nonceOf(address wallet) external view returns (uint256);
        function toAddress(bytes32 email) external view returns (address);
        function toEmail(address wallet) external view returns (bytes32);
        function getValidators() external view returns (ValidatorItem[] memory);
        function getRequestItem(bytes32 id) external view returns (RequestItem memory);
        function isAvailable(bytes32 id) external view returns (bool);
        function addRequest(bytes32 id, bytes32 email, address wallet, bytes calldata signature) external;

        event AddedRequestItem(bytes32 id, bytes32 email, address wallet);
    }
}

/// A registered validator as enumerated from chain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInfo {
    /// Validator's on-chain address.
    pub address: Address,
    /// Position in the registry.
    pub index: u64,
    /// Advertised relay endpoint URL.
    pub endpoint: String,
    /// Raw registry status value.
    pub status: u8,
}

impl From<LinkRegistry::ValidatorItem> for ValidatorInfo {
    fn from(item: LinkRegistry::ValidatorItem) -> Self {
        Self {
            address: item.validator,
            index: item.index.saturating_to::<u64>(),
            endpoint: item.endpoint,
            status: item.status.saturating_to::<u8>(),
        }
    }
}

/// Authoritative status of a link request, read from chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// No decision recorded yet (raw 0).
    Pending,
    /// Request recorded, awaiting votes (raw 1).
    Requested,
    /// Validator consensus approved the link (raw 2).
    Accepted,
    /// Any other nonzero value: rejected.
    Rejected,
}

impl From<u8> for RequestStatus {
    fn from(raw: u8) -> Self {
        match raw {
            0 => RequestStatus::Pending,
            1 => RequestStatus::Requested,
            2 => RequestStatus::Accepted,
            _ => RequestStatus::Rejected,
        }
    }
}

impl RequestStatus {
    /// True once the validator set has settled the request either way.
    pub fn is_settled(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A pending link request as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub id: B256,
    pub email_hash: B256,
    pub address: Address,
    pub status: RequestStatus,
}

impl From<LinkRegistry::RequestItem> for RequestInfo {
    fn from(item: LinkRegistry::RequestItem) -> Self {
        Self {
            id: item.id,
            email_hash: item.email,
            address: item.wallet,
            status: RequestStatus::from(item.status.saturating_to::<u8>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RequestStatus::from(0), RequestStatus::Pending);
        assert_eq!(RequestStatus::from(1), RequestStatus::Requested);
        assert_eq!(RequestStatus::from(2), RequestStatus::Accepted);
        assert_eq!(RequestStatus::from(3), RequestStatus::Rejected);
        assert_eq!(RequestStatus::from(200), RequestStatus::Rejected);
    }

    #[test]
    fn test_settled() {
        assert!(!RequestStatus::Pending.is_settled());
        assert!(RequestStatus::Requested.is_settled());
        assert!(RequestStatus::Accepted.is_settled());
        assert!(RequestStatus::Rejected.is_settled());
    }
}
