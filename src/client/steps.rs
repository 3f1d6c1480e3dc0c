//! Progress events yielded by the orchestrated flows.
//!
//! Each variant fixes its payload; consumers match exhaustively. Earlier
//! yielded events are immutable history; only the latest reflects the
//! flow's current state.

use alloy::primitives::{Address, TxHash, B256};

/// Steps of the direct on-chain add-request flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRequestStep {
    /// Transaction submitted; yielded immediately after submission, before
    /// confirmation.
    Adding { tx_hash: TxHash },
    /// Transaction confirmed and the confirmation event matched.
    Done {
        id: B256,
        email: String,
        email_hash: B256,
        address: Address,
    },
}

/// Steps of the relayed register flow.
///
/// `Sending` is followed by exactly one terminal variant; all carry the
/// same identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterStep {
    /// Relay accepted the submission and assigned a request id.
    Sending {
        request_id: B256,
        email: String,
        address: Address,
    },
    /// Request recorded on-chain, still awaiting validator votes.
    Requested {
        request_id: B256,
        email: String,
        address: Address,
    },
    /// Validator consensus approved the link.
    Accepted {
        request_id: B256,
        email: String,
        address: Address,
    },
    /// Validator consensus rejected the link.
    Rejected {
        request_id: B256,
        email: String,
        address: Address,
    },
    /// No decision within the polling ceiling.
    Timeout {
        request_id: B256,
        email: String,
        address: Address,
    },
}

impl RegisterStep {
    /// True for every variant except `Sending`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RegisterStep::Sending { .. })
    }
}
