//! Deterministic, collision-checked request identifiers.
//!
//! A candidate id is the keccak256 of `(emailHash, address, nonce, salt)`
//! with 32 fresh random salt bytes. Each candidate is checked against the
//! registry's availability oracle and regenerated on collision. The salt
//! makes a real collision astronomically unlikely, but the loop is still
//! bounded so a misbehaving oracle cannot spin forever.

use std::future::Future;

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::sol_types::SolValue;
use rand::RngCore;

use crate::error::{LinkError, LinkResult};

/// Retry bound for the regenerate-on-collision loop.
pub const MAX_ATTEMPTS: usize = 1000;

/// Candidate id for one `(emailHash, address, nonce, salt)` tuple.
pub fn candidate(email_hash: B256, address: Address, nonce: U256, salt: B256) -> B256 {
    keccak256((email_hash, address, nonce, salt).abi_encode())
}

/// Generate a request id not yet present in the registry.
///
/// `is_available` is one read against chain state per attempt; the id is
/// returned as soon as the oracle reports it unused. Past [`MAX_ATTEMPTS`]
/// the loop fails with [`LinkError::RequestIdExhausted`].
pub async fn generate<F, Fut>(
    email_hash: B256,
    address: Address,
    nonce: U256,
    mut is_available: F,
) -> LinkResult<B256>
where
    F: FnMut(B256) -> Fut,
    Fut: Future<Output = LinkResult<bool>>,
{
    let mut rng = rand::thread_rng();
    for attempt in 0..MAX_ATTEMPTS {
        let mut salt = B256::ZERO;
        rng.fill_bytes(&mut salt.0);
        let id = candidate(email_hash, address, nonce, salt);
        if is_available(id).await? {
            return Ok(id);
        }
        tracing::debug!(attempt, id = %id, "Request id occupied, regenerating");
    }
    Err(LinkError::RequestIdExhausted(MAX_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn inputs() -> (B256, Address, U256) {
        (
            B256::repeat_byte(0xab),
            Address::repeat_byte(0x11),
            U256::from(5),
        )
    }

    #[test]
    fn test_candidate_salt_sensitivity() {
        let (email_hash, address, nonce) = inputs();
        let a = candidate(email_hash, address, nonce, B256::repeat_byte(0x01));
        let b = candidate(email_hash, address, nonce, B256::repeat_byte(0x01));
        let c = candidate(email_hash, address, nonce, B256::repeat_byte(0x02));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_first_available_candidate_wins() {
        let (email_hash, address, nonce) = inputs();
        let reads = Cell::new(0usize);
        let approved = Cell::new(B256::ZERO);

        // First 3 candidates occupied; the 4th is free.
        let id = generate(email_hash, address, nonce, |id| {
            reads.set(reads.get() + 1);
            let free = reads.get() > 3;
            if free {
                approved.set(id);
            }
            async move { Ok(free) }
        })
        .await
        .unwrap();

        assert_eq!(reads.get(), 4);
        assert_eq!(id, approved.get());
    }

    #[tokio::test]
    async fn test_retry_bound() {
        let (email_hash, address, nonce) = inputs();
        let reads = Cell::new(0usize);

        let err = generate(email_hash, address, nonce, |_| {
            reads.set(reads.get() + 1);
            async { Ok(false) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, LinkError::RequestIdExhausted(MAX_ATTEMPTS)));
        assert_eq!(reads.get(), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_oracle_error_propagates() {
        let (email_hash, address, nonce) = inputs();
        let err = generate(email_hash, address, nonce, |_| async {
            Err(LinkError::NoProvider)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, LinkError::NoProvider));
    }
}
