//! Request signing and verification.
//!
//! # Responsibilities
//! - Canonical signing payload for link requests
//! - Sign with an alloy signer, verify by address recovery
//!
//! # Design Decisions
//! - Payload construction is the wire contract with the relay-side
//!   verifier: SHA-256 the trimmed email, ABI-encode
//!   `(bytes32, address, uint256)` fixed-width, keccak256 the encoding,
//!   then sign the 32-byte digest as an EIP-191 personal message
//! - Verification absorbs recovery errors as `false`; a malformed
//!   signature is simply not valid

pub mod request_id;

use alloy::primitives::{keccak256, Address, Signature, B256, U256};
use alloy::signers::Signer;
use alloy::sol_types::SolValue;
use sha2::{Digest, Sha256};

use crate::error::LinkResult;

/// SHA-256 digest of the trimmed email.
pub fn email_hash(email: &str) -> B256 {
    B256::from_slice(&Sha256::digest(email.trim().as_bytes()))
}

/// The 32-byte message digest a wallet signs for a link request.
///
/// Byte-identical between this client and any relay-side verifier.
pub fn request_payload(email: &str, address: Address, nonce: U256) -> B256 {
    let encoded = (email_hash(email), address, nonce).abi_encode();
    keccak256(encoded)
}

/// Sign a link request with the given signer.
pub async fn sign_request<S: Signer + Sync>(
    signer: &S,
    email: &str,
    nonce: U256,
) -> LinkResult<Signature> {
    let payload = request_payload(email, signer.address(), nonce);
    let signature = signer.sign_message(payload.as_slice()).await?;
    Ok(signature)
}

/// Verify a link request signature against the claimed address.
///
/// Returns `false` on any recovery failure; never errors.
pub fn verify_request(address: Address, email: &str, nonce: U256, signature: &Signature) -> bool {
    let payload = request_payload(email, address, nonce);
    match signature.recover_address_from_msg(payload.as_slice()) {
        Ok(recovered) => recovered == address,
        Err(_) => false,
    }
}
