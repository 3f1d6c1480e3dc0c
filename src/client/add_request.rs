//! Direct on-chain add-request flow.
//!
//! # State Machine
//! ```text
//! Submit ──(tx sent)──▶ Confirm ──(event matched)──▶ finished
//! ```
//! `Adding { tx_hash }` is yielded immediately after submission; the
//! confirmation event is only checked in the next step. A confirmed
//! transaction without the expected `AddedRequestItem` event is fatal and
//! never retried, since retrying the write could double-submit.

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::PendingTransactionBuilder;

use crate::client::steps::AddRequestStep;
use crate::client::LinkClient;
use crate::contract::LinkRegistry;
use crate::error::{LinkError, LinkResult};
use crate::signing;
use crate::signing::request_id;

enum State {
    Submit {
        email: String,
    },
    Confirm {
        email: String,
        request_id: B256,
        pending: PendingTransactionBuilder<Ethereum>,
    },
    Finished,
}

/// Pull-based add-request flow; see [`LinkClient::add_request`].
pub struct AddRequestFlow {
    client: LinkClient,
    state: State,
}

impl AddRequestFlow {
    pub(crate) fn new(client: LinkClient, email: String) -> Self {
        Self {
            client,
            state: State::Submit { email },
        }
    }

    /// Drive the flow to its next progress event.
    ///
    /// Returns `Ok(None)` once finished. Any error terminates the flow;
    /// an abandoned flow stops here but cannot un-submit the transaction.
    pub async fn next_step(&mut self) -> LinkResult<Option<AddRequestStep>> {
        match std::mem::replace(&mut self.state, State::Finished) {
            State::Submit { email } => {
                let connected = self.client.selector().connected_signer()?;
                let registry =
                    LinkRegistry::new(self.client.selector().link_address()?, connected.provider);
                let address = connected.address;

                let nonce = registry.nonceOf(address).call().await?;
                let email_hash = signing::email_hash(&email);
                let signature =
                    signing::sign_request(connected.signer.as_ref(), &email, nonce).await?;

                let request_id = request_id::generate(email_hash, address, nonce, |id| {
                    let registry = registry.clone();
                    async move { Ok(registry.isAvailable(id).call().await?) }
                })
                .await?;

                let pending = registry
                    .addRequest(
                        request_id,
                        email_hash,
                        address,
                        Bytes::from(signature.as_bytes().to_vec()),
                    )
                    .send()
                    .await?;
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, request_id = %request_id, "Add request submitted");

                self.state = State::Confirm {
                    email,
                    request_id,
                    pending,
                };
                Ok(Some(AddRequestStep::Adding { tx_hash }))
            }
            State::Confirm {
                email,
                request_id,
                pending,
            } => {
                let receipt = pending.get_receipt().await?;
                if !receipt.status() {
                    return Err(LinkError::TransactionReverted);
                }

                let events = receipt
                    .logs()
                    .iter()
                    .filter_map(|log| log.log_decode::<LinkRegistry::AddedRequestItem>().ok())
                    .map(|log| log.inner.data);
                let (id, email_hash, address) = matching_event(events, request_id)
                    .ok_or(LinkError::MissingConfirmationEvent)?;

                tracing::info!(request_id = %id, "Add request confirmed");
                Ok(Some(AddRequestStep::Done {
                    id,
                    email,
                    email_hash,
                    address,
                }))
            }
            State::Finished => Ok(None),
        }
    }
}

/// Identity fields extracted from a confirmation event; kept separate so
/// event-matching is unit-testable without a chain.
pub(crate) fn matching_event(
    events: impl IntoIterator<Item = LinkRegistry::AddedRequestItem>,
    request_id: B256,
) -> Option<(B256, B256, Address)> {
    events
        .into_iter()
        .find(|event| event.id == request_id)
        .map(|event| (event.id, event.email, event.wallet))
}
