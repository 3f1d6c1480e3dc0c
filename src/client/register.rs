//! Relayed register flow.
//!
//! # State Machine
//! ```text
//! Submit ──(relay accepted)──▶ Poll ──(settled or ceiling)──▶ finished
//! ```
//! Submission POSTs the signed request to a freshly assigned validator
//! relay; polling then reads the request status from chain state every
//! 3 s until the validator set settles it or 60 s elapse. The terminal
//! event maps `Pending → Timeout`, `Requested`, `Accepted`, anything
//! else → `Rejected`.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, B256};

use crate::client::steps::RegisterStep;
use crate::client::LinkClient;
use crate::contract::RequestStatus;
use crate::error::LinkResult;
use crate::signing;

/// Fixed polling cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);
/// Wall-clock ceiling on the polling loop.
pub const POLL_CEILING: Duration = Duration::from_secs(60);

enum State {
    Submit {
        email: String,
    },
    Poll {
        email: String,
        address: Address,
        request_id: B256,
    },
    Finished,
}

/// Pull-based register flow; see [`LinkClient::register`].
pub struct RegisterFlow {
    client: LinkClient,
    state: State,
}

impl RegisterFlow {
    pub(crate) fn new(client: LinkClient, email: String) -> Self {
        Self {
            client,
            state: State::Submit { email },
        }
    }

    /// Drive the flow to its next progress event.
    ///
    /// Returns `Ok(None)` once finished. Abandoning the flow stops the
    /// polling but cannot un-submit an already-relayed request.
    pub async fn next_step(&mut self) -> LinkResult<Option<RegisterStep>> {
        match std::mem::replace(&mut self.state, State::Finished) {
            State::Submit { email } => {
                let relay_url = self.client.selector().assign_relay_endpoint().await?;
                let connected = self.client.selector().connected_signer()?;
                let address = connected.address;

                let nonce = self.client.nonce_of(address).await?;
                let signature =
                    signing::sign_request(connected.signer.as_ref(), &email, nonce).await?;
                let request_id = self
                    .client
                    .relay()
                    .submit(&relay_url, &email, address, &signature)
                    .await?;
                tracing::info!(request_id = %request_id, relay = %relay_url, "Register request relayed");

                self.state = State::Poll {
                    email: email.clone(),
                    address,
                    request_id,
                };
                Ok(Some(RegisterStep::Sending {
                    request_id,
                    email,
                    address,
                }))
            }
            State::Poll {
                email,
                address,
                request_id,
            } => {
                let client = self.client.clone();
                let status = poll_until_settled(
                    || client.get_register_status(request_id),
                    POLL_INTERVAL,
                    POLL_CEILING,
                )
                .await?;
                tracing::info!(request_id = %request_id, status = ?status, "Register request settled");

                let step = match status {
                    RequestStatus::Pending => RegisterStep::Timeout {
                        request_id,
                        email,
                        address,
                    },
                    RequestStatus::Requested => RegisterStep::Requested {
                        request_id,
                        email,
                        address,
                    },
                    RequestStatus::Accepted => RegisterStep::Accepted {
                        request_id,
                        email,
                        address,
                    },
                    RequestStatus::Rejected => RegisterStep::Rejected {
                        request_id,
                        email,
                        address,
                    },
                };
                Ok(Some(step))
            }
            State::Finished => Ok(None),
        }
    }
}

/// Poll `fetch` at a fixed cadence until the status settles or the
/// ceiling elapses, whichever comes first. One read per iteration; a
/// `Pending` return past the ceiling means timeout.
pub(crate) async fn poll_until_settled<F, Fut>(
    mut fetch: F,
    interval: Duration,
    ceiling: Duration,
) -> LinkResult<RequestStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LinkResult<RequestStatus>>,
{
    let started = tokio::time::Instant::now();
    loop {
        let status = fetch().await?;
        if status.is_settled() {
            return Ok(status);
        }
        if started.elapsed() >= ceiling {
            return Ok(RequestStatus::Pending);
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_poll_settles_before_ceiling() {
        // Pending for the first 19 polls (57 s at 3 s cadence), accepted
        // on poll 20.
        let polls = Cell::new(0usize);
        let status = poll_until_settled(
            || {
                polls.set(polls.get() + 1);
                let status = if polls.get() >= 20 {
                    RequestStatus::Accepted
                } else {
                    RequestStatus::Pending
                };
                async move { Ok(status) }
            },
            POLL_INTERVAL,
            POLL_CEILING,
        )
        .await
        .unwrap();

        assert_eq!(status, RequestStatus::Accepted);
        assert_eq!(polls.get(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out_and_stops() {
        let polls = Cell::new(0usize);
        let status = poll_until_settled(
            || {
                polls.set(polls.get() + 1);
                async { Ok(RequestStatus::Pending) }
            },
            POLL_INTERVAL,
            POLL_CEILING,
        )
        .await
        .unwrap();

        assert_eq!(status, RequestStatus::Pending);
        // 0 s, 3 s, ..., 60 s inclusive; no polls past the ceiling.
        assert_eq!(polls.get(), 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_rejection_is_terminal() {
        let polls = Cell::new(0usize);
        let status = poll_until_settled(
            || {
                polls.set(polls.get() + 1);
                let status = if polls.get() >= 2 {
                    RequestStatus::Rejected
                } else {
                    RequestStatus::Pending
                };
                async move { Ok(status) }
            },
            POLL_INTERVAL,
            POLL_CEILING,
        )
        .await
        .unwrap();
        assert_eq!(status, RequestStatus::Rejected);
        assert_eq!(polls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_read_errors_propagate() {
        let err = poll_until_settled(
            || async { Err(LinkError::NoProvider) },
            POLL_INTERVAL,
            POLL_CEILING,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LinkError::NoProvider));
    }
}
