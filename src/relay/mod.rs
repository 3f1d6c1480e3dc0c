//! Off-chain relay HTTP client.
//!
//! # Responsibilities
//! - Health-check a validator's relay endpoint
//! - Submit signed register requests to the relay's `request` path
//! - Map relay response codes onto typed errors
//!
//! # Wire Protocol
//! ```text
//! GET  /         → 200 with JSON body literal "OK" when healthy
//! POST /request  body {email, address, signature}
//!                → JSON {code, data: {requestId}, error?}
//! ```
//! Body `code` semantics: 200 continue, 400 parameter validation,
//! 401 invalid signature, 402 email taken, 403 address taken,
//! 500 server error, anything else unknown.

use std::time::Duration;

use alloy::primitives::{Address, Signature, B256};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LinkError, LinkResult};

const REQUEST_PATH: &str = "request";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RegisterBody {
    email: String,
    address: String,
    signature: String,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    code: u32,
    #[serde(default)]
    data: Option<RelayData>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayData {
    request_id: String,
}

/// HTTP client for validator relay endpoints.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new() -> LinkResult<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// Probe the relay's health endpoint.
    ///
    /// True iff it answers HTTP 200 with the JSON body literal `"OK"`.
    /// Any failure is `false`; never errors.
    pub async fn is_up(&self, base: &Url) -> bool {
        let response = match self.http.get(base.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %base, error = %e, "Relay health check failed");
                return false;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            return false;
        }
        matches!(response.json::<String>().await, Ok(body) if body == "OK")
    }

    /// Submit a signed register request; returns the relay-assigned
    /// request id.
    pub async fn submit(
        &self,
        base: &Url,
        email: &str,
        address: Address,
        signature: &Signature,
    ) -> LinkResult<B256> {
        let url = base.join(REQUEST_PATH)?;
        let body = RegisterBody {
            email: email.to_string(),
            address: address.to_string(),
            signature: alloy::hex::encode_prefixed(signature.as_bytes()),
        };

        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::RelayStatus(status.as_u16()));
        }

        let response: RelayResponse = response.json().await?;
        map_relay_code(response.code)?;
        if let Some(error) = &response.error {
            tracing::warn!(error = %error, "Relay accepted request with error detail");
        }

        let data = response
            .data
            .ok_or_else(|| LinkError::InvalidResponse("missing data".to_string()))?;
        data.request_id
            .parse::<B256>()
            .map_err(|e| LinkError::InvalidResponse(format!("bad requestId: {e}")))
    }
}

/// Map a relay body code to continuation or a typed error.
pub(crate) fn map_relay_code(code: u32) -> LinkResult<()> {
    match code {
        200 => Ok(()),
        400 => Err(LinkError::FailedParameterValidation),
        401 => Err(LinkError::NotValidSignature),
        402 => Err(LinkError::AlreadyRegisteredEmail),
        403 => Err(LinkError::AlreadyRegisteredAddress),
        500 => Err(LinkError::ServerError),
        other => Err(LinkError::UnknownError(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_code_mapping() {
        assert!(map_relay_code(200).is_ok());
        assert!(matches!(
            map_relay_code(400),
            Err(LinkError::FailedParameterValidation)
        ));
        assert!(matches!(
            map_relay_code(401),
            Err(LinkError::NotValidSignature)
        ));
        assert!(matches!(
            map_relay_code(402),
            Err(LinkError::AlreadyRegisteredEmail)
        ));
        assert!(matches!(
            map_relay_code(403),
            Err(LinkError::AlreadyRegisteredAddress)
        ));
        assert!(matches!(map_relay_code(500), Err(LinkError::ServerError)));
        assert!(matches!(
            map_relay_code(301),
            Err(LinkError::UnknownError(301))
        ));
    }

    #[test]
    fn test_response_parsing() {
        let parsed: RelayResponse = serde_json::from_str(
            r#"{"code":200,"data":{"requestId":"0x1111111111111111111111111111111111111111111111111111111111111111"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.code, 200);
        assert!(parsed.data.is_some());
        assert!(parsed.error.is_none());

        let parsed: RelayResponse =
            serde_json::from_str(r#"{"code":402,"error":{"message":"E002"}}"#).unwrap();
        assert_eq!(parsed.code, 402);
        assert!(parsed.data.is_none());
        assert!(parsed.error.is_some());
    }

    #[test]
    fn test_register_body_shape() {
        let body = RegisterBody {
            email: "a@example.com".to_string(),
            address: Address::repeat_byte(0x11).to_string(),
            signature: "0xabcd".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email"], "a@example.com");
        assert!(json["address"].as_str().unwrap().starts_with("0x"));
        assert_eq!(json["signature"], "0xabcd");
    }
}
