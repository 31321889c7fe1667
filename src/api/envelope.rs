//! Response envelope decoding.
//!
//! Every endpoint answers `{"status": int, "msg": string, "result": ...}`.
//! The envelope is checked before the endpoint-specific payload is touched:
//! a non-success status becomes a [`RemoteError`] and `result` is ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, ProtocolError, RemoteError};
use super::wire::optional_text;

/// Envelope status meaning success.
pub const SUCCESS_STATUS: i64 = 200;

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: i64,
    #[serde(default, deserialize_with = "optional_text")]
    msg: Option<String>,
    #[serde(default)]
    result: Value,
}

/// Decodes a response body into the typed `result` payload.
///
/// `http_status` is only used for diagnostics; the envelope status decides
/// success.
///
/// # Errors
///
/// - [`ProtocolError::MalformedEnvelope`] when the body is not an envelope
/// - [`RemoteError`] when the envelope status is not [`SUCCESS_STATUS`]
/// - [`ProtocolError::MalformedPayload`] when `result` does not decode as `T`
pub fn decode_envelope<T>(endpoint: &'static str, http_status: u16, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let envelope: RawEnvelope = serde_json::from_slice(body).map_err(|source| {
        warn!(endpoint, http_status, error = %source, "Response body is not an API envelope");
        ProtocolError::MalformedEnvelope {
            endpoint,
            http_status,
            source,
        }
    })?;

    if envelope.status != SUCCESS_STATUS {
        let message = envelope.msg.unwrap_or_default();
        warn!(endpoint, status = envelope.status, msg = %message, "Service rejected request");
        return Err(RemoteError::new(envelope.status, message).into());
    }

    debug!(endpoint, "Envelope reported success");
    serde_json::from_value(envelope.result).map_err(|source| {
        warn!(endpoint, error = %source, "Unexpected result payload shape");
        ProtocolError::MalformedPayload { endpoint, source }.into()
    })
}
