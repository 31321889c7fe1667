//! Shared helpers for unit tests that talk to a wiremock server.

pub mod socket_guard;

use wiremock::MockServer;

use crate::api::{ApiClient, ClientConfig};

/// Builds a client whose base URL is the mock server's `/1` prefix.
#[allow(clippy::unwrap_used)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::default().with_base_url(format!("{}/1", server.uri()))).unwrap()
}

/// Wraps a result payload in a success envelope.
pub fn ok_envelope(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"status": 200, "msg": "OK", "result": result})
}
