//! Shared User-Agent string for API traffic.

/// Default User-Agent for API requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("openload/{version} (api-client)")
}
