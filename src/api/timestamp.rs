//! Server timestamp parsing.
//!
//! The service sends timestamps as `YYYY-MM-DD HH:MM:SS` with no offset. They
//! are in the server's local time zone, which the API does not disclose, so
//! they are parsed into [`NaiveDateTime`] and never silently treated as UTC.

use chrono::NaiveDateTime;

use super::error::ProtocolError;

/// `strftime` format of every timestamp field the service sends.
pub const SERVER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a server timestamp field.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidTimestamp`] naming `field` when `value`
/// does not match [`SERVER_TIMESTAMP_FORMAT`].
pub fn parse_server_timestamp(
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, ProtocolError> {
    NaiveDateTime::parse_from_str(value, SERVER_TIMESTAMP_FORMAT).map_err(|source| {
        ProtocolError::InvalidTimestamp {
            field,
            value: value.to_string(),
            source,
        }
    })
}
