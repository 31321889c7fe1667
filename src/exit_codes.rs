//! Exit code logic for the openload process.
//!
//! Maps the failure kind of a command to a distinct process exit code so
//! scripts can tell a rejected request from a broken network.

use std::process::ExitCode;

use openload_core::{ApiError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    /// Usage, config, or local I/O failure.
    Failure,
    /// The service declined the request.
    Remote,
    /// The service response was unusable.
    Protocol,
    /// The HTTP exchange failed.
    Transport,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Remote => 2,
            Self::Protocol => 3,
            Self::Transport => 4,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Determines the exit outcome for a failed command.
///
/// The first [`ApiError`] in the context chain decides; anything else is a
/// generic failure.
pub(crate) fn exit_for_error(error: &anyhow::Error) -> ProcessExit {
    let api_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>());
    match api_error.map(ApiError::kind) {
        Some(ErrorKind::Remote) => ProcessExit::Remote,
        Some(ErrorKind::Protocol) => ProcessExit::Protocol,
        Some(ErrorKind::Transport) => ProcessExit::Transport,
        None => ProcessExit::Failure,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use openload_core::api::parse_server_timestamp;

    use super::*;

    fn remote_error() -> ApiError {
        let body = br#"{"status":404,"msg":"File not found","result":null}"#;
        openload_core::api::decode_envelope::<serde_json::Value>("file/dlticket", 200, body)
            .unwrap_err()
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            ProcessExit::Success,
            ProcessExit::Failure,
            ProcessExit::Remote,
            ProcessExit::Protocol,
            ProcessExit::Transport,
        ]
        .map(ProcessExit::code);
        assert_eq!(codes, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_exit_for_remote_error() {
        let err = anyhow::Error::from(remote_error());
        assert_eq!(exit_for_error(&err), ProcessExit::Remote);
    }

    #[test]
    fn test_exit_for_remote_error_behind_context() {
        let result: Result<(), ApiError> = Err(remote_error());
        let err = result.context("Ticket request failed").unwrap_err();
        assert_eq!(exit_for_error(&err), ProcessExit::Remote);
    }

    #[test]
    fn test_exit_for_protocol_error() {
        let source = parse_server_timestamp("valid_until", "yesterday").unwrap_err();
        let err = anyhow::Error::from(ApiError::from(source));
        assert_eq!(exit_for_error(&err), ProcessExit::Protocol);
    }

    #[test]
    fn test_exit_for_malformed_envelope_is_protocol() {
        let api_err = openload_core::api::decode_envelope::<serde_json::Value>(
            "file/info",
            503,
            b"<html>Service Unavailable</html>",
        )
        .unwrap_err();
        let err = anyhow::Error::from(api_err).context("Info lookup failed");
        assert_eq!(exit_for_error(&err), ProcessExit::Protocol);
    }

    #[test]
    fn test_exit_for_other_error_is_generic_failure() {
        let err = anyhow::anyhow!("Failed to read config file");
        assert_eq!(exit_for_error(&err), ProcessExit::Failure);
    }
}
