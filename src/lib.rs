//! Openload Core Library
//!
//! Client for a file-hosting service's download-authorization protocol:
//! negotiate a download ticket for a file id (optionally answering a captcha),
//! redeem it for a time-boxed direct download URL, and look up metadata for
//! batches of file ids.
//!
//! # Architecture
//!
//! - [`api`] - API client, response envelope decoding, typed results and errors
//!
//! Downloading the file bytes themselves is left to the caller.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use api::{
    ApiClient, ApiError, BuildError, CaptchaChallenge, ClientConfig, Credentials, DEFAULT_BASE_URL,
    DownloadGrant, ErrorKind, FileRecord, ProtocolError, RemoteError, Ticket,
};
