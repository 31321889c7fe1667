//! Ticket redemption (`file/dl`).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::timestamp::parse_server_timestamp;
use super::wire::{optional_text, unsigned_integer};
use super::{ApiClient, ApiError, Endpoint};

/// Authorized direct download URL plus file metadata.
///
/// The URL expires on the service side; the expiry is not reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadGrant {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// SHA-1 content hash, hex.
    pub sha1: String,
    /// MIME type.
    pub content_type: String,
    /// Upload time, server-local.
    pub upload_at: NaiveDateTime,
    /// Direct download URL.
    pub url: String,
    /// Replay token issued with the URL.
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct DownloadPayload {
    #[serde(default, deserialize_with = "optional_text")]
    name: Option<String>,
    #[serde(deserialize_with = "unsigned_integer")]
    size: u64,
    #[serde(default, deserialize_with = "optional_text")]
    sha1: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    content_type: Option<String>,
    upload_at: String,
    url: String,
    #[serde(default, deserialize_with = "optional_text")]
    token: Option<String>,
}

impl DownloadPayload {
    fn into_grant(self) -> Result<DownloadGrant, ApiError> {
        let upload_at = parse_server_timestamp("upload_at", &self.upload_at)?;
        Ok(DownloadGrant {
            name: self.name.unwrap_or_default(),
            size: self.size,
            sha1: self.sha1.unwrap_or_default(),
            content_type: self.content_type.unwrap_or_default(),
            upload_at,
            url: self.url,
            token: self.token.unwrap_or_default(),
        })
    }
}

impl ApiClient {
    /// Redeems `ticket` for a direct download URL.
    ///
    /// `captcha_answer` is required only when the ticket carried a
    /// [`CaptchaChallenge`](super::CaptchaChallenge); `None` is sent as an
    /// empty `captcha_response`, which the service treats the same as no answer.
    ///
    /// A ticket is meant to be redeemed once. Redeeming it again is not
    /// prevented locally; the service decides the outcome.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if the HTTP exchange fails
    /// - [`ApiError::Remote`] if the service declines (expired ticket, wrong captcha, ...)
    /// - [`ApiError::Protocol`] if the body, `size` or `upload_at` is malformed
    #[instrument(skip(self, ticket, captcha_answer), fields(captcha = captcha_answer.is_some()))]
    pub async fn resolve_download(
        &self,
        file_id: &str,
        ticket: &str,
        captcha_answer: Option<&str>,
    ) -> Result<DownloadGrant, ApiError> {
        let url = self.endpoint_url(
            Endpoint::Download,
            &[
                ("file", file_id),
                ("ticket", ticket),
                ("captcha_response", captcha_answer.unwrap_or_default()),
            ],
        );

        let payload: DownloadPayload = self.get_envelope(Endpoint::Download, url).await?;
        let grant = payload.into_grant()?;
        debug!(name = %grant.name, size = grant.size, "Download URL granted");
        Ok(grant)
    }
}
