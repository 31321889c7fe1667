//! Download ticket negotiation (`file/dlticket`).

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::timestamp::parse_server_timestamp;
use super::wire::{optional_dimension, optional_text, unsigned_integer};
use super::{ApiClient, ApiError, Credentials, Endpoint};

/// Image captcha the service wants solved before a ticket can be redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaChallenge {
    /// Captcha image URL.
    pub url: String,
    /// Image width in pixels, when reported.
    pub width: Option<u32>,
    /// Image height in pixels, when reported.
    pub height: Option<u32>,
}

/// Short-lived authorization to request a download URL for one file.
///
/// The service invalidates a ticket once `valid_until` passes or once it has
/// been redeemed; this client does not track either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// Ticket token to pass to [`ApiClient::resolve_download`].
    pub ticket: String,
    /// Captcha challenge, if the service requires one.
    pub captcha: Option<CaptchaChallenge>,
    /// Seconds the service wants the caller to wait before redeeming.
    pub wait_time_secs: u64,
    /// Expiry, in server-local time.
    pub valid_until: NaiveDateTime,
}

impl Ticket {
    /// Whether a captcha answer must accompany redemption.
    #[must_use]
    pub fn requires_captcha(&self) -> bool {
        self.captcha.is_some()
    }

    /// How long the service wants the caller to wait before redeeming.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time_secs)
    }

    /// Whether the ticket has not yet expired at `now` (server-local time).
    #[must_use]
    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        now < self.valid_until
    }
}

#[derive(Debug, Deserialize)]
struct TicketPayload {
    ticket: String,
    #[serde(default, deserialize_with = "optional_text")]
    captcha_url: Option<String>,
    #[serde(default, deserialize_with = "optional_dimension")]
    captcha_w: Option<u32>,
    #[serde(default, deserialize_with = "optional_dimension")]
    captcha_h: Option<u32>,
    #[serde(default, deserialize_with = "unsigned_integer")]
    wait_time: u64,
    valid_until: String,
}

impl TicketPayload {
    fn into_ticket(self) -> Result<Ticket, ApiError> {
        let valid_until = parse_server_timestamp("valid_until", &self.valid_until)?;
        let captcha = self
            .captcha_url
            .filter(|url| !url.is_empty())
            .map(|url| CaptchaChallenge {
                url,
                width: self.captcha_w,
                height: self.captcha_h,
            });
        Ok(Ticket {
            ticket: self.ticket,
            captcha,
            wait_time_secs: self.wait_time,
            valid_until,
        })
    }
}

impl ApiClient {
    /// Requests a download ticket for `file_id`.
    ///
    /// With `credentials` the request carries `login` and `key`; without,
    /// neither parameter is sent.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if the HTTP exchange fails
    /// - [`ApiError::Remote`] if the service declines (unknown file, quota, ...)
    /// - [`ApiError::Protocol`] if the body or `valid_until` is malformed
    #[instrument(skip(self, credentials), fields(authenticated = credentials.is_some()))]
    pub async fn request_ticket(
        &self,
        file_id: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Ticket, ApiError> {
        let mut query = vec![("file", file_id)];
        if let Some(credentials) = credentials {
            query.push(("login", credentials.login()));
            query.push(("key", credentials.key()));
        }
        let url = self.endpoint_url(Endpoint::Ticket, &query);

        let payload: TicketPayload = self.get_envelope(Endpoint::Ticket, url).await?;
        let ticket = payload.into_ticket()?;
        debug!(
            captcha = ticket.requires_captcha(),
            wait_secs = ticket.wait_time_secs,
            valid_until = %ticket.valid_until,
            "Ticket issued"
        );
        Ok(ticket)
    }
}
