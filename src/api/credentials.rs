//! API login credentials.

use std::fmt;

/// API login and key, always supplied together.
///
/// Operations take `Option<&Credentials>`; `None` makes an unauthenticated
/// request, which the service serves under a different entitlement.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    key: String,
}

impl Credentials {
    /// Creates credentials from an API login and key.
    #[must_use]
    pub fn new(login: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            key: key.into(),
        }
    }

    /// Builds credentials only when both halves are present.
    ///
    /// Returns `None` if either value is missing, so a login is never sent
    /// without its key.
    #[must_use]
    pub fn from_parts(login: Option<String>, key: Option<String>) -> Option<Self> {
        match (login, key) {
            (Some(login), Some(key)) => Some(Self::new(login, key)),
            _ => None,
        }
    }

    /// API login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("key", &"<redacted>")
            .finish()
    }
}
