//! Auth provider types and the provider trait.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by auth provider operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider reports that this application is misconfigured
    /// (e.g. an unknown or missing API key).
    #[error("auth configuration error: {0}")]
    Configuration(String),

    /// The HTTP request to the provider failed before a response arrived.
    #[error("auth request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A provider payload could not be (de)serialized.
    #[error("auth payload parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// `true` when the failure is caused by local configuration rather than
    /// by the request being served.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::HttpClientBuild(_))
    }

    /// The underlying provider or transport text, without the variant prefix
    /// that `Display` adds.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration(message)
            | Self::Request(message)
            | Self::Parse(message)
            | Self::HttpClientBuild(message)
            | Self::Api { message, .. } => message,
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Identity record of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Token bundle issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    /// Unix seconds. Filled from `expires_in` when the provider omits it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// Fill `expires_at` relative to `now` if the provider left it out.
    #[must_use]
    pub fn with_expiry(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now.saturating_add(self.expires_in));
        }
        self
    }

    /// `true` when the access token expires within `margin_secs` of `now`.
    /// Sessions without a known expiry never count as expiring.
    #[must_use]
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|at| at.saturating_sub(now) < margin_secs)
    }
}

/// Current time as unix seconds.
#[must_use]
pub fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// Provider-neutral async trait for the auth backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange an email and password for a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when the provider rejects the credentials.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Exchange a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] when the refresh token is no longer valid.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError>;

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or refuses.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
