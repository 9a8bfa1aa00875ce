//! Request-scoped auth client.
//!
//! DESIGN
//! ======
//! One `AuthClient` is built per request by the request hook. It pairs the
//! shared provider API handle with that request's cookie store, so reading the
//! session, signing in and signing out all read and write this request's
//! cookies and nothing else.
//!
//! TRADE-OFFS
//! ==========
//! `get_session` trusts an unexpired cookie without a provider round trip; the
//! provider is only contacted when the access token is about to expire.

use std::sync::Arc;

use super::cookies::{self, CookieOptions, CookieStore};
use super::types::{AuthApi, AuthError, Session, unix_now};
use crate::config::SupabaseConfig;

/// Refresh sessions whose access token expires within this window.
pub const EXPIRY_MARGIN_SECS: i64 = 90;

pub struct AuthClient {
    api: Arc<dyn AuthApi>,
    cookies: Arc<dyn CookieStore>,
    storage_key: String,
    cookie_options: CookieOptions,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("storage_key", &self.storage_key)
            .field("cookie_options", &self.cookie_options)
            .finish_non_exhaustive()
    }
}

/// Build a client bound to one request's cookies.
///
/// A [`SupabaseConfig`] only exists once the provider URL and key have been
/// validated, so construction itself cannot fail.
#[must_use]
pub fn create_server_client(
    config: &SupabaseConfig,
    api: Arc<dyn AuthApi>,
    cookies: Arc<dyn CookieStore>,
) -> AuthClient {
    AuthClient {
        api,
        cookies,
        storage_key: config.storage_key.clone(),
        cookie_options: CookieOptions::new(config.cookie_secure),
    }
}

impl AuthClient {
    /// Name of the cookie the session is stored under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Resolve the session stored in this request's cookies.
    ///
    /// Returns `Ok(None)` when there is no cookie, when it cannot be decoded,
    /// or when the provider refuses to refresh an expiring session. The last
    /// two also clear the stored session.
    ///
    /// # Errors
    ///
    /// Propagates provider failures other than a refresh rejection (transport
    /// errors, 5xx responses, configuration problems).
    pub async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(raw) = cookies::read_chunked(self.cookies.as_ref(), &self.storage_key) else {
            return Ok(None);
        };
        let Some(session) = cookies::decode_session(&raw) else {
            tracing::debug!(storage_key = %self.storage_key, "stored session unreadable, clearing");
            self.remove_session();
            return Ok(None);
        };

        if !session.expires_within(unix_now(), EXPIRY_MARGIN_SECS) {
            return Ok(Some(session));
        }

        match self.api.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => {
                tracing::debug!(user_id = %refreshed.user.id, "session refreshed");
                self.save_session(&refreshed)?;
                Ok(Some(refreshed))
            }
            Err(AuthError::Api { status, message }) if status < 500 => {
                tracing::debug!(status, %message, "session refresh rejected, clearing");
                self.remove_session();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Sign in with email and password. A single provider attempt; on success
    /// the new session is written to the response cookies.
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged; no cookies are written.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .api
            .sign_in_with_password(email, password)
            .await?;
        self.save_session(&session)?;
        Ok(session)
    }

    /// Revoke the current session and clear its cookies.
    ///
    /// # Errors
    ///
    /// Returns the provider error when revocation fails; the cookies are left
    /// in place so the session stays usable.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let stored = cookies::read_chunked(self.cookies.as_ref(), &self.storage_key)
            .as_deref()
            .and_then(cookies::decode_session);
        if let Some(session) = stored {
            self.api.sign_out(&session.access_token).await?;
        }
        self.remove_session();
        Ok(())
    }

    fn save_session(&self, session: &Session) -> Result<(), AuthError> {
        let value = cookies::encode_session(session)?;
        cookies::write_chunked(self.cookies.as_ref(), &self.storage_key, &value, &self.cookie_options);
        Ok(())
    }

    fn remove_session(&self) {
        cookies::remove_chunked(self.cookies.as_ref(), &self.storage_key, &self.cookie_options);
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
