//! GoTrue (Supabase Auth) HTTP client.
//!
//! Thin reqwest wrapper for the password grant, the refresh-token grant and
//! logout. Response parsing lives in pure functions for testability.

use std::time::Duration;

use super::types::{AuthApi, AuthError, Session, unix_now};
use crate::config::SupabaseConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct GoTrueClient {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
}

impl GoTrueClient {
    /// Build a client for the provider described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, auth_url: config.auth_url(), api_key: config.anon_key.clone() })
    }

    async fn grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(token_url(&self.auth_url, grant_type))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }

        parse_session(&text, unix_now())
    }
}

#[async_trait::async_trait]
impl AuthApi for GoTrueClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.grant("password", serde_json::json!({ "email": email, "password": password }))
            .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.grant("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if sign_out_settled(status) {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(parse_error(status, &text))
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn token_url(auth_url: &str, grant_type: &str) -> String {
    format!("{auth_url}/token?grant_type={grant_type}")
}

/// A token that is already unknown to the provider counts as signed out.
fn sign_out_settled(status: u16) -> bool {
    (200..300).contains(&status) || matches!(status, 401 | 403 | 404)
}

fn parse_session(json: &str, now: i64) -> Result<Session, AuthError> {
    let session: Session = serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(session.with_expiry(now))
}

/// Map an error response to [`AuthError`], extracting the provider's message.
///
/// GoTrue has used `msg`, `message`, `error_description` and `error` across
/// versions; the first present wins.
fn parse_error(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|field| value.get(field).and_then(|v| v.as_str()).map(str::to_owned))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("auth provider returned status {status}"));

    if status == 401 && message.to_ascii_lowercase().contains("api key") {
        return AuthError::Configuration(message);
    }
    AuthError::Api { status, message }
}

#[cfg(test)]
#[path = "gotrue_test.rs"]
mod tests;
