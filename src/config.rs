//! Auth provider configuration parsed from environment variables.
//!
//! The provider URL and publishable key are required. Startup refuses to
//! continue without them, so a constructed [`SupabaseConfig`] is always
//! usable by the client factory.

pub const URL_VAR: &str = "PUBLIC_SUPABASE_URL";
pub const KEY_VAR: &str = "PUBLIC_SUPABASE_PUBLISHABLE_KEY";
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTH_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required config: env var {var} not set")]
    Missing { var: &'static str },

    /// A variable is set but cannot be used.
    #[error("invalid config {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for AuthTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_AUTH_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_AUTH_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Provider base URL without a trailing slash.
    pub url: String,
    pub anon_key: String,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Cookie name the session is stored under (`sb-<project-ref>-auth-token`).
    pub storage_key: String,
    pub timeouts: AuthTimeouts,
}

impl SupabaseConfig {
    /// Validate a provider URL and key.
    ///
    /// `cookie_secure` defaults to whether the provider is reached over https.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for blank values and
    /// [`ConfigError::Invalid`] when the URL is not an http(s) URL with a host.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing { var: URL_VAR });
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing { var: KEY_VAR });
        }

        let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::Invalid { var: URL_VAR, reason: e.to_string() })?;
        let cookie_secure = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(ConfigError::Invalid { var: URL_VAR, reason: format!("unsupported scheme '{other}'") });
            }
        };
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::Invalid { var: URL_VAR, reason: "missing host".into() })?;
        let project_ref = host.split('.').next().unwrap_or(host);

        Ok(Self {
            url: url.to_owned(),
            anon_key: anon_key.to_owned(),
            cookie_secure,
            storage_key: format!("sb-{project_ref}-auth-token"),
            timeouts: AuthTimeouts::default(),
        })
    }

    /// Build typed config from the process environment.
    ///
    /// Required:
    /// - `PUBLIC_SUPABASE_URL`
    /// - `PUBLIC_SUPABASE_PUBLISHABLE_KEY`
    ///
    /// Optional:
    /// - `COOKIE_SECURE`: overrides the https inference
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// See [`SupabaseConfig::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SupabaseConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`SupabaseConfig::new`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(URL_VAR).ok_or(ConfigError::Missing { var: URL_VAR })?;
        let anon_key = lookup(KEY_VAR).ok_or(ConfigError::Missing { var: KEY_VAR })?;
        let mut config = Self::new(&url, &anon_key)?;

        if let Some(secure) = lookup("COOKIE_SECURE").as_deref().and_then(parse_bool) {
            config.cookie_secure = secure;
        }
        config.timeouts = AuthTimeouts {
            request_secs: parse_u64(lookup("AUTH_REQUEST_TIMEOUT_SECS"), DEFAULT_AUTH_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("AUTH_CONNECT_TIMEOUT_SECS"), DEFAULT_AUTH_CONNECT_TIMEOUT_SECS),
        };

        Ok(config)
    }

    /// Base URL of the provider's auth API.
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
