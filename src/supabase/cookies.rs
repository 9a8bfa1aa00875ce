//! Cookie-backed session storage.
//!
//! ARCHITECTURE
//! ============
//! The auth client only sees the [`CookieStore`] contract (`get`, `set`,
//! `remove`). [`RequestCookies`] implements it over the inbound `Cookie`
//! header; every write lands in the jar's delta, which the request hook turns
//! into `Set-Cookie` headers once the handler has run.
//!
//! Sessions are stored in the `@supabase/ssr` format: `base64-` followed by
//! unpadded base64url JSON, split across `<key>.0`, `<key>.1`, … when the value
//! is too large for a single cookie.

use std::sync::{Mutex, PoisonError};

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::Duration;

use super::types::{AuthError, Session};

pub const MAX_CHUNK_SIZE: usize = 3180;
const BASE64_PREFIX: &str = "base64-";
const DEFAULT_MAX_AGE_DAYS: i64 = 400;

// =============================================================================
// COOKIE STORE
// =============================================================================

/// Per-write cookie options. Path, `HttpOnly` and `SameSite=Lax` are fixed by
/// the store; only what varies by deployment or call lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    pub secure: bool,
    pub max_age: Option<Duration>,
}

impl CookieOptions {
    #[must_use]
    pub fn new(secure: bool) -> Self {
        Self { secure, max_age: Some(Duration::days(DEFAULT_MAX_AGE_DAYS)) }
    }
}

/// Cookie accessor bound to one request/response pair.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, options: &CookieOptions);
    fn remove(&self, name: &str, options: &CookieOptions);
}

/// [`CookieStore`] over the request's cookie jar.
pub struct RequestCookies {
    jar: Mutex<CookieJar>,
}

impl Default for RequestCookies {
    fn default() -> Self {
        Self { jar: Mutex::new(CookieJar::new()) }
    }
}

impl RequestCookies {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self { jar: Mutex::new(CookieJar::from_headers(headers)) }
    }

    /// Take the jar (original cookies plus pending writes) for the response.
    pub fn take_jar(&self) -> CookieJar {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *jar, CookieJar::new())
    }

    fn update(&self, f: impl FnOnce(CookieJar) -> CookieJar) {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::replace(&mut *jar, CookieJar::new());
        *jar = f(current);
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        let jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        jar.get(name).map(|c| c.value().to_owned())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        let mut cookie = Cookie::build((name.to_owned(), value.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(options.secure);
        if let Some(max_age) = options.max_age {
            cookie = cookie.max_age(max_age);
        }
        self.update(|jar| jar.add(cookie));
    }

    fn remove(&self, name: &str, _options: &CookieOptions) {
        let cookie = Cookie::build((name.to_owned(), "")).path("/");
        self.update(|jar| jar.remove(cookie));
    }
}

// =============================================================================
// SESSION ENCODING
// =============================================================================

/// Encode a session as a cookie value.
///
/// # Errors
///
/// Returns [`AuthError::Parse`] if the session cannot be serialized.
pub fn encode_session(session: &Session) -> Result<String, AuthError> {
    let json = serde_json::to_string(session).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(format!("{BASE64_PREFIX}{}", URL_SAFE_NO_PAD.encode(json)))
}

/// Decode a stored cookie value. Accepts plain JSON written by older clients.
#[must_use]
pub fn decode_session(raw: &str) -> Option<Session> {
    let json = match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => {
            let bytes = URL_SAFE_NO_PAD
                .decode(encoded.trim_end_matches('='))
                .ok()?;
            String::from_utf8(bytes).ok()?
        }
        None => raw.to_owned(),
    };
    serde_json::from_str(&json).ok()
}

// =============================================================================
// CHUNKING
// =============================================================================

fn chunk_name(key: &str, index: usize) -> String {
    format!("{key}.{index}")
}

/// Split `value` into pieces of at most `size` bytes on char boundaries.
#[must_use]
pub fn chunk_value(value: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = value;
    while rest.len() > size {
        let mut cut = size;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}

/// Read `key`, falling back to reassembling `<key>.0`, `<key>.1`, ….
#[must_use]
pub fn read_chunked(store: &dyn CookieStore, key: &str) -> Option<String> {
    if let Some(value) = store.get(key) {
        return Some(value);
    }

    let mut value = String::new();
    let mut index = 0;
    while let Some(chunk) = store.get(&chunk_name(key, index)) {
        value.push_str(&chunk);
        index += 1;
    }
    (index > 0).then_some(value)
}

/// Write `value` under `key`, chunking when needed and clearing leftovers of
/// the previous layout so reads see only the new value.
pub fn write_chunked(store: &dyn CookieStore, key: &str, value: &str, options: &CookieOptions) {
    let chunks = chunk_value(value, MAX_CHUNK_SIZE);
    if chunks.len() == 1 {
        store.set(key, value, options);
        remove_chunks_from(store, key, 0, options);
        return;
    }

    for (index, chunk) in chunks.iter().enumerate() {
        store.set(&chunk_name(key, index), chunk, options);
    }
    if store.get(key).is_some() {
        store.remove(key, options);
    }
    remove_chunks_from(store, key, chunks.len(), options);
}

/// Remove `key` and all of its chunks.
pub fn remove_chunked(store: &dyn CookieStore, key: &str, options: &CookieOptions) {
    if store.get(key).is_some() {
        store.remove(key, options);
    }
    remove_chunks_from(store, key, 0, options);
}

fn remove_chunks_from(store: &dyn CookieStore, key: &str, start: usize, options: &CookieOptions) {
    let mut index = start;
    while store.get(&chunk_name(key, index)).is_some() {
        store.remove(&chunk_name(key, index), options);
        index += 1;
    }
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
