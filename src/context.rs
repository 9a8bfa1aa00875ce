//! Per-request context built by the request hook.
//!
//! The hook inserts a [`RequestContext`] into the request extensions; route
//! handlers take it as an extractor. A context is never shared between
//! requests.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

use crate::supabase::{AuthClient, Session, User};

/// Outcome of session resolution. `Present` always carries both the session
/// and the user derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Present { user: User, session: Session },
    Absent,
}

impl SessionResult {
    #[must_use]
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => Self::Present { user: session.user.clone(), session },
            None => Self::Absent,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Present { session, .. } => Some(session),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Present { user, .. } => Some(user),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Request-scoped auth state: the cookie-bound client and the resolved session.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub client: Arc<AuthClient>,
    pub session: SessionResult,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "request context missing"))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
