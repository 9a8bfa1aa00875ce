//! Root layout data: the session and user every rendered page sees.

use crate::context::{RequestContext, SessionResult};
use crate::supabase::{Session, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutData {
    pub session: Option<Session>,
    pub user: Option<User>,
}

impl LayoutData {
    #[must_use]
    pub fn from_session(session: &SessionResult) -> Self {
        Self { session: session.session().cloned(), user: session.user().cloned() }
    }
}

/// Read `{session, user}` from the request context. No validation, no side
/// effects.
#[must_use]
pub fn layout_data(ctx: &RequestContext) -> LayoutData {
    LayoutData::from_session(&ctx.session)
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
