//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into the request hook via the `State` extractor.
//! It holds only what every request needs and nothing mutable: the validated
//! provider configuration and the provider API handle. Everything
//! request-scoped lives in `context::RequestContext`.

use std::sync::Arc;

use crate::config::SupabaseConfig;
use crate::supabase::AuthApi;

/// Shared application state. Clone is required by Axum; all inner fields are
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SupabaseConfig>,
    pub auth: Arc<dyn AuthApi>,
}

impl AppState {
    #[must_use]
    pub fn new(config: SupabaseConfig, auth: Arc<dyn AuthApi>) -> Self {
        Self { config: Arc::new(config), auth }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
