use std::sync::Arc;

use tasktrack::config::SupabaseConfig;
use tasktrack::supabase::gotrue::GoTrueClient;
use tasktrack::{routes, state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SupabaseConfig::from_env().expect("supabase configuration invalid");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let auth = GoTrueClient::new(&config).expect("auth http client init failed");
    tracing::info!(auth_url = %config.auth_url(), secure_cookies = config.cookie_secure, "auth client initialized");

    let state = state::AppState::new(config, Arc::new(auth));
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "tasktrack listening");
    axum::serve(listener, app).await.expect("server failed");
}
