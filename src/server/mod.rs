//! The stock-trading web application: router, shared state, and serve loop.

pub mod error;
pub mod handlers;
pub mod session;
pub mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{ensure, Result};
use axum::extract::FromRef;
use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::cookie::Key;
use rust_decimal::Decimal;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{QuoteClient, QuoteSource};
use crate::db::Database;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// SQLite database URL
    pub database_url: String,

    /// Quote provider API key
    pub api_key: String,

    /// Override the quote provider base URL (mainly for local stubs)
    pub quote_api_base: Option<String>,

    /// Secret for signing session cookies; a fresh key is generated when
    /// unset, which signs everyone out on restart
    pub session_secret: Option<String>,

    /// Cash balance granted to new accounts
    pub starting_cash: Decimal,
}

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub quotes: Arc<dyn QuoteSource>,
    pub key: Key,
    pub starting_cash: Decimal,
}

// Lets SignedCookieJar pull its signing key out of the app state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

/// Build and return the full router.
pub fn build_router(state: AppState) -> Router {
    use handlers::{auth, history, portfolio, quote, trade, transfer};

    Router::new()
        .route("/", get(portfolio::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/quote", get(quote::quote_page).post(quote::lookup))
        .route("/buy", get(trade::buy_page).post(trade::buy))
        .route("/sell", get(trade::sell_page).post(trade::sell))
        .route("/history", get(history::history))
        .route("/transfer", get(transfer::transfer_page).post(transfer::transfer))
        // Pages show live balances, so caching is disabled globally.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the signing key for session cookies.
fn cookie_key(secret: Option<&str>) -> Result<Key> {
    match secret {
        Some(secret) => {
            ensure!(
                secret.len() >= 32,
                "SESSION_SECRET must be at least 32 bytes"
            );
            Ok(Key::derive_from(secret.as_bytes()))
        }
        None => Ok(Key::generate()),
    }
}

/// Start the web server and run until shutdown.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let db = Database::new(&config.database_url).await?;

    let quotes: Arc<dyn QuoteSource> = Arc::new(match &config.quote_api_base {
        Some(base) => QuoteClient::with_base_url(base.clone(), config.api_key.clone())?,
        None => QuoteClient::new(config.api_key.clone())?,
    });

    let state = AppState {
        db,
        quotes,
        key: cookie_key(config.session_secret.as_deref())?,
        starting_cash: config.starting_cash,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Server running on http://{}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
