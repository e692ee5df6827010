//! Documentation of the missing persons registry relay.
//!
//! The browser never talks to the government registry directly. It talks to this relay,
//! which owns the CORS policy, reshapes the tip form and forwards everything else as is.
//!
//!
//!
//! # General Infrastructure
//! - Browser hits the relay under `/api`
//! - Relay forwards to `API_BASE_URL`, one upstream call per inbound request
//! - Upstream responses for search and detail go back byte for byte
//! - No database, no cache, no retries
//!
//!
//!
//! # Routes
//!
//! | Route | Notes |
//! |---|---|
//! | `GET /api/pessoas/aberto/filtro` | query string forwarded untouched |
//! | `GET /api/pessoas/{id}` | numeric id |
//! | `POST /api/informacoes` | multipart, see [`tip`] |
//! | `GET /api/health` | never touches the upstream |
//!
//! Anything else answers 404 with the requested path echoed back.
//!
//!
//!
//! # Errors
//! - Form problems are rejected with 400 before the upstream is contacted
//! - Any upstream failure (network, timeout, non-2xx) becomes a 500 carrying the
//!   transport error text as `message`
//!
//!
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `API_BASE_URL` | required |
//! | `PORT` | `3001` |
//! | `CORS_ORIGINS` | local dev servers, comma separated |
//! | `API_TIMEOUT_MS` | `10000` |
//! | `RUST_LOG` | unset |
//!
//! A `.env` file in the working directory is honored.
//!
//!
//!
//! # Setup
//!
//! Run the relay.
//! ```sh
//! API_BASE_URL=https://registry.example/v1 RUST_LOG=info cargo run -p desaparecidos
//! ```
//!
//! Check it is alive.
//! ```sh
//! curl localhost:3001/api/health
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod tip;
pub mod upstream;

use config::Config;
use routes::{fallback_handler, filter_handler, health_handler, person_handler, tip_handler};
use state::RelayState;
use tip::MAX_PHOTO_BYTES;

/// Leaves room for an oversized photo to reach the per-file check instead of being cut by the body limit.
const BODY_LIMIT: usize = 2 * MAX_PHOTO_BYTES;

pub async fn start_server() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = RelayState::new(config)?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");
    info!("Forwarding to {}", state.config.api_base_url);

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<RelayState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/pessoas/aberto/filtro", get(filter_handler))
        .route("/api/pessoas/{id}", get(person_handler))
        .route("/api/informacoes", post(tip_handler))
        .route("/api/health", get(health_handler))
        .fallback(fallback_handler)
        .method_not_allowed_fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|e| warn!("Skipping invalid CORS origin {origin}: {e}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            return std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
