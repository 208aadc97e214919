//! Documentation of an internal survey collection service.
//!
//! Respondents submit their details, favourite foods and a few lifestyle
//! ratings. Anyone can then view the aggregate results.
//!
//!
//!
//! # Endpoints
//! - `GET /`: landing page
//! - `POST /api/submit`: validate and store one survey (JSON body)
//! - `GET /api/results`: summary over all stored surveys
//!
//! Errors come back as `{"error": "..."}` with status 400 for rejected input
//! and 500 for anything else.
//!
//! Cross-origin requests are allowed from any origin.
//!
//!
//!
//! # Storage
//!
//! Surveys live in a single Redis list, see [`database`]. Both handlers only
//! talk to the store through [`database::SurveyStore`], which is injected via
//! [`state::State`] so tests can swap in [`database::MemoryStore`].
//!
//!
//!
//! # Notes
//!
//! ## Ages
//! Age is the current calendar year minus the birth year. Submission parses
//! the full date strictly, aggregation only reads the first four characters
//! of whatever was stored.
//!
//! ## Averages
//! Rating averages and food percentages are taken over the total number of
//! surveys, not over the respondents who answered that item.
//!
//!
//!
//! # Setup
//!
//! Environment.
//! ```sh
//! RUST_PORT=5000
//! REDIS_URL=redis://127.0.0.1:6379
//! SURVEY_KEY=survey_db:surveys
//! RUST_LOG=info
//! ```
//!
//! Run.
//! ```sh
//! cargo run --bin survey
//! ```
//!
//! Seed a running server with generated surveys.
//! ```sh
//! cargo run --bin survey-tester -- --count 50
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod results;
pub mod routes;
pub mod state;
pub mod survey;
pub mod utils;

use routes::{index_handler, results_handler, submit_handler};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/api/submit", post(submit_handler))
        .route("/api/results", get(results_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::connect().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
