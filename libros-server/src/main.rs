mod api;
mod config;
mod errors;
mod exchange;
mod gateway;
mod models;
mod openapi;
mod state;
mod store;
#[cfg(test)]
mod test_utils;
mod verifier;

use std::net::SocketAddr;
use std::process::exit;

use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;
use tokio::signal;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::config::AppConfig;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Builds the application router with all routes and API documentation.
pub fn create_app(state: AppState) -> Router {
    let (router, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi()).split_for_parts();

    router
        .merge(api::router(&state))
        .merge(Scalar::with_url("/scalar", api_doc))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::new() {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load configuration: {err}");
            exit(1);
        }
    };

    let port = config.port;
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize application state: {err}");
            exit(1);
        }
    };

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting server on {addr}");

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind to {addr}: {err}");
            exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {err}");
        exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
