// File: services/bookly_backend/src/main.rs
mod app_state;

use app_state::AppState;
use axum::{routing::get, Router};
use bookly_booking::routes as booking_routes;
use bookly_common::logging;
use bookly_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Arc::new(load_config()?);
    logging::init_from_str(&config.logging.level);

    let state = AppState::new(config.clone()).await?;

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Bookly API!" }))
        .merge(booking_routes::routes(state.booking.clone()));

    let app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
