mod handlers;
mod state;
mod static_files;

pub use state::AppState;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Settings;
use crate::location::{CountriesNowClient, OpenCageClient};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/app.js", get(handlers::script))
        .route("/api/state", get(handlers::current_state))
        .route("/api/country", post(handlers::choose_country))
        .route("/api/city", post(handlers::choose_city))
        .route("/api/submit", post(handlers::submit))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(settings: &Settings, host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(
        Arc::new(CountriesNowClient::new(settings)),
        Arc::new(OpenCageClient::new(settings)),
    ));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mounting = Arc::clone(&state);
    tokio::task::spawn_blocking(move || mounting.mount());

    let app = build_router(state);

    eprintln!("  geoselect listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
