use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{LookupError, SelectorView};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── GET /api/state ──────────────────────────────────────────────

pub async fn current_state(State(state): State<Arc<AppState>>) -> Json<SelectorView> {
    Json(state.selector().view())
}

// ─── POST /api/country ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CountryChoice {
    #[serde(default)]
    pub iso_code: String,
}

pub async fn choose_country(
    State(state): State<Arc<AppState>>,
    Json(choice): Json<CountryChoice>,
) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.choose_country(&choice.iso_code);
    log::debug!(
        "POST /api/country iso={:?} -> {} cities",
        choice.iso_code,
        selector.visible_cities().len()
    );
    Json(selector.view())
}

// ─── POST /api/city ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CityChoice {
    #[serde(default)]
    pub city: String,
}

pub async fn choose_city(
    State(state): State<Arc<AppState>>,
    Json(choice): Json<CityChoice>,
) -> Json<SelectorView> {
    let mut selector = state.selector();
    selector.choose_city(&choice.city);
    log::debug!("POST /api/city city={:?}", choice.city);
    Json(selector.view())
}

// ─── POST /api/submit ────────────────────────────────────────────

pub async fn submit(State(state): State<Arc<AppState>>) -> Result<Json<SelectorView>, ApiError> {
    let start = Instant::now();

    let request = state.selector().begin_submit().ok_or_else(|| {
        api_error(StatusCode::CONFLICT, "Select a country and a city before submitting")
    })?;

    let client = Arc::clone(&state.geocode_client);
    let (city, country) = (request.city.clone(), request.country_name.clone());
    let result = tokio::task::spawn_blocking(move || client.geocode(&city, &country))
        .await
        .unwrap_or_else(|e| Err(LookupError::Network(format!("geocode task failed: {}", e))));

    let mut selector = state.selector();
    let applied = selector.complete_submit(request.token, result);

    log::info!(
        "POST /api/submit q={},{} -> {}{} ({:.1}ms)",
        request.city,
        request.country_name,
        selector.phase(),
        if applied { "" } else { " (stale reply dropped)" },
        start.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(Json(selector.view()))
}
