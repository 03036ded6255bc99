use axum::body::{to_bytes, Body};
use axum::extract::Query;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use geoselect::config::Settings;
use geoselect::location::{
    CountriesNowClient, Coordinates, DirectoryClient, GeocodeClient, LookupError, OpenCageClient,
};
use geoselect::server::{build_router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

async fn geocode_stub(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if params.get("key").map(String::as_str) != Some("test-key") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    match params.get("q").map(String::as_str) {
        Some("New York,United States") => Ok(Json(json!({
            "results": [{"geometry": {"lat": 40.7128, "lng": -74.0060}}]
        }))),
        _ => Ok(Json(json!({"results": []}))),
    }
}

/// Serve stand-ins for both providers on an ephemeral port.
async fn spawn_stub() -> String {
    let app = Router::new()
        .route(
            "/countries",
            get(|| async {
                Json(json!({
                    "error": false,
                    "msg": "countries and cities retrieved",
                    "data": [
                        {"iso2": "US", "iso3": "USA", "country": "United States",
                         "cities": ["New York", "Los Angeles"]},
                        {"iso2": "AL", "iso3": "ALB", "country": "Albania", "cities": ["Tirana"]},
                        {"iso2": "AX", "iso3": "ALA", "country": "Åland", "cities": ["Mariehamn"]}
                    ]
                }))
            }),
        )
        .route("/broken", get(|| async { "<html>maintenance</html>" }))
        .route("/geocode", get(geocode_stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn settings(base: &str, key: Option<&str>) -> Settings {
    Settings {
        directory_url: format!("{}/countries", base),
        geocode_url: format!("{}/geocode", base),
        ..Settings::default()
    }
    .with_api_key(key.map(str::to_string))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_client_fetches_countries() {
    let base = spawn_stub().await;
    let client = CountriesNowClient::new(&settings(&base, None));

    let countries = tokio::task::spawn_blocking(move || client.fetch_directory())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(countries.len(), 3);
    assert_eq!(countries[0].iso_code, "US");
    assert_eq!(countries[0].cities, vec!["New York", "Los Angeles"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_client_decode_error() {
    let base = spawn_stub().await;
    let s = Settings {
        directory_url: format!("{}/broken", base),
        ..Settings::default()
    };
    let client = CountriesNowClient::new(&s);

    let err = tokio::task::spawn_blocking(move || client.fetch_directory())
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, LookupError::Decode(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_client_http_error() {
    let base = spawn_stub().await;
    let s = Settings {
        directory_url: format!("{}/missing", base),
        ..Settings::default()
    };
    let client = CountriesNowClient::new(&s);

    let err = tokio::task::spawn_blocking(move || client.fetch_directory())
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, LookupError::Network(ref m) if m == "HTTP 404"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_client_sends_query_and_key() {
    let base = spawn_stub().await;
    let client = OpenCageClient::new(&settings(&base, Some("test-key")));

    let (found, missing) = tokio::task::spawn_blocking(move || {
        (
            client.geocode("New York", "United States"),
            client.geocode("Nonexistent City", "United States"),
        )
    })
    .await
    .unwrap();

    assert_eq!(found.unwrap(), Coordinates::new(40.7128, -74.006));
    assert!(matches!(missing, Err(LookupError::NotFound(ref q)) if q == "Nonexistent City,United States"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_client_rejected_key() {
    let base = spawn_stub().await;
    let client = OpenCageClient::new(&settings(&base, Some("wrong-key")));

    let err = tokio::task::spawn_blocking(move || client.geocode("New York", "United States"))
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, LookupError::Unauthorized(401)));
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_form_flow_against_providers() {
    let base = spawn_stub().await;
    let s = settings(&base, Some("test-key"));
    let state = Arc::new(AppState::new(
        Arc::new(CountriesNowClient::new(&s)),
        Arc::new(OpenCageClient::new(&s)),
    ));
    let mounting = Arc::clone(&state);
    tokio::task::spawn_blocking(move || mounting.mount()).await.unwrap();
    let app = build_router(state);

    let view = post(&app, "/api/country", json!({"iso_code": "US"})).await;
    let names: Vec<&str> = view["countries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Åland", "Albania", "United States"]);

    post(&app, "/api/city", json!({"city": "Nonexistent City"})).await;
    let view = post(&app, "/api/submit", json!({})).await;
    assert_eq!(view["status"], "Location not found");

    post(&app, "/api/city", json!({"city": "New York"})).await;
    let view = post(&app, "/api/submit", json!({})).await;
    assert_eq!(view["status"], "Latitude: 40.7128, Longitude: -74.006");
}
