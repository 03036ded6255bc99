//! Location providers: the CountriesNow directory and the OpenCage geocoder.

use super::types::{Coordinates, Country, LookupError};
use crate::config::Settings;
use serde::Deserialize;
use std::io::Read;

/// Source of the country/city directory.
pub trait DirectoryClient: Send + Sync {
    fn fetch_directory(&self) -> Result<Vec<Country>, LookupError>;
}

/// Resolves a (city, country name) pair to a single coordinate pair.
pub trait GeocodeClient: Send + Sync {
    fn geocode(&self, city: &str, country: &str) -> Result<Coordinates, LookupError>;
}

fn build_agent(settings: &Settings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(&settings.user_agent)
        .build()
}

fn transport_error(e: ureq::Error) -> LookupError {
    match e {
        ureq::Error::Status(code @ (401 | 403), _) => LookupError::Unauthorized(code),
        ureq::Error::Status(code, _) => LookupError::Network(format!("HTTP {}", code)),
        ureq::Error::Transport(t) => LookupError::Network(t.to_string()),
    }
}

// ─── CountriesNow directory ─────────────────────────────────────

#[derive(Deserialize)]
struct DirectoryEnvelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    msg: String,
    data: Option<Vec<Country>>,
}

/// Decode a CountriesNow `/countries` body.
pub fn decode_directory<R: Read>(body: R) -> Result<Vec<Country>, LookupError> {
    let envelope: DirectoryEnvelope =
        serde_json::from_reader(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    if envelope.error {
        return Err(LookupError::Decode(format!(
            "directory provider reported an error: {}",
            envelope.msg
        )));
    }

    envelope
        .data
        .ok_or_else(|| LookupError::Decode("no data field".into()))
}

pub struct CountriesNowClient {
    agent: ureq::Agent,
    url: String,
}

impl CountriesNowClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            agent: build_agent(settings),
            url: settings.directory_url.clone(),
        }
    }
}

impl DirectoryClient for CountriesNowClient {
    fn fetch_directory(&self) -> Result<Vec<Country>, LookupError> {
        log::debug!("Fetching country directory from {}", self.url);

        let response = self.agent.get(&self.url).call().map_err(transport_error)?;
        let countries = decode_directory(response.into_reader())?;

        log::info!("Loaded {} countries", countries.len());
        Ok(countries)
    }
}

// ─── OpenCage geocoder ──────────────────────────────────────────

#[derive(Deserialize)]
struct GeocodeEnvelope {
    results: Vec<GeocodeCandidate>,
}

#[derive(Deserialize)]
struct GeocodeCandidate {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// The `q` parameter sent to the geocoder.
pub fn geocode_query(city: &str, country: &str) -> String {
    format!("{},{}", city, country)
}

/// Decode an OpenCage body, taking the first candidate as-is.
pub fn decode_geocode<R: Read>(body: R, query: &str) -> Result<Coordinates, LookupError> {
    let envelope: GeocodeEnvelope =
        serde_json::from_reader(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    envelope
        .results
        .into_iter()
        .next()
        .map(|c| Coordinates::new(c.geometry.lat, c.geometry.lng))
        .ok_or_else(|| LookupError::NotFound(query.to_string()))
}

pub struct OpenCageClient {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl OpenCageClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            agent: build_agent(settings),
            url: settings.geocode_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }
}

impl GeocodeClient for OpenCageClient {
    fn geocode(&self, city: &str, country: &str) -> Result<Coordinates, LookupError> {
        let key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        let query = geocode_query(city, country);

        log::debug!("Geocoding '{}'", query);

        let response = self
            .agent
            .get(&self.url)
            .query("q", &query)
            .query("key", key)
            .call()
            .map_err(transport_error)?;

        decode_geocode(response.into_reader(), &query)
    }
}
