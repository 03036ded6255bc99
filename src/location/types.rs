//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A country as delivered by the directory provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "country", default)]
    pub name: String,
    /// ISO 3166-1 alpha-2 code (e.g. "US"). Unique within a directory.
    #[serde(rename = "iso2", default)]
    pub iso_code: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl Country {
    pub fn new(name: &str, iso_code: &str, cities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            iso_code: iso_code.to_string(),
            cities: cities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A resolved coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Latitude: {}, Longitude: {}", self.latitude, self.longitude)
    }
}

/// Errors raised by the directory and geocode providers.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    Decode(String),
    #[error("Location not found: '{0}'")]
    NotFound(String),
    #[error("Geocoding provider rejected the API key (HTTP {0})")]
    Unauthorized(u16),
    #[error("No geocoding API key configured (set OPENCAGE_API_KEY)")]
    MissingApiKey,
}
