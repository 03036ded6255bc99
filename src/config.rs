//! Runtime settings shared by the CLI and the web server.

pub const DEFAULT_DIRECTORY_URL: &str = "https://countriesnow.space/api/v0.1/countries/";
pub const DEFAULT_GEOCODE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Environment variable holding the geocoding credential.
pub const API_KEY_ENV: &str = "OPENCAGE_API_KEY";

#[derive(Debug, Clone)]
pub struct Settings {
    pub directory_url: String,
    pub geocode_url: String,
    /// OpenCage API key. Geocode calls fail without it.
    pub api_key: Option<String>,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            api_key: None,
            user_agent: format!("geoselect/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Set the API key, treating a blank value as absent.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        self
    }
}
