//! Selector state machine: country → city → geocode.
//!
//! Flow:  mount (fetch directory once) → choose_country → choose_city → submit
//!
//! Submissions are split in two halves so the geocode call can run without
//! holding the selector. Each submission gets a fresh [`RequestToken`] and only
//! the reply carrying the latest token is applied.

use super::directory::{Directory, DirectoryCache};
use super::providers::{DirectoryClient, GeocodeClient};
use super::types::{Coordinates, LookupError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The single user-visible failure message.
pub const NOT_FOUND_MESSAGE: &str = "Location not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Ready,
    CountryChosen,
    CityChosen,
    Resolved,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Ready => write!(f, "Ready"),
            Self::CountryChosen => write!(f, "Country chosen"),
            Self::CityChosen => write!(f, "City chosen"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Everything needed to run one geocode call outside the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRequest {
    pub token: RequestToken,
    pub city: String,
    pub country_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    Resolved(Coordinates),
    Failed,
}

#[derive(Debug)]
pub struct Selector {
    directory: Arc<Directory>,
    mounted: bool,
    loaded: bool,
    phase: Phase,
    selected_iso_code: String,
    selected_city: String,
    visible_cities: Vec<String>,
    outcome: Option<Outcome>,
    last_token: u64,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector {
    /// A selector with no directory yet.
    pub fn new() -> Self {
        Self {
            directory: Arc::new(Directory::default()),
            mounted: false,
            loaded: false,
            phase: Phase::Idle,
            selected_iso_code: String::new(),
            selected_city: String::new(),
            visible_cities: Vec::new(),
            outcome: None,
            last_token: 0,
        }
    }

    /// A selector over an already loaded directory.
    pub fn with_directory(directory: Arc<Directory>) -> Self {
        Self {
            directory,
            mounted: true,
            loaded: true,
            phase: Phase::Ready,
            ..Self::new()
        }
    }

    /// Load the directory through `cache`. Only the first call has any effect.
    pub fn mount(&mut self, cache: &DirectoryCache, client: &dyn DirectoryClient) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match cache.get_or_load(client) {
            Some(directory) => {
                log::debug!("Selector ready with {} countries", directory.len());
                self.directory = directory;
                self.loaded = true;
                self.phase = Phase::Ready;
            }
            None => {
                log::warn!("Country directory unavailable; selector stays empty for this session");
            }
        }
    }

    pub fn choose_country(&mut self, iso_code: &str) {
        self.selected_iso_code = iso_code.to_string();
        self.selected_city.clear();

        match self.directory.find(iso_code) {
            Some(country) => {
                self.visible_cities = country.cities.clone();
                self.phase = Phase::CountryChosen;
            }
            None => {
                self.visible_cities.clear();
                self.phase = self.base_phase();
            }
        }
    }

    /// Record the city as given. Membership in the visible list is not checked.
    pub fn choose_city(&mut self, city: &str) {
        self.selected_city = city.to_string();

        self.phase = if self.selected_country_known() {
            if city.is_empty() {
                Phase::CountryChosen
            } else {
                Phase::CityChosen
            }
        } else {
            self.base_phase()
        };
    }

    pub fn can_submit(&self) -> bool {
        self.selected_country_known() && !self.selected_city.is_empty()
    }

    pub fn city_selector_enabled(&self) -> bool {
        self.selected_country_known()
    }

    /// Start a submission. Returns `None` while submit is disabled.
    pub fn begin_submit(&mut self) -> Option<GeocodeRequest> {
        if !self.can_submit() {
            return None;
        }
        let country_name = self.directory.find(&self.selected_iso_code)?.name.clone();

        self.outcome = None;
        self.phase = Phase::CityChosen;
        self.last_token += 1;

        Some(GeocodeRequest {
            token: RequestToken(self.last_token),
            city: self.selected_city.clone(),
            country_name,
        })
    }

    /// Apply a geocode reply. Returns `false` when the reply is stale and was dropped.
    pub fn complete_submit(
        &mut self,
        token: RequestToken,
        result: Result<Coordinates, LookupError>,
    ) -> bool {
        if token.0 != self.last_token {
            log::debug!(
                "Dropping stale geocode reply #{} (latest is #{})",
                token.0,
                self.last_token
            );
            return false;
        }

        match result {
            Ok(coords) => {
                log::info!("Resolved {}", coords);
                self.outcome = Some(Outcome::Resolved(coords));
                self.phase = Phase::Resolved;
            }
            Err(e) => {
                log::warn!("Geocode failed: {}", e);
                self.outcome = Some(Outcome::Failed);
                self.phase = Phase::Failed;
            }
        }
        true
    }

    /// Run a full submission synchronously. Returns `false` if submit is disabled.
    pub fn submit(&mut self, client: &dyn GeocodeClient) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let result = client.geocode(&request.city, &request.country_name);
        self.complete_submit(request.token, result)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn selected_iso_code(&self) -> &str {
        &self.selected_iso_code
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    pub fn visible_cities(&self) -> &[String] {
        &self.visible_cities
    }

    pub fn location(&self) -> Option<Coordinates> {
        match self.outcome {
            Some(Outcome::Resolved(coords)) => Some(coords),
            _ => None,
        }
    }

    /// The results line: coordinates, the failure message, or nothing.
    pub fn status_line(&self) -> Option<String> {
        match self.outcome? {
            Outcome::Resolved(coords) => Some(coords.to_string()),
            Outcome::Failed => Some(NOT_FOUND_MESSAGE.to_string()),
        }
    }

    pub fn view(&self) -> SelectorView {
        SelectorView {
            phase: self.phase,
            countries: self
                .directory
                .sorted()
                .into_iter()
                .map(|c| CountryOption {
                    iso_code: c.iso_code.clone(),
                    name: c.name.clone(),
                })
                .collect(),
            cities: self.visible_cities.clone(),
            selected_iso_code: self.selected_iso_code.clone(),
            selected_city: self.selected_city.clone(),
            city_selector_enabled: self.city_selector_enabled(),
            can_submit: self.can_submit(),
            location: self.location(),
            status: self.status_line(),
        }
    }

    fn selected_country_known(&self) -> bool {
        self.directory.find(&self.selected_iso_code).is_some()
    }

    fn base_phase(&self) -> Phase {
        if self.loaded {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}

/// One entry of the country dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryOption {
    pub iso_code: String,
    pub name: String,
}

/// Serializable snapshot of the selector for front ends.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorView {
    pub phase: Phase,
    pub countries: Vec<CountryOption>,
    pub cities: Vec<String>,
    pub selected_iso_code: String,
    pub selected_city: String,
    pub city_selector_enabled: bool,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
