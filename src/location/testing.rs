//! In-memory provider doubles shared by unit tests.

use super::directory::Directory;
use super::providers::{geocode_query, DirectoryClient, GeocodeClient};
use super::types::{Coordinates, Country, LookupError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

pub(crate) fn us_directory() -> Directory {
    Directory::new(vec![
        Country::new("United States", "US", &["New York", "Los Angeles"]),
        Country::new("France", "FR", &["Paris", "Lyon", "Marseille"]),
        Country::new("Åland", "AX", &["Mariehamn"]),
    ])
}

pub(crate) struct StaticDirectory {
    countries: Vec<Country>,
    calls: AtomicUsize,
}

impl StaticDirectory {
    pub(crate) fn new(countries: Vec<Country>) -> Self {
        Self { countries, calls: AtomicUsize::new(0) }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DirectoryClient for StaticDirectory {
    fn fetch_directory(&self) -> Result<Vec<Country>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.countries.clone())
    }
}

#[derive(Default)]
pub(crate) struct FailingDirectory {
    calls: AtomicUsize,
}

impl FailingDirectory {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DirectoryClient for FailingDirectory {
    fn fetch_directory(&self) -> Result<Vec<Country>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LookupError::Network("connection refused".into()))
    }
}

/// Answers from a fixed table keyed by the `q` parameter; anything else is not found.
#[derive(Default)]
pub(crate) struct FakeGeocoder {
    known: HashMap<String, Coordinates>,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub(crate) fn with(mut self, city: &str, country: &str, lat: f64, lng: f64) -> Self {
        self.known.insert(geocode_query(city, country), Coordinates::new(lat, lng));
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl GeocodeClient for FakeGeocoder {
    fn geocode(&self, city: &str, country: &str) -> Result<Coordinates, LookupError> {
        let q = geocode_query(city, country);
        self.queries.lock().unwrap().push(q.clone());
        self.known.get(&q).copied().ok_or(LookupError::NotFound(q))
    }
}

pub(crate) struct BrokenGeocoder;

impl GeocodeClient for BrokenGeocoder {
    fn geocode(&self, _city: &str, _country: &str) -> Result<Coordinates, LookupError> {
        Err(LookupError::Unauthorized(401))
    }
}

/// Delegates to a [`FakeGeocoder`] but parks one query until the test releases it.
///
/// Signals on `entered` when the parked query arrives, then waits on `release`.
pub(crate) struct GatedGeocoder {
    inner: FakeGeocoder,
    gated: String,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl GatedGeocoder {
    /// Returns the geocoder, the "entered" receiver and the "release" sender.
    pub(crate) fn new(
        inner: FakeGeocoder,
        city: &str,
        country: &str,
    ) -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let geocoder = Self {
            inner,
            gated: geocode_query(city, country),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (geocoder, entered_rx, release_tx)
    }
}

impl GeocodeClient for GatedGeocoder {
    fn geocode(&self, city: &str, country: &str) -> Result<Coordinates, LookupError> {
        if geocode_query(city, country) == self.gated {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .unwrap();
        }
        self.inner.geocode(city, country)
    }
}
