use crate::location::{DirectoryCache, DirectoryClient, GeocodeClient, Selector};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct AppState {
    pub selector: Mutex<Selector>,
    pub directory_cache: DirectoryCache,
    pub directory_client: Arc<dyn DirectoryClient>,
    pub geocode_client: Arc<dyn GeocodeClient>,
}

impl AppState {
    pub fn new(
        directory_client: Arc<dyn DirectoryClient>,
        geocode_client: Arc<dyn GeocodeClient>,
    ) -> Self {
        Self {
            selector: Mutex::new(Selector::new()),
            directory_cache: DirectoryCache::new(),
            directory_client,
            geocode_client,
        }
    }

    /// Load the directory into the selector. Blocking.
    ///
    /// The fetch runs before the selector lock is taken, so requests keep
    /// being served (against an empty directory) while it is in flight.
    pub fn mount(&self) {
        self.directory_cache
            .get_or_load(self.directory_client.as_ref());
        self.selector()
            .mount(&self.directory_cache, self.directory_client.as_ref());
    }

    pub fn selector(&self) -> MutexGuard<'_, Selector> {
        self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
