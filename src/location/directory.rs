//! The country directory and its fetch-once holder.
//!
//! Storage order is the provider's response order and is never mutated.
//! Display order is computed on demand by [`Directory::sorted`].

use super::providers::DirectoryClient;
use super::types::Country;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    countries: Vec<Country>,
}

impl Directory {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Countries in storage order.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// First country carrying `iso_code`. The empty sentinel never matches.
    pub fn find(&self, iso_code: &str) -> Option<&Country> {
        if iso_code.is_empty() {
            return None;
        }
        self.countries.iter().find(|c| c.iso_code == iso_code)
    }

    /// Countries ordered by name for display.
    pub fn sorted(&self) -> Vec<&Country> {
        let mut view: Vec<&Country> = self.countries.iter().collect();
        view.sort_by(|a, b| compare_names(&a.name, &b.name));
        view
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Fold a name to lowercase ASCII so "Åland" collates next to "Aland".
fn collation_key(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase()
}

/// Locale-aware name comparison: folded key first, raw name as tie-break.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Owned fetch-once holder for the directory.
///
/// The first `get_or_load` call hits the client. Its outcome, success or
/// failure, is kept for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    cell: OnceCell<Option<Arc<Directory>>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated cache (skips the network entirely).
    pub fn with_directory(directory: Directory) -> Self {
        Self {
            cell: OnceCell::with_value(Some(Arc::new(directory))),
        }
    }

    /// The loaded directory, or `None` if the one load attempt failed.
    pub fn get_or_load(&self, client: &dyn DirectoryClient) -> Option<Arc<Directory>> {
        self.cell
            .get_or_init(|| match client.fetch_directory() {
                Ok(countries) => Some(Arc::new(Directory::new(countries))),
                Err(e) => {
                    log::error!("Failed to load country directory: {}", e);
                    None
                }
            })
            .clone()
    }

    /// Whether a load has been attempted.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
