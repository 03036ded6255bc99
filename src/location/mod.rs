//! Location subsystem for geoselect.
//!
//! Provides the country directory, the geocoding provider, and the selector
//! state machine that sequences them.

pub mod directory;
pub mod providers;
pub mod selector;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use directory::{Directory, DirectoryCache};
pub use providers::{CountriesNowClient, DirectoryClient, GeocodeClient, OpenCageClient};
pub use selector::{GeocodeRequest, Phase, RequestToken, Selector, SelectorView, NOT_FOUND_MESSAGE};
pub use types::{Coordinates, Country, LookupError};
