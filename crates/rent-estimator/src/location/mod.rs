//! State / city / postal code hierarchy and the rules keeping a selection consistent.

mod index;
mod resolver;
pub mod router;

use std::path::Path;
use tracing::{info, warn};

pub use index::{GeoIndex, GeoIndexError, PostalCodeLocation};
pub use resolver::{
    LocationDefaults, LocationResolver, LocationSelection, LocationTrigger, Resolution,
    ResolutionOutcome, ResolvedLocation,
};
pub use router::location_router;

/// Process-wide geo data: the loaded index, or an empty one plus the reason loading failed.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    index: GeoIndex,
    defaults: LocationDefaults,
    unavailable: Option<String>,
}

impl LocationCatalog {
    pub fn new(index: GeoIndex, defaults: LocationDefaults) -> Self {
        Self {
            index,
            defaults,
            unavailable: None,
        }
    }

    /// Loads the geo data file, degrading to an empty index when it cannot be read.
    pub fn load<P: AsRef<Path>>(path: P, defaults: LocationDefaults) -> Self {
        let path = path.as_ref();
        match GeoIndex::from_path(path) {
            Ok(index) => {
                info!(
                    path = %path.display(),
                    states = index.state_count(),
                    postal_codes = index.postal_code_count(),
                    "geo data loaded"
                );
                Self::new(index, defaults)
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "geo data unavailable; location features disabled"
                );
                Self::unavailable(err, defaults)
            }
        }
    }

    pub fn unavailable(error: GeoIndexError, defaults: LocationDefaults) -> Self {
        Self {
            index: GeoIndex::empty(),
            defaults,
            unavailable: Some(error.to_string()),
        }
    }

    pub fn index(&self) -> &GeoIndex {
        &self.index
    }

    pub fn resolver(&self) -> LocationResolver<'_> {
        LocationResolver::new(&self.index)
    }

    pub fn initial_selection(&self) -> Resolution {
        self.resolver().initial_selection(&self.defaults)
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_degrades_to_empty_catalog() {
        let catalog = LocationCatalog::load("./no-such-geo-data.json", LocationDefaults::default());

        assert!(!catalog.is_available());
        assert!(catalog.index().is_empty());
        assert!(catalog
            .unavailable_reason()
            .expect("reason recorded")
            .contains("geo data unavailable"));
        assert_eq!(
            catalog.initial_selection().outcome,
            ResolutionOutcome::Unresolved
        );
    }

    #[test]
    fn loaded_catalog_starts_at_defaults() {
        let index = GeoIndex::from_json_str(r#"{"Bayern": {"München": ["80331", "80333"]}}"#)
            .expect("parses");
        let catalog = LocationCatalog::new(index, LocationDefaults::default());

        assert!(catalog.is_available());
        let initial = catalog.initial_selection();
        assert_eq!(initial.outcome, ResolutionOutcome::Resolved);
        assert_eq!(
            initial.selection,
            LocationSelection::new("Bayern", "München", "80331")
        );
    }
}
