use serde::{Deserialize, Serialize};
use tracing::debug;

use super::index::GeoIndex;

/// The state/city/postal-code triple a single session is editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl LocationSelection {
    pub fn new(
        state: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            state: Some(state.into()),
            city: Some(city.into()),
            postal_code: Some(postal_code.into()),
        }
    }

    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_some() && self.city.is_some() && self.postal_code.is_some()
    }

    /// Owned copy of the triple when all three parts are set.
    pub fn resolved(&self) -> Option<ResolvedLocation> {
        match (&self.state, &self.city, &self.postal_code) {
            (Some(state), Some(city), Some(postal_code)) => Some(ResolvedLocation {
                state: state.clone(),
                city: city.clone(),
                postal_code: postal_code.clone(),
            }),
            _ => None,
        }
    }
}

/// A complete, index-consistent location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub state: String,
    pub city: String,
    pub postal_code: String,
}

/// User input that changes one part of the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationTrigger {
    PostalCode(String),
    State(String),
    City(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The selection is complete and consistent with the index.
    Resolved,
    /// The input could not be applied; the previous selection is kept.
    Unchanged,
    /// No consistent triple exists for the input (unknown state, empty index).
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub selection: LocationSelection,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    fn settled(selection: LocationSelection) -> Self {
        let outcome = if selection.is_complete() {
            ResolutionOutcome::Resolved
        } else {
            ResolutionOutcome::Unresolved
        };
        Self { selection, outcome }
    }

    fn unchanged(current: &LocationSelection) -> Self {
        Self {
            selection: current.clone(),
            outcome: ResolutionOutcome::Unchanged,
        }
    }

    fn unresolved(selection: LocationSelection) -> Self {
        Self {
            selection,
            outcome: ResolutionOutcome::Unresolved,
        }
    }
}

/// Preferred starting triple for new sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDefaults {
    pub state: String,
    pub city: String,
    pub postal_code: String,
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            state: "Bayern".to_string(),
            city: "München".to_string(),
            postal_code: "80331".to_string(),
        }
    }
}

/// Keeps a [`LocationSelection`] consistent with a [`GeoIndex`].
///
/// Whenever a part of the triple is invalid for its new context, the first entry of
/// the sorted candidate list replaces it.
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    index: &'a GeoIndex,
}

impl<'a> LocationResolver<'a> {
    pub fn new(index: &'a GeoIndex) -> Self {
        Self { index }
    }

    /// Starting selection: the defaults where the index knows them, the first entries otherwise.
    pub fn initial_selection(&self, defaults: &LocationDefaults) -> Resolution {
        let state = if self.index.contains_state(&defaults.state) {
            defaults.state.as_str()
        } else {
            match self.index.first_state() {
                Some(state) => state,
                None => return Resolution::unresolved(LocationSelection::unresolved()),
            }
        };

        let seed = LocationSelection {
            state: None,
            city: Some(defaults.city.clone()),
            postal_code: Some(defaults.postal_code.clone()),
        };
        self.on_state(&seed, state)
    }

    pub fn apply(&self, current: &LocationSelection, trigger: &LocationTrigger) -> Resolution {
        let resolution = match trigger {
            LocationTrigger::PostalCode(code) => self.on_postal_code(current, code),
            LocationTrigger::State(state) => self.on_state(current, state),
            LocationTrigger::City(city) => self.on_city(current, city),
        };
        debug!(?trigger, outcome = ?resolution.outcome, "location selection updated");
        resolution
    }

    /// A known postal code replaces the whole triple; an unknown one changes nothing.
    pub fn on_postal_code(&self, current: &LocationSelection, typed: &str) -> Resolution {
        if self.index.is_empty() {
            return Resolution::unresolved(current.clone());
        }

        let typed = typed.trim();
        match self.index.lookup_by_postal_code(typed) {
            Some(location) => Resolution::settled(LocationSelection::new(
                location.state.clone(),
                location.city.clone(),
                typed,
            )),
            None => Resolution::unchanged(current),
        }
    }

    pub fn on_state(&self, current: &LocationSelection, state: &str) -> Resolution {
        if !self.index.contains_state(state) {
            return Resolution::unresolved(LocationSelection::unresolved());
        }

        let city = current
            .city
            .as_deref()
            .filter(|city| self.index.contains_city(state, city))
            .or_else(|| self.index.first_city(state));

        let postal_code =
            city.and_then(|city| self.derive_postal_code(state, city, current.postal_code.as_deref()));

        Resolution::settled(LocationSelection {
            state: Some(state.to_string()),
            city: city.map(str::to_string),
            postal_code,
        })
    }

    /// Changes the city within the current state; cities of other states are ignored.
    pub fn on_city(&self, current: &LocationSelection, city: &str) -> Resolution {
        let state = match current.state.as_deref() {
            Some(state) if self.index.contains_state(state) => state,
            _ => return Resolution::unresolved(current.clone()),
        };

        if !self.index.contains_city(state, city) {
            return Resolution::unchanged(current);
        }

        let postal_code = self.derive_postal_code(state, city, current.postal_code.as_deref());
        Resolution::settled(LocationSelection {
            state: Some(state.to_string()),
            city: Some(city.to_string()),
            postal_code,
        })
    }

    /// Brings an arbitrary selection into a consistent shape. Consistent input is returned as is.
    pub fn reconcile(&self, current: &LocationSelection) -> Resolution {
        match (&current.state, &current.postal_code) {
            (Some(state), _) => self.on_state(current, state),
            (None, Some(code)) => match self.on_postal_code(current, code) {
                resolution if resolution.outcome == ResolutionOutcome::Resolved => resolution,
                _ => Resolution::unresolved(current.clone()),
            },
            (None, None) => Resolution::unresolved(current.clone()),
        }
    }

    /// Cities eligible for the selection's state.
    pub fn cities(&self, selection: &LocationSelection) -> Vec<&'a str> {
        selection
            .state
            .as_deref()
            .map(|state| self.index.cities_of(state))
            .unwrap_or_default()
    }

    /// Postal codes eligible for the selection's state and city.
    pub fn postal_codes(&self, selection: &LocationSelection) -> Vec<&'a str> {
        match (selection.state.as_deref(), selection.city.as_deref()) {
            (Some(state), Some(city)) => self.index.postal_codes_of(state, city),
            _ => Vec::new(),
        }
    }

    fn derive_postal_code(&self, state: &str, city: &str, existing: Option<&str>) -> Option<String> {
        existing
            .filter(|code| self.index.contains_postal_code(state, city, code))
            .or_else(|| self.index.first_postal_code(state, city))
            .map(str::to_string)
    }
}
