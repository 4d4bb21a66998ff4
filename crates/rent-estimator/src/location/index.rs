use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum GeoIndexError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for GeoIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoIndexError::Io(err) => write!(f, "geo data unavailable: failed to read: {}", err),
            GeoIndexError::Json(err) => {
                write!(f, "geo data unavailable: invalid geo JSON document: {}", err)
            }
        }
    }
}

impl std::error::Error for GeoIndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoIndexError::Io(err) => Some(err),
            GeoIndexError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for GeoIndexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for GeoIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// City and state owning a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostalCodeLocation {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPostalCode {
    Text(String),
    Number(u64),
}

impl RawPostalCode {
    fn into_text(self) -> String {
        match self {
            RawPostalCode::Text(value) => value.trim().to_string(),
            RawPostalCode::Number(value) => value.to_string(),
        }
    }
}

type RawGeoDocument = BTreeMap<String, BTreeMap<String, Vec<RawPostalCode>>>;

/// Immutable state → city → postal code hierarchy with a postal code reverse index.
///
/// All listings are sorted lexicographically on the display string, so `"01067"`
/// sorts before `"10115"` and `"9"` after `"80331"`.
#[derive(Debug, Clone, Default)]
pub struct GeoIndex {
    forward: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    reverse: HashMap<String, PostalCodeLocation>,
}

impl GeoIndex {
    /// Index with no states, used when the geo data cannot be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GeoIndexError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeoIndexError> {
        let document: RawGeoDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(document))
    }

    pub fn from_json_str(source: &str) -> Result<Self, GeoIndexError> {
        let document: RawGeoDocument = serde_json::from_str(source)?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: RawGeoDocument) -> Self {
        let mut forward = BTreeMap::new();
        let mut reverse = HashMap::new();
        let mut reassigned = 0usize;

        for (state, cities) in document {
            let mut city_map = BTreeMap::new();
            for (city, raw_codes) in cities {
                let codes: BTreeSet<String> = raw_codes
                    .into_iter()
                    .map(RawPostalCode::into_text)
                    .filter(|code| !code.is_empty())
                    .collect();

                for code in &codes {
                    let location = PostalCodeLocation {
                        city: city.clone(),
                        state: state.clone(),
                    };
                    // Last write wins when a code is listed under several cities.
                    if let Some(previous) = reverse.insert(code.clone(), location) {
                        if previous.city != city || previous.state != state {
                            reassigned += 1;
                        }
                    }
                }

                city_map.insert(city, codes);
            }
            forward.insert(state, city_map);
        }

        if reassigned > 0 {
            debug!(
                reassigned,
                "postal codes listed under more than one city; keeping the last listing"
            );
        }

        Self { forward, reverse }
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn state_count(&self) -> usize {
        self.forward.len()
    }

    pub fn postal_code_count(&self) -> usize {
        self.reverse.len()
    }

    pub fn states_ordered(&self) -> Vec<&str> {
        self.forward.keys().map(String::as_str).collect()
    }

    /// Sorted cities of `state`; empty when the state is unknown.
    pub fn cities_of(&self, state: &str) -> Vec<&str> {
        self.forward
            .get(state)
            .map(|cities| cities.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Sorted postal codes of `city` in `state`; empty when either is unknown.
    pub fn postal_codes_of(&self, state: &str, city: &str) -> Vec<&str> {
        self.codes(state, city)
            .map(|codes| codes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn lookup_by_postal_code(&self, code: &str) -> Option<&PostalCodeLocation> {
        self.reverse.get(code.trim())
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.forward.contains_key(state)
    }

    pub fn contains_city(&self, state: &str, city: &str) -> bool {
        self.forward
            .get(state)
            .is_some_and(|cities| cities.contains_key(city))
    }

    pub fn contains_postal_code(&self, state: &str, city: &str, code: &str) -> bool {
        self.codes(state, city)
            .is_some_and(|codes| codes.contains(code))
    }

    pub(crate) fn first_state(&self) -> Option<&str> {
        self.forward.keys().next().map(String::as_str)
    }

    pub(crate) fn first_city(&self, state: &str) -> Option<&str> {
        self.forward
            .get(state)
            .and_then(|cities| cities.keys().next())
            .map(String::as_str)
    }

    pub(crate) fn first_postal_code(&self, state: &str, city: &str) -> Option<&str> {
        self.codes(state, city)
            .and_then(|codes| codes.iter().next())
            .map(String::as_str)
    }

    fn codes(&self, state: &str, city: &str) -> Option<&BTreeSet<String>> {
        self.forward.get(state).and_then(|cities| cities.get(city))
    }
}
