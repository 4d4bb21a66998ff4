use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::normalizer::normalize_label;

/// Categorical attributes the price model expects as canonical codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Heating,
    Condition,
    InteriorQuality,
    FlatType,
}

impl FeatureCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Heating,
            Self::Condition,
            Self::InteriorQuality,
            Self::FlatType,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Condition => "condition",
            Self::InteriorQuality => "interior_quality",
            Self::FlatType => "flat_type",
        }
    }

    /// German form caption.
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Heating => "Heizung",
            Self::Condition => "Zustand",
            Self::InteriorQuality => "Qualität",
            Self::FlatType => "Wohnungstyp",
        }
    }

    /// Column of the prediction record holding this category's code.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Heating => "heatingType",
            Self::Condition => "condition",
            Self::InteriorQuality => "interiorQual",
            Self::FlatType => "typeOfFlat",
        }
    }

    /// Label/code pairs in form display order.
    pub const fn entries(self) -> &'static [VocabularyEntry] {
        match self {
            Self::Heating => HEATING,
            Self::Condition => CONDITION,
            Self::InteriorQuality => INTERIOR_QUALITY,
            Self::FlatType => FLAT_TYPE,
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub label: &'static str,
    pub code: &'static str,
}

const fn entry(label: &'static str, code: &'static str) -> VocabularyEntry {
    VocabularyEntry { label, code }
}

const HEATING: &[VocabularyEntry] = &[
    entry("Zentralheizung", "central_heating"),
    entry("Fernwärme", "district_heating"),
    entry("Gas", "gas_heating"),
    entry("Fußboden", "floor_heating"),
    entry("Etagenheizung", "self_contained_central_heating"),
    entry("Wärmepumpe", "heat_pump"),
    entry("Öl", "oil_heating"),
];

const CONDITION: &[VocabularyEntry] = &[
    entry("Gepflegt", "well_kept"),
    entry("Neuwertig", "mint_condition"),
    entry("Erstbezug", "first_time_use"),
    entry("Modernisiert", "modernized"),
    entry("Saniert", "refurbished"),
    entry("Renoviert", "fully_renovated"),
];

const INTERIOR_QUALITY: &[VocabularyEntry] = &[
    entry("Normal", "normal"),
    entry("Gehoben", "sophisticated"),
    entry("Luxus", "luxury"),
    entry("Einfach", "simple"),
];

const FLAT_TYPE: &[VocabularyEntry] = &[
    entry("Etagenwohnung", "apartment"),
    entry("Dachgeschoss", "roof_storey"),
    entry("Erdgeschoss", "ground_floor"),
    entry("Maisonette", "maisonette"),
    entry("Penthouse", "penthouse"),
    entry("Loft", "loft"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    #[error("{category} vocabulary is empty")]
    Empty { category: FeatureCategory },
    #[error("{category} vocabulary lists label '{label}' more than once")]
    DuplicateLabel {
        category: FeatureCategory,
        label: String,
    },
    #[error("{category} vocabulary maps more than one label to code '{code}'")]
    DuplicateCode {
        category: FeatureCategory,
        code: &'static str,
    },
}

/// Checks that a category's shipped table maps labels to codes one-to-one.
pub(crate) fn validate(category: FeatureCategory) -> Result<(), VocabularyError> {
    validate_entries(category, category.entries())
}

/// Labels are compared after normalization, so `"Gas"` and `" Gas"` collide.
pub(crate) fn validate_entries(
    category: FeatureCategory,
    entries: &[VocabularyEntry],
) -> Result<(), VocabularyError> {
    if entries.is_empty() {
        return Err(VocabularyError::Empty { category });
    }

    let mut labels = HashSet::with_capacity(entries.len());
    let mut codes = HashSet::with_capacity(entries.len());
    for entry in entries {
        let label = normalize_label(entry.label);
        if !labels.insert(label.clone()) {
            return Err(VocabularyError::DuplicateLabel { category, label });
        }
        if !codes.insert(entry.code) {
            return Err(VocabularyError::DuplicateCode {
                category,
                code: entry.code,
            });
        }
    }

    Ok(())
}
