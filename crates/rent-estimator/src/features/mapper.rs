use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::normalizer::normalize_label;
use super::vocabulary::{self, FeatureCategory, VocabularyEntry, VocabularyError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("unknown {category} label '{label}'")]
    UnknownLabel {
        category: FeatureCategory,
        label: String,
    },
}

/// Display labels picked in the form, one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLabels {
    pub heating: String,
    pub condition: String,
    pub interior_quality: String,
    pub flat_type: String,
}

impl FeatureLabels {
    fn get(&self, category: FeatureCategory) -> &str {
        match category {
            FeatureCategory::Heating => &self.heating,
            FeatureCategory::Condition => &self.condition,
            FeatureCategory::InteriorQuality => &self.interior_quality,
            FeatureCategory::FlatType => &self.flat_type,
        }
    }
}

/// Canonical codes ready for the prediction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappedFeatures {
    pub heating_type: &'static str,
    pub condition: &'static str,
    pub interior_quality: &'static str,
    pub flat_type: &'static str,
}

/// Labels offered for one category, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryVocabulary {
    pub category: FeatureCategory,
    pub caption: &'static str,
    pub column: &'static str,
    pub entries: &'static [VocabularyEntry],
}

/// Label → code lookup over the validated vocabularies.
#[derive(Debug, Clone)]
pub struct FeatureMapper {
    codes: HashMap<(FeatureCategory, String), &'static str>,
}

impl FeatureMapper {
    /// Builds the mapper from the shipped tables, rejecting any table that is not one-to-one.
    pub fn standard() -> Result<Self, VocabularyError> {
        let mut codes = HashMap::new();
        for category in FeatureCategory::ordered() {
            vocabulary::validate(category)?;
            for entry in category.entries() {
                codes.insert((category, normalize_label(entry.label)), entry.code);
            }
        }
        Ok(Self { codes })
    }

    pub fn map_label(
        &self,
        category: FeatureCategory,
        label: &str,
    ) -> Result<&'static str, FeatureError> {
        self.codes
            .get(&(category, normalize_label(label)))
            .copied()
            .ok_or_else(|| FeatureError::UnknownLabel {
                category,
                label: label.to_string(),
            })
    }

    pub fn map_all(&self, labels: &FeatureLabels) -> Result<MappedFeatures, FeatureError> {
        Ok(MappedFeatures {
            heating_type: self.map_label(
                FeatureCategory::Heating,
                labels.get(FeatureCategory::Heating),
            )?,
            condition: self.map_label(
                FeatureCategory::Condition,
                labels.get(FeatureCategory::Condition),
            )?,
            interior_quality: self.map_label(
                FeatureCategory::InteriorQuality,
                labels.get(FeatureCategory::InteriorQuality),
            )?,
            flat_type: self.map_label(
                FeatureCategory::FlatType,
                labels.get(FeatureCategory::FlatType),
            )?,
        })
    }

    pub fn vocabulary(&self) -> Vec<CategoryVocabulary> {
        FeatureCategory::ordered()
            .into_iter()
            .map(|category| CategoryVocabulary {
                category,
                caption: category.caption(),
                column: category.column(),
                entries: category.entries(),
            })
            .collect()
    }
}
