//! Localized form labels and the canonical codes the price model was trained on.

mod mapper;
mod normalizer;
mod vocabulary;

pub use mapper::{CategoryVocabulary, FeatureError, FeatureLabels, FeatureMapper, MappedFeatures};
pub use vocabulary::{FeatureCategory, VocabularyEntry, VocabularyError};
