//! Rent estimation core: postal-code aware location resolution, localized feature
//! vocabularies and the fixed-schema record handed to an external price model.

pub mod config;
pub mod error;
pub mod estimate;
pub mod features;
pub mod location;
pub mod telemetry;
