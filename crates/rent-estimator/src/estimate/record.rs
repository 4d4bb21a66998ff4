use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::io::Write;

use super::inputs::{AmenityFlags, NumericInputs};
use crate::features::MappedFeatures;
use crate::location::ResolvedLocation;

/// Column names of the prediction record, in the order the model was trained on.
pub const COLUMNS: [&str; 21] = [
    "date",
    "livingSpace",
    "noRooms",
    "floor",
    "regio1",
    "regio2",
    "heatingType",
    "condition",
    "interiorQual",
    "typeOfFlat",
    "geo_plz",
    "balcony",
    "lift",
    "hasKitchen",
    "garden",
    "cellar",
    "yearConstructed",
    "condition_was_missing",
    "interiorQual_was_missing",
    "heatingType_was_missing",
    "yearConstructed_was_missing",
];

/// One row handed to the price model. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub date: NaiveDateTime,
    #[serde(rename = "livingSpace")]
    pub living_space: f64,
    #[serde(rename = "noRooms")]
    pub rooms: f64,
    pub floor: f64,
    #[serde(rename = "regio1")]
    pub state: String,
    #[serde(rename = "regio2")]
    pub city: String,
    #[serde(rename = "heatingType")]
    pub heating_type: String,
    pub condition: String,
    #[serde(rename = "interiorQual")]
    pub interior_quality: String,
    #[serde(rename = "typeOfFlat")]
    pub flat_type: String,
    #[serde(rename = "geo_plz")]
    pub postal_code: String,
    pub balcony: bool,
    pub lift: bool,
    #[serde(rename = "hasKitchen")]
    pub has_kitchen: bool,
    pub garden: bool,
    pub cellar: bool,
    #[serde(rename = "yearConstructed")]
    pub year_constructed: Option<f64>,
    #[serde(serialize_with = "flag_as_int")]
    pub condition_was_missing: bool,
    #[serde(rename = "interiorQual_was_missing", serialize_with = "flag_as_int")]
    pub interior_quality_was_missing: bool,
    #[serde(rename = "heatingType_was_missing", serialize_with = "flag_as_int")]
    pub heating_type_was_missing: bool,
    #[serde(rename = "yearConstructed_was_missing", serialize_with = "flag_as_int")]
    pub year_constructed_was_missing: bool,
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

impl PredictionRecord {
    /// Values in [`COLUMNS`] order.
    pub fn row(&self) -> Vec<Value> {
        vec![
            json!(self.date.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            json!(self.living_space),
            json!(self.rooms),
            json!(self.floor),
            json!(self.state),
            json!(self.city),
            json!(self.heating_type),
            json!(self.condition),
            json!(self.interior_quality),
            json!(self.flat_type),
            json!(self.postal_code),
            json!(self.balcony),
            json!(self.lift),
            json!(self.has_kitchen),
            json!(self.garden),
            json!(self.cellar),
            json!(self.year_constructed),
            json!(u8::from(self.condition_was_missing)),
            json!(u8::from(self.interior_quality_was_missing)),
            json!(u8::from(self.heating_type_was_missing)),
            json!(u8::from(self.year_constructed_was_missing)),
        ]
    }

    /// Single-row table in the `dataframe_split` layout.
    pub fn dataframe_split(&self) -> Value {
        json!({
            "columns": COLUMNS,
            "data": [self.row()],
        })
    }

    /// Writes a header line and this record as one CSV row. A missing year is an empty cell.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.serialize(self)?;
        csv_writer.flush()?;
        Ok(())
    }
}

/// Assembles [`PredictionRecord`]s from resolved form inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder;

impl RecordBuilder {
    /// Pure assembly; a construction year of `0` or `None` becomes a null year with its
    /// missing flag set. The remaining missing flags are always `false`.
    pub fn build(
        location: &ResolvedLocation,
        numeric: &NumericInputs,
        features: &MappedFeatures,
        amenities: &AmenityFlags,
        timestamp: NaiveDateTime,
    ) -> PredictionRecord {
        let (year_constructed, year_constructed_was_missing) = match numeric.year_constructed {
            Some(year) if !numeric.year_is_unknown() => (Some(f64::from(year)), false),
            _ => (None, true),
        };

        PredictionRecord {
            date: timestamp,
            living_space: numeric.living_space,
            rooms: numeric.rooms,
            floor: f64::from(numeric.floor),
            state: location.state.clone(),
            city: location.city.clone(),
            heating_type: features.heating_type.to_string(),
            condition: features.condition.to_string(),
            interior_quality: features.interior_quality.to_string(),
            flat_type: features.flat_type.to_string(),
            postal_code: location.postal_code.clone(),
            balcony: amenities.balcony,
            lift: amenities.lift,
            has_kitchen: amenities.kitchen,
            garden: amenities.garden,
            cellar: amenities.cellar,
            year_constructed,
            condition_was_missing: false,
            interior_quality_was_missing: false,
            heating_type_was_missing: false,
            year_constructed_was_missing,
        }
    }
}
