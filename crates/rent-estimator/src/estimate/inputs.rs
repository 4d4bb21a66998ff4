use serde::{Deserialize, Serialize};

/// Construction year value meaning "unknown".
pub const YEAR_UNKNOWN: u16 = 0;

pub const LIVING_SPACE_RANGE: (f64, f64) = (10.0, 500.0);
pub const ROOMS_RANGE: (f64, f64) = (1.0, 10.0);
pub const FLOOR_RANGE: (i32, i32) = (-1, 40);
pub const YEAR_RANGE: (u16, u16) = (1900, 2025);

/// Free-form numbers collected by the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericInputs {
    pub living_space: f64,
    pub rooms: f64,
    pub floor: i32,
    /// `None` or [`YEAR_UNKNOWN`] when the construction year is not known.
    #[serde(default)]
    pub year_constructed: Option<u16>,
}

impl NumericInputs {
    pub fn year_is_unknown(&self) -> bool {
        matches!(self.year_constructed, None | Some(YEAR_UNKNOWN))
    }

    /// Checks the values against the ranges the form offers.
    pub fn validate(&self) -> Result<(), InputError> {
        check_range("living_space", self.living_space, LIVING_SPACE_RANGE)?;
        check_range("rooms", self.rooms, ROOMS_RANGE)?;
        if (self.rooms * 2.0).fract() != 0.0 {
            return Err(InputError::RoomStep(self.rooms));
        }
        check_range(
            "floor",
            f64::from(self.floor),
            (f64::from(FLOOR_RANGE.0), f64::from(FLOOR_RANGE.1)),
        )?;

        match self.year_constructed {
            None | Some(YEAR_UNKNOWN) => Ok(()),
            Some(year) => check_range(
                "year_constructed",
                f64::from(year),
                (f64::from(YEAR_RANGE.0), f64::from(YEAR_RANGE.1)),
            ),
        }
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Checkbox extras of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenityFlags {
    pub balcony: bool,
    pub kitchen: bool,
    pub lift: bool,
    pub garden: bool,
    pub cellar: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("rooms must be given in steps of 0.5, got {0}")]
    RoomStep(f64),
}
