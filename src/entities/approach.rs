// ☄️ Close Approach Entity
//
// One recorded pass of a NEO near Earth. The raw designation is kept after
// linking so unmatched records can still be reported.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::NeoId;
use crate::error::{ModelError, Result};
use crate::helpers::{cd_to_datetime, datetime_to_str};

// ============================================================================
// CLOSE APPROACH ENTITY
// ============================================================================

/// A close approach to Earth by a NEO
///
/// - `time`: UTC time of closest approach, minute resolution
/// - `distance`: nominal approach distance in astronomical units
/// - `velocity`: relative approach velocity in km/s
/// - `neo`: handle of the linked NEO, `None` until linked
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    designation: String,
    time: NaiveDateTime,
    distance: f64,
    velocity: f64,
    neo: Option<NeoId>,
}

impl CloseApproach {
    /// Create a close approach from the raw JSON fields
    ///
    /// # Arguments
    /// * `designation` - primary designation of the NEO (`des`)
    /// * `time` - compact NASA datetime (`cd`), e.g. "1900-Dec-27 01:30"
    /// * `distance` - nominal distance in au (`dist`)
    /// * `velocity` - relative velocity in km/s (`v_rel`)
    pub fn new(designation: &str, time: &str, distance: &str, velocity: &str) -> Result<Self> {
        let designation = designation.trim();
        if designation.is_empty() {
            return Err(ModelError::EmptyDesignation);
        }

        Ok(CloseApproach {
            designation: designation.to_string(),
            time: cd_to_datetime(time)?,
            distance: parse_measure("distance", distance)?,
            velocity: parse_measure("velocity", velocity)?,
            neo: None,
        })
    }

    /// Designation this approach was loaded with (the foreign key)
    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Approach time as "YYYY-MM-DD HH:MM"
    pub fn time_str(&self) -> String {
        datetime_to_str(&self.time)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn neo(&self) -> Option<NeoId> {
        self.neo
    }

    pub fn is_linked(&self) -> bool {
        self.neo.is_some()
    }

    /// Flat record for CSV/JSON output
    pub fn serialize(&self) -> ApproachRecord {
        ApproachRecord {
            datetime_utc: self.time_str(),
            distance_au: self.distance,
            velocity_km_s: self.velocity,
        }
    }

    /// Set the NEO reference. Called once per approach by the linker.
    pub(crate) fn link(&mut self, neo: NeoId) {
        debug_assert!(self.neo.is_none(), "close approach linked twice");
        self.neo = Some(neo);
    }

    /// Same approach with no NEO reference, ready to enter a new database
    pub(crate) fn unlinked(mut self) -> Self {
        self.neo = None;
        self
    }

    /// Human-readable summary with the given NEO label in place of the name
    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
        write!(
            f,
            "On {}, {} approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            label,
            self.distance,
            self.velocity
        )
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, &self.designation)
    }
}

/// Serialized approach attributes (writer output contract)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachRecord {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn parse_measure(field: &'static str, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| ModelError::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(ModelError::OutOfRange { field, value });
    }

    Ok(value)
}

// ============================================================================
// TESTS
// ============================================================================
