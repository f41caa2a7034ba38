// 🪐 Near-Earth Object Entity
//
// The NEO feed is messy: many objects have no IAU name and most have no
// measured diameter. Construction normalizes those cases instead of failing:
// - empty name     -> None (never "")
// - empty diameter -> NaN (never 0.0)
// - pha != "Y"     -> not hazardous

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ApproachId;
use crate::error::{ModelError, Result};

// ============================================================================
// NEO ENTITY
// ============================================================================

/// A near-Earth object (NEO)
///
/// Identity: `designation` (primary designation, unique, never changes)
/// Values: optional IAU name, diameter in km (NaN when unknown), hazard flag
///
/// `approaches` starts empty and is filled only while a `NeoDatabase` is
/// being built.
#[derive(Debug, Clone)]
pub struct NearEarthObject {
    designation: String,
    name: Option<String>,
    diameter: f64,
    hazardous: bool,
    approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Create a NEO from the four raw CSV fields
    ///
    /// # Arguments
    /// * `designation` - primary designation (`pdes`), must not be empty
    /// * `name` - IAU name, possibly empty
    /// * `diameter` - diameter in km, possibly empty
    /// * `hazardous` - `pha` flag, "Y" for potentially hazardous
    ///
    /// # Returns
    /// * `Err(ModelError::EmptyDesignation)` - the only construction failure
    pub fn new(designation: &str, name: &str, diameter: &str, hazardous: &str) -> Result<Self> {
        let designation = designation.trim();
        if designation.is_empty() {
            return Err(ModelError::EmptyDesignation);
        }

        let name = name.trim();
        let name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };

        Ok(NearEarthObject {
            designation: designation.to_string(),
            name,
            diameter: parse_diameter(diameter),
            hazardous: hazardous.trim() == "Y",
            approaches: Vec::new(),
        })
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Diameter in kilometers, NaN when unknown
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn has_known_diameter(&self) -> bool {
        !self.diameter.is_nan()
    }

    pub fn hazardous(&self) -> bool {
        self.hazardous
    }

    /// Handles of the linked close approaches, in load order
    pub fn approaches(&self) -> &[ApproachId] {
        &self.approaches
    }

    /// Full name: "433 - Eros" when named, bare designation otherwise
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} - {}", self.designation, name),
            None => self.designation.clone(),
        }
    }

    /// Flat record for CSV/JSON output
    ///
    /// The missing name becomes "" here and only here.
    pub fn serialize(&self) -> NeoRecord {
        NeoRecord {
            designation: self.designation.clone(),
            name: self.name.clone().unwrap_or_default(),
            diameter_km: self.diameter,
            potentially_hazardous: self.hazardous,
        }
    }

    pub(crate) fn push_approach(&mut self, approach: ApproachId) {
        self.approaches.push(approach);
    }

    /// Same NEO with no approach handles, ready to enter a new database
    pub(crate) fn unlinked(mut self) -> Self {
        self.approaches.clear();
        self
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diameter = if self.has_known_diameter() {
            format!("{:.3}", self.diameter)
        } else {
            "not available".to_string()
        };
        let hazard = if self.hazardous { "is" } else { "is not" };

        write!(
            f,
            "{}, has a diameter of {}, and {} potentially hazardous.",
            self.fullname(),
            diameter,
            hazard
        )
    }
}

/// Serialized NEO attributes (writer output contract)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoRecord {
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Unknown, unparseable, negative and non-finite diameters all become NaN
fn parse_diameter(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return f64::NAN;
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            tracing::debug!(diameter = raw, "unusable diameter, treating as unknown");
            f64::NAN
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neo_creation() {
        let neo = NearEarthObject::new("433", "Eros", "16.84", "N").unwrap();

        assert_eq!(neo.designation(), "433");
        assert_eq!(neo.name(), Some("Eros"));
        assert_eq!(neo.diameter(), 16.84);
        assert!(!neo.hazardous());
        assert!(neo.approaches().is_empty());
        assert_eq!(neo.fullname(), "433 - Eros");
    }

    #[test]
    fn test_empty_designation_fails() {
        let result = NearEarthObject::new("", "Eros", "16.84", "N");
        assert_eq!(result.unwrap_err(), ModelError::EmptyDesignation);

        let result = NearEarthObject::new("   ", "", "", "");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_name_normalizes_to_none() {
        let neo = NearEarthObject::new("2020 AB", "", "", "N").unwrap();

        assert_eq!(neo.name(), None);
        assert_eq!(neo.fullname(), "2020 AB");
        assert!(!neo.fullname().contains(" - "));
        assert!(!neo.fullname().contains("None"));
    }

    #[test]
    fn test_hazardous_flag() {
        assert!(NearEarthObject::new("1", "", "", "Y").unwrap().hazardous());
        assert!(!NearEarthObject::new("1", "", "", "N").unwrap().hazardous());
        assert!(!NearEarthObject::new("1", "", "", "").unwrap().hazardous());
        assert!(!NearEarthObject::new("1", "", "", "y").unwrap().hazardous());
    }

    #[test]
    fn test_missing_diameter_is_nan() {
        let neo = NearEarthObject::new("2020 AB", "", "", "N").unwrap();

        assert!(neo.diameter().is_nan());
        assert!(neo.diameter() != neo.diameter());
        assert!(!neo.has_known_diameter());
        assert_eq!(
            neo.to_string(),
            "2020 AB, has a diameter of not available, and is not potentially hazardous."
        );
    }

    #[test]
    fn test_bad_diameter_degrades_to_nan() {
        assert!(NearEarthObject::new("1", "", "wide", "N").unwrap().diameter().is_nan());
        assert!(NearEarthObject::new("1", "", "-3.0", "N").unwrap().diameter().is_nan());
        assert!(NearEarthObject::new("1", "", "inf", "N").unwrap().diameter().is_nan());
        assert_eq!(NearEarthObject::new("1", "", "0", "N").unwrap().diameter(), 0.0);
    }

    #[test]
    fn test_display_three_decimals() {
        let neo = NearEarthObject::new("433", "Eros", "16.84", "Y").unwrap();
        assert_eq!(
            neo.to_string(),
            "433 - Eros, has a diameter of 16.840, and is potentially hazardous."
        );
    }

    #[test]
    fn test_serialize_named() {
        let neo = NearEarthObject::new("1036", "Ganymed", "37.675", "N").unwrap();
        let record = neo.serialize();

        assert_eq!(
            record,
            NeoRecord {
                designation: "1036".to_string(),
                name: "Ganymed".to_string(),
                diameter_km: 37.675,
                potentially_hazardous: false,
            }
        );
    }

    #[test]
    fn test_serialize_unnamed_uses_empty_string() {
        let neo = NearEarthObject::new("2020 AB", "", "", "Y").unwrap();
        let record = neo.serialize();

        assert_eq!(record.name, "");
        assert!(record.diameter_km.is_nan());
        assert!(record.potentially_hazardous);
        // In memory the name stays absent
        assert_eq!(neo.name(), None);
    }
}
