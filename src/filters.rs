// 🔎 Query Filters - Predicates as data
//
// A filter is a pure predicate over a linked close approach. User criteria
// (dates, distance, velocity, diameter, hazard flag) become one
// `AttributeFilter` each; any closure can also be used through `predicate`.

use anyhow::{Context as AnyhowContext, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::db::LinkedApproach;

// ============================================================================
// FILTER CONTRACT
// ============================================================================

/// ApproachFilter - the only thing `NeoDatabase::query` needs from a filter
///
/// Implementations must be pure: `query` may stop evaluating the filters of a
/// record as soon as one of them fails.
pub trait ApproachFilter {
    fn matches(&self, approach: &LinkedApproach<'_>) -> bool;
}

impl<T: ApproachFilter + ?Sized> ApproachFilter for &T {
    fn matches(&self, approach: &LinkedApproach<'_>) -> bool {
        (**self).matches(approach)
    }
}

impl<T: ApproachFilter + ?Sized> ApproachFilter for Box<T> {
    fn matches(&self, approach: &LinkedApproach<'_>) -> bool {
        (**self).matches(approach)
    }
}

/// Closure-backed filter, see `predicate`
#[derive(Clone, Copy)]
pub struct Predicate<F>(F);

impl<F> ApproachFilter for Predicate<F>
where
    F: Fn(&LinkedApproach<'_>) -> bool,
{
    fn matches(&self, approach: &LinkedApproach<'_>) -> bool {
        (self.0)(approach)
    }
}

/// Lift a closure into an `ApproachFilter`
pub fn predicate<F>(f: F) -> Predicate<F>
where
    F: Fn(&LinkedApproach<'_>) -> bool,
{
    Predicate(f)
}

// ============================================================================
// ATTRIBUTE FILTERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    AtLeast,
    AtMost,
}

impl Comparison {
    /// Compare `lhs` against the reference value `rhs`
    ///
    /// Any comparison involving NaN is false.
    pub fn compare<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Comparison::Equal => lhs == rhs,
            Comparison::AtLeast => lhs >= rhs,
            Comparison::AtMost => lhs <= rhs,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
        }
    }
}

/// AttributeFilter - compare one attribute of an approach (or its NEO)
///
/// Diameter and hazard filters read the linked NEO. An approach without a
/// NEO never passes them.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeFilter {
    /// Calendar date of the approach time
    Date(Comparison, NaiveDate),
    /// Approach distance in au
    Distance(Comparison, f64),
    /// Relative velocity in km/s
    Velocity(Comparison, f64),
    /// NEO diameter in km; unknown diameters never match
    Diameter(Comparison, f64),
    /// NEO hazard flag
    Hazardous(bool),
}

impl AttributeFilter {
    pub fn attribute(&self) -> &'static str {
        match self {
            AttributeFilter::Date(..) => "date",
            AttributeFilter::Distance(..) => "distance",
            AttributeFilter::Velocity(..) => "velocity",
            AttributeFilter::Diameter(..) => "diameter",
            AttributeFilter::Hazardous(_) => "hazardous",
        }
    }
}

impl ApproachFilter for AttributeFilter {
    fn matches(&self, approach: &LinkedApproach<'_>) -> bool {
        match *self {
            AttributeFilter::Date(op, date) => op.compare(approach.time().date(), date),
            AttributeFilter::Distance(op, value) => op.compare(approach.distance(), value),
            AttributeFilter::Velocity(op, value) => op.compare(approach.velocity(), value),
            AttributeFilter::Diameter(op, value) => approach
                .neo
                .map_or(false, |neo| op.compare(neo.diameter(), value)),
            AttributeFilter::Hazardous(flag) => {
                approach.neo.map_or(false, |neo| neo.hazardous() == flag)
            }
        }
    }
}

impl fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeFilter::Date(op, date) => write!(f, "date {} {}", op.symbol(), date),
            AttributeFilter::Distance(op, v)
            | AttributeFilter::Velocity(op, v)
            | AttributeFilter::Diameter(op, v) => {
                write!(f, "{} {} {}", self.attribute(), op.symbol(), v)
            }
            AttributeFilter::Hazardous(flag) => write!(f, "hazardous == {}", flag),
        }
    }
}

// ============================================================================
// CRITERIA
// ============================================================================

/// User-supplied query criteria
///
/// Every field is optional; each one that is set becomes one filter. Can be
/// loaded from a JSON file such as:
///
/// ```json
/// { "start_date": "2020-01-01", "distance_max": 0.1, "hazardous": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Criteria {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

impl Criteria {
    /// Load criteria from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read criteria file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse criteria JSON")
    }

    /// Fields set in `overrides` replace the ones in `self`
    pub fn merge(self, overrides: Criteria) -> Criteria {
        Criteria {
            date: overrides.date.or(self.date),
            start_date: overrides.start_date.or(self.start_date),
            end_date: overrides.end_date.or(self.end_date),
            distance_min: overrides.distance_min.or(self.distance_min),
            distance_max: overrides.distance_max.or(self.distance_max),
            velocity_min: overrides.velocity_min.or(self.velocity_min),
            velocity_max: overrides.velocity_max.or(self.velocity_max),
            diameter_min: overrides.diameter_min.or(self.diameter_min),
            diameter_max: overrides.diameter_max.or(self.diameter_max),
            hazardous: overrides.hazardous.or(self.hazardous),
        }
    }
}

/// Build one filter per criterion that is set
pub fn create_filters(criteria: &Criteria) -> Vec<AttributeFilter> {
    use AttributeFilter::*;
    use Comparison::*;

    let candidates = [
        criteria.date.map(|d| Date(Equal, d)),
        criteria.start_date.map(|d| Date(AtLeast, d)),
        criteria.end_date.map(|d| Date(AtMost, d)),
        criteria.distance_min.map(|v| Distance(AtLeast, v)),
        criteria.distance_max.map(|v| Distance(AtMost, v)),
        criteria.velocity_min.map(|v| Velocity(AtLeast, v)),
        criteria.velocity_max.map(|v| Velocity(AtMost, v)),
        criteria.diameter_min.map(|v| Diameter(AtLeast, v)),
        criteria.diameter_max.map(|v| Diameter(AtMost, v)),
        criteria.hazardous.map(Hazardous),
    ];

    candidates.into_iter().flatten().collect()
}

/// First `n` items of `iter`; `None` or `Some(0)` yields everything
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> impl Iterator<Item = I::Item> {
    let n = match n {
        Some(0) | None => usize::MAX,
        Some(n) => n,
    };
    iter.take(n)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NeoDatabase;
    use crate::entities::{CloseApproach, NearEarthObject};
    use std::io::Write;

    fn sample_db() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", "Eros", "16.84", "N").unwrap(),
            NearEarthObject::new("99942", "Apophis", "0.37", "Y").unwrap(),
            NearEarthObject::new("2020 AB", "", "", "N").unwrap(),
        ];
        let approaches = vec![
            CloseApproach::new("433", "2020-Jan-01 00:00", "0.30", "5.5").unwrap(),
            CloseApproach::new("99942", "2020-Jan-02 12:00", "0.05", "20.0").unwrap(),
            CloseApproach::new("2020 AB", "2020-Jan-03 06:15", "0.01", "8.0").unwrap(),
            CloseApproach::new("unknown", "2020-Jan-02 18:00", "0.02", "9.0").unwrap(),
        ];
        NeoDatabase::new(neos, approaches)
    }

    fn designations<'a>(results: impl Iterator<Item = LinkedApproach<'a>>) -> Vec<&'a str> {
        results.map(|a| a.approach.designation()).collect()
    }

    #[test]
    fn test_comparison() {
        assert!(Comparison::Equal.compare(1.0, 1.0));
        assert!(Comparison::AtLeast.compare(2.0, 1.0));
        assert!(!Comparison::AtMost.compare(2.0, 1.0));
        assert!(!Comparison::AtLeast.compare(f64::NAN, 0.0));
        assert!(!Comparison::AtMost.compare(f64::NAN, 0.0));
    }

    #[test]
    fn test_date_filters() {
        let db = sample_db();
        let day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();

        let on = [AttributeFilter::Date(Comparison::Equal, day)];
        assert_eq!(designations(db.query(&on)), vec!["99942", "unknown"]);

        let after = [AttributeFilter::Date(Comparison::AtLeast, day)];
        assert_eq!(designations(db.query(&after)), vec!["99942", "2020 AB", "unknown"]);
    }

    #[test]
    fn test_distance_and_velocity_filters() {
        let db = sample_db();
        let filters = [
            AttributeFilter::Distance(Comparison::AtMost, 0.05),
            AttributeFilter::Velocity(Comparison::AtLeast, 8.5),
        ];

        assert_eq!(designations(db.query(&filters)), vec!["99942", "unknown"]);
    }

    #[test]
    fn test_diameter_filter_skips_unknown_and_unlinked() {
        let db = sample_db();
        let filters = [AttributeFilter::Diameter(Comparison::AtLeast, 0.0)];

        // 2020 AB has NaN diameter, "unknown" has no NEO
        assert_eq!(designations(db.query(&filters)), vec!["433", "99942"]);
    }

    #[test]
    fn test_hazardous_filter() {
        let db = sample_db();

        let hazardous = [AttributeFilter::Hazardous(true)];
        assert_eq!(designations(db.query(&hazardous)), vec!["99942"]);

        let safe = [AttributeFilter::Hazardous(false)];
        assert_eq!(designations(db.query(&safe)), vec!["433", "2020 AB"]);
    }

    #[test]
    fn test_create_filters() {
        let criteria = Criteria {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            distance_max: Some(0.1),
            hazardous: Some(false),
            ..Criteria::default()
        };

        let filters = create_filters(&criteria);
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].to_string(), "date >= 2020-01-01");
        assert_eq!(filters[1].to_string(), "distance <= 0.1");
        assert_eq!(filters[2].to_string(), "hazardous == false");

        assert!(create_filters(&Criteria::default()).is_empty());
    }

    #[test]
    fn test_criteria_merge() {
        let base = Criteria {
            distance_max: Some(0.5),
            velocity_min: Some(3.0),
            ..Criteria::default()
        };
        let overrides = Criteria {
            distance_max: Some(0.1),
            ..Criteria::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.distance_max, Some(0.1));
        assert_eq!(merged.velocity_min, Some(3.0));
        assert_eq!(merged.date, None);
    }

    #[test]
    fn test_criteria_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "date": "2020-01-02", "velocity_max": 25.0, "hazardous": true }}"#
        )
        .unwrap();

        let criteria = Criteria::from_file(file.path()).unwrap();
        assert_eq!(criteria.date, NaiveDate::from_ymd_opt(2020, 1, 2));
        assert_eq!(criteria.velocity_max, Some(25.0));
        assert_eq!(criteria.hazardous, Some(true));
        assert_eq!(criteria.distance_min, None);

        let db = sample_db();
        let filters = create_filters(&criteria);
        assert_eq!(designations(db.query(&filters)), vec!["99942"]);
    }

    #[test]
    fn test_criteria_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_distance": 0.1 }}"#).unwrap();

        assert!(Criteria::from_file(file.path()).is_err());
    }

    #[test]
    fn test_predicate_filter() {
        let db = sample_db();
        let named = predicate(|a: &LinkedApproach<'_>| a.neo.map_or(false, |n| n.name().is_some()));

        assert_eq!(designations(db.query(&[named])), vec!["433", "99942"]);
    }

    #[test]
    fn test_boxed_filters_mix() {
        let db = sample_db();
        let filters: Vec<Box<dyn ApproachFilter>> = vec![
            Box::new(AttributeFilter::Distance(Comparison::AtMost, 0.05)),
            Box::new(predicate(|a: &LinkedApproach<'_>| a.is_linked())),
        ];

        assert_eq!(designations(db.query(&filters)), vec!["99942", "2020 AB"]);
    }

    #[test]
    fn test_limit() {
        assert_eq!(limit(1..=5, Some(2)).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(limit(1..=5, Some(0)).count(), 5);
        assert_eq!(limit(1..=5, None).count(), 5);
        assert_eq!(limit(1..=5, Some(10)).count(), 5);
    }
}
