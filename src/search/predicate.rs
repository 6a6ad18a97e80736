//! Store-agnostic match predicates and the filter → predicate lowering

use crate::search::filters::{NumericRange, RangeValue, SearchFilters};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Document field paths referenced by listing filters
pub mod fields {
    pub const LATITUDE: &str = "coordinates.latitude";
    pub const LONGITUDE: &str = "coordinates.longitude";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const STATUS: &str = "status";
    pub const PRICE: &str = "price";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const SQUARE_FEET: &str = "square_feet";
    pub const AGENT_ID: &str = "agent_id";
}

/// Constraint on a single document field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive numeric range; a missing bound is open
    Range { min: Option<f64>, max: Option<f64> },

    /// The field must be a string equal to one of the values
    OneOf { values: Vec<String> },
}

impl Constraint {
    fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Constraint::Range { min, max } => {
                let Some(n) = value.and_then(Value::as_f64) else {
                    return false;
                };
                min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
            }
            Constraint::OneOf { values } => value
                .and_then(Value::as_str)
                .is_some_and(|s| values.iter().any(|v| v == s)),
        }
    }
}

/// AND-combination of per-field constraints, keyed by dotted field path.
///
/// An empty predicate matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    constraints: BTreeMap<String, Constraint>,
}

impl Predicate {
    /// Predicate matching everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn get(&self, field: &str) -> Option<&Constraint> {
        self.constraints.get(field)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add an inclusive range; no-op when both bounds are open
    pub fn with_range(mut self, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.constraints
                .insert(field.to_string(), Constraint::Range { min, max });
        }
        self
    }

    /// Add a set-membership constraint; no-op for an empty set
    pub fn with_one_of<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        if !values.is_empty() {
            self.constraints
                .insert(field.to_string(), Constraint::OneOf { values });
        }
        self
    }

    /// Exact string equality
    pub fn with_eq(self, field: &str, value: impl ToString) -> Self {
        self.with_one_of(field, [value.to_string()])
    }

    /// Evaluate against a JSON document
    pub fn matches(&self, doc: &Value) -> bool {
        self.constraints
            .iter()
            .all(|(path, constraint)| constraint.matches(lookup(doc, path)))
    }
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |value, key| value.get(key))
}

fn with_numeric<T: RangeValue>(predicate: Predicate, field: &str, range: &NumericRange<T>) -> Predicate {
    let (min, max) = range.effective_bounds();
    predicate.with_range(field, min, max)
}

/// Lower search filters into a predicate.
///
/// Pure: equal filters always give equal predicates. Inverted ranges are
/// passed through and simply match nothing.
pub fn build_predicate(filters: &SearchFilters) -> Predicate {
    let mut predicate = Predicate::all();

    if let Some(bounds) = &filters.bounds {
        predicate = predicate
            .with_range(
                fields::LATITUDE,
                Some(bounds.southwest.latitude),
                Some(bounds.northeast.latitude),
            )
            .with_range(
                fields::LONGITUDE,
                Some(bounds.southwest.longitude),
                Some(bounds.northeast.longitude),
            );
    }

    if let Some(types) = &filters.property_types {
        predicate = predicate.with_one_of(fields::PROPERTY_TYPE, types);
    }

    if let Some(statuses) = &filters.statuses {
        predicate = predicate.with_one_of(fields::STATUS, statuses);
    }

    predicate = with_numeric(predicate, fields::PRICE, &filters.price);
    predicate = with_numeric(predicate, fields::BEDROOMS, &filters.bedrooms);
    predicate = with_numeric(predicate, fields::BATHROOMS, &filters.bathrooms);
    with_numeric(predicate, fields::SQUARE_FEET, &filters.square_feet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, MapBounds, PropertyStatus, PropertyType};
    use serde_json::json;

    fn doc(lat: f64, lng: f64) -> Value {
        json!({
            "property_type": "condo",
            "status": "available",
            "price": 250000,
            "bedrooms": 2,
            "bathrooms": 1.5,
            "square_feet": 900,
            "coordinates": { "latitude": lat, "longitude": lng }
        })
    }

    fn bounds() -> MapBounds {
        MapBounds::new(Coordinates::new(40.0, -75.0), Coordinates::new(41.0, -74.0))
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let predicate = build_predicate(&SearchFilters::default());
        assert!(predicate.is_empty());
        assert!(predicate.matches(&doc(0.0, 0.0)));
        assert!(predicate.matches(&json!({})));
    }

    #[test]
    fn test_bounds_each_edge_independently() {
        let predicate = build_predicate(&SearchFilters::within(bounds()));

        assert!(predicate.matches(&doc(40.5, -74.5)));
        assert!(!predicate.matches(&doc(39.9, -74.5))); // south
        assert!(!predicate.matches(&doc(41.1, -74.5))); // north
        assert!(!predicate.matches(&doc(40.5, -75.1))); // west
        assert!(!predicate.matches(&doc(40.5, -73.9))); // east
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let predicate = build_predicate(&SearchFilters::within(bounds()));
        assert!(predicate.matches(&doc(40.0, -75.0)));
        assert!(predicate.matches(&doc(41.0, -74.0)));
    }

    #[test]
    fn test_set_constraints() {
        let filters = SearchFilters::default()
            .with_property_types(vec![PropertyType::House, PropertyType::Condo])
            .with_statuses(vec![PropertyStatus::Sold]);
        let predicate = build_predicate(&filters);

        assert_eq!(
            predicate.get(fields::PROPERTY_TYPE),
            Some(&Constraint::OneOf {
                values: vec!["house".to_string(), "condo".to_string()]
            })
        );
        // condo matches the type set but is not sold
        assert!(!predicate.matches(&doc(40.5, -74.5)));
    }

    #[test]
    fn test_empty_sets_add_no_constraint() {
        let filters = SearchFilters::default()
            .with_property_types(vec![])
            .with_statuses(vec![]);
        assert!(build_predicate(&filters).is_empty());
    }

    #[test]
    fn test_numeric_ranges_inclusive() {
        let filters = SearchFilters {
            price: NumericRange::new(Some(250_000), Some(300_000)),
            bathrooms: NumericRange::at_least(1.5),
            ..Default::default()
        };
        let predicate = build_predicate(&filters);

        assert!(predicate.matches(&doc(40.5, -74.5)));
        assert_eq!(
            predicate.get(fields::PRICE),
            Some(&Constraint::Range {
                min: Some(250_000.0),
                max: Some(300_000.0)
            })
        );
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filters = SearchFilters {
            bedrooms: NumericRange::new(Some(5), Some(1)),
            ..Default::default()
        };
        let predicate = build_predicate(&filters);

        for bedrooms in 0..10 {
            assert!(!predicate.matches(&json!({ "bedrooms": bedrooms })));
        }
    }

    #[test]
    fn test_zero_minimum_equals_unset() {
        let with_zero = SearchFilters {
            price: NumericRange::at_least(0),
            ..Default::default()
        };
        assert_eq!(build_predicate(&with_zero), build_predicate(&SearchFilters::default()));
    }

    #[test]
    fn test_range_on_missing_field_does_not_match() {
        let filters = SearchFilters {
            square_feet: NumericRange::at_most(2000),
            ..Default::default()
        };
        let predicate = build_predicate(&filters);
        assert!(!predicate.matches(&json!({ "price": 1 })));
        assert!(!predicate.matches(&json!({ "square_feet": null })));
    }

    #[test]
    fn test_build_is_idempotent() {
        let filters = SearchFilters {
            bounds: Some(bounds()),
            statuses: Some(vec![PropertyStatus::Available]),
            price: NumericRange::new(Some(1), Some(2)),
            ..Default::default()
        };
        assert_eq!(build_predicate(&filters), build_predicate(&filters));
    }

    #[test]
    fn test_with_eq() {
        let predicate = Predicate::all().with_eq(fields::AGENT_ID, "agent-7");
        assert!(predicate.matches(&json!({ "agent_id": "agent-7" })));
        assert!(!predicate.matches(&json!({ "agent_id": "agent-8" })));
        assert!(!predicate.matches(&json!({ "agent_id": null })));
    }
}
