//! Search filter inputs

use crate::models::{MapBounds, PropertyStatus, PropertyType};
use serde::{Deserialize, Serialize};

/// Numeric values usable as range bounds
pub trait RangeValue: Copy {
    fn to_f64(self) -> f64;
}

impl RangeValue for u32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl RangeValue for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl RangeValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// Optional inclusive bounds on one numeric field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: RangeValue> NumericRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Bounds that actually constrain the field.
    ///
    /// A bound of zero counts as unset: `min = 0` adds no lower bound and
    /// `max = 0` adds no upper bound.
    pub fn effective_bounds(&self) -> (Option<f64>, Option<f64>) {
        let nonzero = |v: Option<T>| v.map(RangeValue::to_f64).filter(|v| *v != 0.0);
        (nonzero(self.min), nonzero(self.max))
    }
}

/// Structured search request. Every field is optional; an absent field
/// imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub bounds: Option<MapBounds>,

    #[serde(default)]
    pub property_types: Option<Vec<PropertyType>>,

    #[serde(default)]
    pub statuses: Option<Vec<PropertyStatus>>,

    #[serde(default)]
    pub price: NumericRange<u64>,

    #[serde(default)]
    pub bedrooms: NumericRange<u32>,

    #[serde(default)]
    pub bathrooms: NumericRange<f64>,

    #[serde(default)]
    pub square_feet: NumericRange<u32>,
}

impl SearchFilters {
    /// Filters constraining only the map area
    pub fn within(bounds: MapBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Default::default()
        }
    }

    pub fn with_statuses(mut self, statuses: Vec<PropertyStatus>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    pub fn with_property_types(mut self, property_types: Vec<PropertyType>) -> Self {
        self.property_types = Some(property_types);
        self
    }
}
