//! Listing search.
//!
//! Two layers: [`build_predicate`] lowers [`SearchFilters`] into a
//! store-agnostic [`Predicate`], and [`PropertySearch`] runs it against the
//! document store, including the radius refinement used for nearby lookups.

pub mod filters;
pub mod predicate;
pub mod radius;
pub mod service;

pub use filters::{NumericRange, SearchFilters};
pub use predicate::{build_predicate, fields, Constraint, Predicate};
pub use radius::{bounding_box, MILES_PER_DEGREE_LATITUDE, MIN_LONGITUDE_COSINE};
pub use service::PropertySearch;
