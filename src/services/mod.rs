//! Business services behind the HTTP layer

pub mod contact;
pub mod property;

pub use contact::{parse_status, ContactService};
pub use property::PropertyService;
