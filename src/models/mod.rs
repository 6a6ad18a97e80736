pub mod contact;
pub mod geo;
pub mod place;
pub mod property;
pub mod user;

pub use contact::*;
pub use geo::*;
pub use place::*;
pub use property::*;
pub use user::*;
