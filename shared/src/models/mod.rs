//! Domain models for the getVolunteer platform

mod need;
mod volunteer;
mod volunteer_match;

pub use need::*;
pub use volunteer::*;
pub use volunteer_match::*;
