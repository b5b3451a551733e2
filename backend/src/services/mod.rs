//! Business logic services for the getVolunteer backend

pub mod need;
pub mod volunteer;
pub mod volunteer_match;

pub use need::NeedService;
pub use volunteer::VolunteerService;
pub use volunteer_match::MatchService;
