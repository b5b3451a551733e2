//! HTTP request handlers

mod health;
mod need;
mod volunteer;
mod volunteer_match;

pub use health::*;
pub use need::*;
pub use volunteer::*;
pub use volunteer_match::*;
