//! Shared types and models for the getVolunteer platform
//!
//! This crate holds the record types exchanged over the API together with
//! the field validators used by request payloads. Enabling the `sqlx`
//! feature derives the row mappings the backend needs.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
