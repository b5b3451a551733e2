//! Volunteer profile model

use serde::{Deserialize, Serialize};

/// A volunteer's public profile
///
/// The stored password hash is deliberately absent: rows are selected
/// without it and it can never be serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Volunteer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub skills: Option<String>,
    pub volunteer_interests: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub is_active: bool,
    pub is_manager: bool,
}
