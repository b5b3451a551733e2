//! Volunteer to need match records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded fit between a volunteer and a need
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VolunteerNeedMatch {
    pub id: i64,
    pub volunteer_id: i64,
    pub need_id: i64,
    /// Why the volunteer fits the need
    pub match_details: String,
    /// Missing on rows recorded before timestamps were tracked
    pub created_at: Option<DateTime<Utc>>,
}
