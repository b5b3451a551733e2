//! Volunteer opportunity ("need") models

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::Volunteer;

/// A volunteer opportunity published by a volunteer (its owner)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Need {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub required_tasks: Option<String>,
    pub required_skills: Option<String>,
    pub num_volunteers_needed: i32,
    pub format: NeedFormat,
    pub location_details: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub owner_id: i64,
    /// Owner profile, attached after the row is loaded
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub owner: Option<Volunteer>,
}

impl Need {
    pub fn with_owner(mut self, owner: Volunteer) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// How a need is carried out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "need_format"))]
pub enum NeedFormat {
    #[serde(rename = "in-person")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "in-person"))]
    InPerson,
    #[serde(rename = "virtual")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "virtual"))]
    Virtual,
}

impl NeedFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedFormat::InPerson => "in-person",
            NeedFormat::Virtual => "virtual",
        }
    }
}

impl std::fmt::Display for NeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown need format '{0}', expected 'in-person' or 'virtual'")]
pub struct ParseNeedFormatError(pub String);

impl FromStr for NeedFormat {
    type Err = ParseNeedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-person" => Ok(NeedFormat::InPerson),
            "virtual" => Ok(NeedFormat::Virtual),
            other => Err(ParseNeedFormatError(other.to_string())),
        }
    }
}
