// File: quizkid-common/src/models/kid.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Error;

/// Per-kid preferences. A closed struct rather than an open key/value bag,
/// so unknown keys are a compile error instead of silent data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct KidSettings {
    pub sound_enabled: bool,
    pub daily_screen_minutes: Option<i32>,
    pub color_theme: Option<String>,
}

impl Default for KidSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            daily_screen_minutes: None,
            color_theme: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Kid {
    pub kid_id: Uuid,
    pub display_name: String,
    pub birth_year: Option<i32>,
    pub avatar: Option<String>,
    pub settings: KidSettings,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Kid {
    pub fn new(display_name: &str, birth_year: Option<i32>) -> Self {
        let now = Utc::now();
        Self {
            kid_id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            birth_year,
            avatar: None,
            settings: KidSettings::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Guardian {
    pub guardian_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guardian {
    pub fn new(display_name: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            guardian_id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            email: email.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum GuardianRelationship {
    Parent,
    Grandparent,
    Sibling,
    Other,
}

impl fmt::Display for GuardianRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardianRelationship::Parent => write!(f, "Parent"),
            GuardianRelationship::Grandparent => write!(f, "Grandparent"),
            GuardianRelationship::Sibling => write!(f, "Sibling"),
            GuardianRelationship::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for GuardianRelationship {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parent" => Ok(GuardianRelationship::Parent),
            "grandparent" => Ok(GuardianRelationship::Grandparent),
            "sibling" => Ok(GuardianRelationship::Sibling),
            "other" => Ok(GuardianRelationship::Other),
            other => Err(Error::InvalidArgument(format!("Unknown relationship: {}", other))),
        }
    }
}

/// Links a guardian to a kid. A kid has at most two guardian links, of
/// which at most one is primary (enforced by the kid service).
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct GuardianLink {
    pub kid_id: Uuid,
    pub guardian_id: Uuid,
    pub relationship: GuardianRelationship,
    pub is_primary: bool,
    pub linked_at: DateTime<Utc>,
}
