//! Supervisors and the supervisor choice made on a new task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles allowed to supervise a task.
pub const SUPERVISOR_ROLES: [&str; 2] = ["byggeleder", "chef"];

/// An internal supervisor (byggeleder or chef) from `/employees/supervisors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    #[serde(rename = "employee_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, rename = "profilePictureUrl", alias = "profile_picture_url")]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub has_driving_license: Option<bool>,
    #[serde(default)]
    pub driving_license_category: Option<String>,
    #[serde(default)]
    pub driving_license_expiration: Option<DateTime<Utc>>,
}

impl Supervisor {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
            phone_number: None,
            profile_picture_url: None,
            address: None,
            has_driving_license: None,
            driving_license_category: None,
            driving_license_expiration: None,
        }
    }

    /// Positive id and a supervising role.
    pub fn can_supervise(&self) -> bool {
        self.id > 0 && SUPERVISOR_ROLES.contains(&self.role.to_lowercase().as_str())
    }
}

/// Who supervises a task being created.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SupervisorChoice {
    #[default]
    None,
    Internal(Supervisor),
    External {
        name: String,
        email: String,
        phone: String,
    },
}

impl SupervisorChoice {
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }
}

/// Supervisor list could not be loaded; carries why and what to show instead.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedFallback {
    pub reason: String,
    pub fallback: Vec<Supervisor>,
}

impl DegradedFallback {
    pub fn new(reason: impl Into<String>) -> Self {
        let mut admin = Supervisor::new(8, "Admin (Fallback)", "admin@ksrcranes.dk", "chef");
        admin.phone_number = Some("+45 12 34 56 78".to_string());
        Self {
            reason: reason.into(),
            fallback: vec![admin],
        }
    }
}

impl std::fmt::Display for DegradedFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load supervisors from server. Using limited data. ({})", self.reason)
    }
}
