//! Workers as the chef API returns them: employees, availability, conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::certificate::WorkerCertificate;
use super::crane::{CraneType, EmployeeCraneType};
use super::null_as_default;

/// An employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "employee_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(
        default,
        rename = "profilePictureUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_activated: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crane_types: Vec<EmployeeCraneType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_driving_license: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_license_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_license_expiration: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            role: role.into(),
            phone_number: None,
            profile_picture_url: None,
            is_activated: None,
            crane_types: Vec::new(),
            has_driving_license: None,
            driving_license_category: None,
            driving_license_expiration: None,
        }
    }

    /// Missing activation status counts as active.
    pub fn is_active_employee(&self) -> bool {
        self.is_activated.unwrap_or(true)
    }
}

/// A conflicting task assignment that overlaps the requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConflict {
    pub task_id: i64,
    pub task_title: String,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflict_dates: Vec<DateTime<Utc>>,
}

/// Availability snapshot computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAvailability {
    pub is_available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflicting_tasks: Vec<TaskConflict>,
    #[serde(default)]
    pub work_hours_this_week: f64,
    #[serde(default)]
    pub work_hours_this_month: f64,
    #[serde(default)]
    pub max_weekly_hours: f64,
    #[serde(default)]
    pub next_available_date: Option<DateTime<Utc>>,
}

impl WorkerAvailability {
    /// Available with no conflicts or hours recorded.
    pub fn free() -> Self {
        Self {
            is_available: true,
            conflicting_tasks: Vec::new(),
            work_hours_this_week: 0.0,
            work_hours_this_month: 0.0,
            max_weekly_hours: 40.0,
            next_available_date: None,
        }
    }
}

/// A candidate worker for a task: employee, skills, certificates, availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableWorker {
    pub employee: Employee,
    #[serde(default)]
    pub availability: Option<WorkerAvailability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crane_types: Vec<CraneType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificates: Vec<WorkerCertificate>,
}

impl AvailableWorker {
    pub fn new(employee: Employee) -> Self {
        Self {
            employee,
            availability: None,
            crane_types: Vec::new(),
            certificates: Vec::new(),
        }
    }

    /// Builder: add crane-type skills.
    pub fn with_crane_types(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.crane_types
            .extend(ids.into_iter().map(|id| CraneType::new(id, format!("Type {id}"))));
        self
    }

    /// Builder: add a certificate record.
    pub fn with_certificate(mut self, certificate: WorkerCertificate) -> Self {
        self.certificates.push(certificate);
        self
    }

    /// Builder: set availability.
    pub fn with_availability(mut self, availability: WorkerAvailability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn employee_id(&self) -> i64 {
        self.employee.id
    }

    /// Unknown availability is treated as available.
    pub fn is_available(&self) -> bool {
        self.availability.as_ref().is_none_or(|a| a.is_available)
    }

    pub fn has_conflicts(&self) -> bool {
        self.availability
            .as_ref()
            .is_some_and(|a| !a.conflicting_tasks.is_empty())
    }
}

/// Response of the available-workers endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableWorkersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub workers: Vec<AvailableWorker>,
    #[serde(default)]
    pub total_available: usize,
    #[serde(default)]
    pub total_with_conflicts: usize,
}
