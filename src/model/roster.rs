//! Worker roster: the company's own employees as the chef manages them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::certificate::WorkerCertificate;
use super::null_as_default;

/// Employment status; wire values are Danish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Aktiv,
    Inaktiv,
    Sygemeldt,
    Ferie,
    Opsagt,
}

impl WorkerStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Aktiv => "Active",
            Self::Inaktiv => "Inactive",
            Self::Sygemeldt => "Sick Leave",
            Self::Ferie => "Vacation",
            Self::Opsagt => "Terminated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FuldTid,
    Deltid,
    Timebaseret,
    Freelancer,
    Praktikant,
}

impl EmploymentType {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FuldTid => "Full-time",
            Self::Deltid => "Part-time",
            Self::Timebaseret => "Hourly",
            Self::Freelancer => "Freelancer",
            Self::Praktikant => "Intern",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    #[default]
    Arbejder,
    Byggeleder,
}

impl WorkerRole {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Arbejder => "Worker",
            Self::Byggeleder => "Site Manager",
        }
    }
}

/// Headline numbers included when the roster is fetched with stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerQuickStats {
    #[serde(default)]
    pub hours_this_week: Option<f64>,
    #[serde(default)]
    pub hours_this_month: Option<f64>,
    #[serde(default)]
    pub active_tasks: Option<i64>,
    #[serde(default)]
    pub completed_tasks: Option<i64>,
    #[serde(default)]
    pub total_tasks: Option<i64>,
    #[serde(default)]
    pub approval_rate: Option<f64>,
    #[serde(default)]
    pub last_timesheet_date: Option<DateTime<Utc>>,
}

impl WorkerQuickStats {
    /// Completed over total tasks; zero when either is unknown.
    pub fn task_completion_rate(&self) -> f64 {
        match (self.completed_tasks, self.total_tasks) {
            (Some(done), Some(total)) if total > 0 => done as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterWorker {
    #[serde(rename = "employee_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub hourly_rate: f64,
    pub employment_type: EmploymentType,
    /// Older backends omit the role; those rows are plain workers.
    #[serde(default)]
    pub role: WorkerRole,
    pub status: WorkerStatus,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stats: Option<WorkerQuickStats>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificates: Vec<WorkerCertificate>,
}

impl RosterWorker {
    pub fn is_active(&self) -> bool {
        self.status == WorkerStatus::Aktiv
    }

    /// First letters of the first two name parts.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect()
    }

    pub fn active_tasks(&self) -> i64 {
        self.stats
            .as_ref()
            .and_then(|s| s.active_tasks)
            .unwrap_or_default()
    }
}

/// Response of the roster search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkerSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub workers: Vec<RosterWorker>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body of `POST /workers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkerRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub hourly_rate: f64,
    pub employment_type: EmploymentType,
    pub role: WorkerRole,
    pub status: WorkerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateWorkerRequest {
    /// Active full-time worker with only the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            hourly_rate,
            employment_type: EmploymentType::FuldTid,
            role: WorkerRole::Arbejder,
            status: WorkerStatus::Aktiv,
            hire_date: None,
            notes: None,
        }
    }

    /// Trim text fields, lowercase the email and drop blank optionals.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = blank_to_none(self.phone);
        self.address = blank_to_none(self.address);
        self.notes = blank_to_none(self.notes);
        self
    }
}

/// Body of `PUT /workers/{id}`; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWorkerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<WorkerRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteWorkerResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub worker_id: Option<i64>,
}
