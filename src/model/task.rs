//! Tasks, assignments and the request/response bodies around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::crane::CraneModel;
use super::null_as_default;
use super::worker::{Employee, WorkerAvailability};

/// A task inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    #[serde(rename = "task_id")]
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub supervisor_id: Option<i64>,
    #[serde(default)]
    pub supervisor_name: Option<String>,
    #[serde(default)]
    pub supervisor_email: Option<String>,
    #[serde(default)]
    pub supervisor_phone: Option<String>,
    #[serde(default = "super::default_true", rename = "isActive", alias = "is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_crane_types: Vec<i64>,
    #[serde(default)]
    pub preferred_crane_model_id: Option<i64>,
    #[serde(default)]
    pub equipment_category_id: Option<i64>,
    #[serde(default)]
    pub equipment_brand_id: Option<i64>,
}

/// Body of `POST /projects/{id}/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_crane_types: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_crane_model_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_brand_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_certificates: Option<Vec<i64>>,
}

/// A worker assigned to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    #[serde(rename = "assignment_id")]
    pub id: i64,
    pub task_id: i64,
    pub employee_id: i64,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub crane_model_id: Option<i64>,
    #[serde(default, alias = "Employees", skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(default, alias = "CraneModel", skip_serializing_if = "Option::is_none")]
    pub crane_model: Option<CraneModel>,
}

/// One entry of a bulk assignment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskAssignmentRequest {
    pub employee_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crane_model_id: Option<i64>,
    pub skip_certificate_validation: bool,
    pub skip_crane_type_validation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /task-assignments` in bulk mode.
#[derive(Debug, Clone, Serialize)]
pub struct TaskAssignmentBulkRequest<'a> {
    pub task_id: i64,
    pub assignments: &'a [CreateTaskAssignmentRequest],
}

/// Response of a bulk assignment; per-worker failures land in `errors`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskAssignmentBulkResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_assignments: Vec<TaskAssignment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

/// Response of `DELETE /task-assignments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAssignmentResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub task_title: Option<String>,
}

/// Assignment joined with the worker it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignmentDetail {
    pub assignment: TaskAssignment,
    pub employee: Employee,
    pub crane_model: Option<CraneModel>,
    pub availability: Option<WorkerAvailability>,
}

impl TaskAssignmentDetail {
    /// Join using the employee embedded in the assignment, if the backend sent one.
    pub fn from_assignment(assignment: TaskAssignment) -> Option<Self> {
        let employee = assignment.employee.clone()?;
        let crane_model = assignment.crane_model.clone();
        Some(Self {
            assignment,
            employee,
            crane_model,
            availability: None,
        })
    }
}

/// Outcome of creating a task and then assigning workers to it.
#[derive(Debug, Clone)]
pub struct TaskCreationResult {
    pub task: ProjectTask,
    pub assignments: Vec<TaskAssignment>,
    pub assignment_errors: Vec<String>,
}

impl TaskCreationResult {
    pub fn is_fully_successful(&self) -> bool {
        self.assignment_errors.is_empty()
    }

    pub fn has_partial_failure(&self) -> bool {
        !self.assignment_errors.is_empty() && !self.assignments.is_empty()
    }

    pub fn success_message(&self) -> String {
        let title = &self.task.title;
        if self.is_fully_successful() {
            if self.assignments.is_empty() {
                format!("Task '{title}' created successfully.")
            } else {
                format!(
                    "Task '{title}' created with {} workers assigned.",
                    self.assignments.len()
                )
            }
        } else if self.has_partial_failure() {
            format!("Task '{title}' created but some worker assignments failed.")
        } else {
            format!("Task '{title}' created but no workers could be assigned.")
        }
    }
}
