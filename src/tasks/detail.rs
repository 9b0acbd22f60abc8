//! Task-detail session: current assignments, compatibility, add/remove workers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::api::{ChefApi, WorkerQuery};
use crate::error::{ApiError, TaskError};
use crate::matching::{
    Compatibility, RequirementSet, WorkerProfile, assemble_assignments, evaluate,
};
use crate::model::{
    AvailableWorker, CertificateValidationResponse, DeleteAssignmentResponse, Employee,
    ProjectTask, TaskAssignmentDetail,
};

/// Compatibility of one current assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub compatibility: Compatibility,
}

/// A loaded task with its assignments.
///
/// Assignments are fetched once on load and then kept in step with this
/// session's own mutations. Changes made elsewhere are not merged back; the
/// last write wins.
pub struct TaskDetailSession {
    api: Arc<dyn ChefApi>,
    task: ProjectTask,
    requirements: RequirementSet,
    assignments: Vec<TaskAssignmentDetail>,
    /// Skill profile per assigned employee id.
    profiles: HashMap<i64, AvailableWorker>,
    available_workers: Vec<AvailableWorker>,
    selected: Vec<AvailableWorker>,
    now: DateTime<Utc>,
}

impl TaskDetailSession {
    /// Fetch the task, its assignments and certificate requirements.
    ///
    /// Worker certificates are only fetched when the task requires any.
    pub async fn load(
        api: Arc<dyn ChefApi>,
        task_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let task = api.fetch_task(task_id).await.map_err(TaskError::api)?;
        let raw_assignments = api
            .fetch_task_assignments(task_id)
            .await
            .map_err(TaskError::api)?;
        let certificates = api
            .fetch_task_certificates(task_id)
            .await
            .map_err(TaskError::api)?;
        let requirements = RequirementSet::from_task(&task, &certificates);

        let assignments: Vec<TaskAssignmentDetail> = raw_assignments
            .into_iter()
            .map(|raw| {
                TaskAssignmentDetail::from_assignment(raw.clone()).unwrap_or_else(|| {
                    let employee_id = raw.employee_id;
                    tracing::warn!(assignment_id = raw.id, employee_id, "Assignment without employee record");
                    TaskAssignmentDetail {
                        employee: Employee::new(employee_id, format!("Employee #{employee_id}"), "arbejder"),
                        crane_model: raw.crane_model.clone(),
                        availability: None,
                        assignment: raw,
                    }
                })
            })
            .collect();

        let certificates_per_worker = if requirements.certificates.is_empty() {
            vec![Vec::new(); assignments.len()]
        } else {
            try_join_all(
                assignments
                    .iter()
                    .map(|d| api.fetch_worker_certificates(d.assignment.employee_id)),
            )
            .await
            .map_err(TaskError::api)?
        };

        let profiles: HashMap<i64, AvailableWorker> = assignments
            .iter()
            .zip(certificates_per_worker)
            .map(|(detail, certificates)| {
                let mut profile = AvailableWorker::new(detail.employee.clone());
                profile.certificates = certificates;
                (detail.assignment.employee_id, profile)
            })
            .collect();

        tracing::debug!(
            task_id,
            assignments = assignments.len(),
            crane_types = requirements.crane_types.len(),
            certificates = requirements.certificates.len(),
            "Task detail loaded"
        );

        Ok(Self {
            api,
            task,
            requirements,
            assignments,
            profiles,
            available_workers: Vec::new(),
            selected: Vec::new(),
            now,
        })
    }

    pub fn task(&self) -> &ProjectTask {
        &self.task
    }

    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    pub fn assignments(&self) -> &[TaskAssignmentDetail] {
        &self.assignments
    }

    /// Move the evaluation clock, e.g. when a long-lived view refreshes.
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Compatibility of each current assignment, in assignment order.
    pub fn compatibility_rows(&self) -> Vec<AssignmentRow> {
        self.assignments
            .iter()
            .map(|detail| {
                let employee_id = detail.assignment.employee_id;
                let compatibility = match self.profiles.get(&employee_id) {
                    Some(profile) => evaluate(profile, &self.requirements, self.now),
                    None => evaluate(&detail.employee, &self.requirements, self.now),
                };
                AssignmentRow {
                    assignment_id: detail.assignment.id,
                    employee_id,
                    employee_name: detail.employee.name.clone(),
                    compatibility,
                }
            })
            .collect()
    }

    // ── Adding workers ────────────────────────────────────────────

    /// Candidates for this task, filtered by its crane types.
    pub async fn load_available_workers(&mut self, query: WorkerQuery) -> Result<usize, ApiError> {
        let query = if query.crane_types.is_empty() {
            query.with_crane_types(self.requirements.crane_types.iter().copied())
        } else {
            query
        };
        let response = self.api.fetch_available_workers(self.task.id, &query).await?;
        self.available_workers = response.workers;
        Ok(self.available_workers.len())
    }

    pub fn available_workers(&self) -> &[AvailableWorker] {
        &self.available_workers
    }

    /// Compatibility of each loaded candidate.
    pub fn candidate_compatibility(&self) -> Vec<Compatibility> {
        self.available_workers
            .iter()
            .map(|w| evaluate(w, &self.requirements, self.now))
            .collect()
    }

    /// Ask the backend to check a worker's certificates against this task.
    ///
    /// Complements [`Self::candidate_compatibility`] with the server's own
    /// verdict, which also reports certificates expiring soon.
    pub async fn server_certificate_check(
        &self,
        employee_id: i64,
    ) -> Result<CertificateValidationResponse, ApiError> {
        let verdict = self
            .api
            .validate_worker_certificates(employee_id, self.task.id)
            .await?;
        tracing::debug!(
            task_id = self.task.id,
            employee_id,
            can_assign = verdict.can_assign_to_task(),
            "{}",
            verdict.summary()
        );
        Ok(verdict)
    }

    fn is_assigned(&self, employee_id: i64) -> bool {
        self.assignments
            .iter()
            .any(|a| a.assignment.employee_id == employee_id)
    }

    /// Queue a worker for assignment. Already queued or assigned workers are ignored.
    pub fn select_worker(&mut self, worker: AvailableWorker) -> bool {
        let id = worker.worker_id();
        if self.is_assigned(id) || self.selected.iter().any(|w| w.worker_id() == id) {
            return false;
        }
        self.selected.push(worker);
        true
    }

    pub fn deselect_worker(&mut self, employee_id: i64) -> bool {
        let before = self.selected.len();
        self.selected.retain(|w| w.worker_id() != employee_id);
        self.selected.len() != before
    }

    pub fn selected_workers(&self) -> &[AvailableWorker] {
        &self.selected
    }

    /// Assign every queued worker; returns how many the server assigned.
    ///
    /// On failure nothing changes locally and the selection is kept.
    pub async fn assign_selected_workers(&mut self) -> Result<usize, TaskError> {
        if self.selected.is_empty() {
            return Ok(0);
        }

        let requests = assemble_assignments(&self.selected, &self.requirements, self.now);
        let created = self
            .api
            .assign_workers(self.task.id, &requests)
            .await
            .map_err(|e| TaskError::Api {
                message: format!("Failed to assign workers: {e}"),
                source: e,
            })?;

        let count = created.len();
        for assignment in created {
            let Some(worker) = self
                .selected
                .iter()
                .find(|w| w.worker_id() == assignment.employee_id)
                .cloned()
            else {
                tracing::warn!(
                    assignment_id = assignment.id,
                    employee_id = assignment.employee_id,
                    "Server created an assignment for a worker that was not selected"
                );
                continue;
            };
            self.assignments.push(TaskAssignmentDetail {
                crane_model: assignment.crane_model.clone(),
                employee: worker.employee.clone(),
                availability: worker.availability.clone(),
                assignment,
            });
            self.profiles.insert(worker.worker_id(), worker);
        }
        self.selected.clear();

        tracing::info!(task_id = self.task.id, count, "Workers assigned to task");
        Ok(count)
    }

    // ── Removing workers ──────────────────────────────────────────

    pub async fn remove_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse, TaskError> {
        let Some(index) = self
            .assignments
            .iter()
            .position(|a| a.assignment.id == assignment_id)
        else {
            return Err(TaskError::AssignmentNotFound { assignment_id });
        };

        let response = self
            .api
            .remove_assignment(assignment_id)
            .await
            .map_err(|e| TaskError::Api {
                message: e.assignment_removal_message(),
                source: e,
            })?;

        let removed = self.assignments.remove(index);
        let employee_id = removed.assignment.employee_id;
        if !self.is_assigned(employee_id) {
            self.profiles.remove(&employee_id);
        }
        tracing::info!(
            assignment_id,
            employee = %removed.employee.name,
            "Worker removed from task"
        );
        Ok(response)
    }
}
