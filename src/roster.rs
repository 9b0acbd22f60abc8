//! Roster flows: filtering the worker list and onboarding new workers.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use regex::Regex;

use crate::api::{ChefApi, RosterQuery};
use crate::error::{ApiError, TaskError};
use crate::model::{
    CreateWorkerCertificateRequest, CreateWorkerRequest, DeleteWorkerResponse, EmploymentType,
    RosterWorker, UpdateWorkerRequest, WorkerCertificate, WorkerRole, WorkerStatus,
};

/// Page size of the server-side roster search.
const SEARCH_PAGE: u32 = 20;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Client-side roster filter. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterFilter {
    /// Case-insensitive match on name, email or phone.
    pub search: String,
    pub statuses: BTreeSet<WorkerStatus>,
    pub employment_types: BTreeSet<EmploymentType>,
    pub roles: BTreeSet<WorkerRole>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    /// Only workers with at least one active task.
    pub with_active_tasks: bool,
}

impl RosterFilter {
    pub fn matches(&self, worker: &RosterWorker) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || worker.name.to_lowercase().contains(&needle)
            || worker.email.to_lowercase().contains(&needle)
            || worker
                .phone
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&needle));

        matches_search
            && (self.statuses.is_empty() || self.statuses.contains(&worker.status))
            && (self.employment_types.is_empty()
                || self.employment_types.contains(&worker.employment_type))
            && (self.roles.is_empty() || self.roles.contains(&worker.role))
            && self.min_rate.is_none_or(|min| worker.hourly_rate >= min)
            && self.max_rate.is_none_or(|max| worker.hourly_rate <= max)
            && (!self.with_active_tasks || worker.active_tasks() > 0)
    }

    /// Matching workers, sorted by name.
    pub fn apply(&self, workers: &[RosterWorker]) -> Vec<RosterWorker> {
        let mut matched: Vec<RosterWorker> =
            workers.iter().filter(|w| self.matches(w)).cloned().collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        matched
    }
}

/// The chef's worker list, kept in step with this session's own edits.
pub struct RosterSession {
    api: Arc<dyn ChefApi>,
    workers: Vec<RosterWorker>,
    pub filter: RosterFilter,
}

impl RosterSession {
    pub fn new(api: Arc<dyn ChefApi>) -> Self {
        Self {
            api,
            workers: Vec::new(),
            filter: RosterFilter::default(),
        }
    }

    pub async fn load(&mut self, query: &RosterQuery) -> Result<usize, ApiError> {
        self.workers = self.api.fetch_workers(query).await?;
        tracing::debug!(workers = self.workers.len(), "Roster loaded");
        Ok(self.workers.len())
    }

    /// Replace the list with the first page of a server-side search.
    pub async fn search(&mut self, text: &str) -> Result<usize, ApiError> {
        let response = self.api.search_workers(text, SEARCH_PAGE, 0).await?;
        tracing::debug!(
            found = response.total_count,
            has_more = response.has_more,
            "Roster search"
        );
        self.workers = response.workers;
        Ok(self.workers.len())
    }

    pub fn workers(&self) -> &[RosterWorker] {
        &self.workers
    }

    pub fn worker(&self, worker_id: i64) -> Option<&RosterWorker> {
        self.workers.iter().find(|w| w.id == worker_id)
    }

    /// Loaded workers passing `filter`, by name.
    pub fn visible_workers(&self) -> Vec<RosterWorker> {
        self.filter.apply(&self.workers)
    }

    fn replace(&mut self, updated: RosterWorker) {
        match self.workers.iter_mut().find(|w| w.id == updated.id) {
            Some(slot) => *slot = updated,
            None => self.workers.push(updated),
        }
    }

    pub async fn update_worker(
        &mut self,
        worker_id: i64,
        request: &UpdateWorkerRequest,
    ) -> Result<&RosterWorker, ApiError> {
        let updated = self.api.update_worker(worker_id, request).await?;
        self.replace(updated);
        self.worker(worker_id).ok_or(ApiError::InvalidResponse)
    }

    pub async fn set_status(
        &mut self,
        worker_id: i64,
        status: WorkerStatus,
    ) -> Result<&RosterWorker, ApiError> {
        let updated = self.api.update_worker_status(worker_id, status).await?;
        self.replace(updated);
        self.worker(worker_id).ok_or(ApiError::InvalidResponse)
    }

    /// Delete a worker; the local row goes only once the server confirms.
    pub async fn delete_worker(&mut self, worker_id: i64) -> Result<DeleteWorkerResponse, ApiError> {
        let response = self.api.delete_worker(worker_id).await?;
        if response.success {
            self.workers.retain(|w| w.id != worker_id);
        } else {
            tracing::warn!(worker_id, message = %response.message, "Worker deletion refused");
        }
        Ok(response)
    }

    /// Onboard a worker and add the result to the list.
    pub async fn add_worker(
        &mut self,
        request: CreateWorkerRequest,
        certificates: Vec<CreateWorkerCertificateRequest>,
    ) -> Result<WorkerOnboarding, TaskError> {
        let onboarding = onboard_worker(self.api.as_ref(), request, certificates).await?;
        self.replace(onboarding.worker.clone());
        Ok(onboarding)
    }
}

/// Fields that keep a new-worker form from being submitted.
pub fn worker_form_errors(request: &CreateWorkerRequest) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if request.name.trim().is_empty() {
        errors.push("Name is required");
    }
    let email = request.email.trim();
    if email.is_empty() {
        errors.push("Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.push("Please enter a valid email address");
    }
    if request.hourly_rate.is_nan() || request.hourly_rate <= 0.0 {
        errors.push("Hourly rate must be greater than zero");
    }
    errors
}

/// Outcome of onboarding one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOnboarding {
    pub worker: RosterWorker,
    pub certificates: Vec<WorkerCertificate>,
    pub certificate_errors: Vec<String>,
}

impl WorkerOnboarding {
    pub fn is_fully_successful(&self) -> bool {
        self.certificate_errors.is_empty()
    }

    pub fn success_message(&self) -> &'static str {
        if !self.is_fully_successful() {
            "Worker created but some certificates failed to add. You can add them later from the worker details."
        } else if self.certificates.is_empty() {
            "Worker created successfully!"
        } else {
            "Worker and certificates created successfully!"
        }
    }
}

/// Create a roster worker, then add its certificates concurrently.
///
/// Each certificate's `employee_id` is replaced with the new worker's id.
/// Once the worker exists, certificate failures are reported in the result
/// rather than failing the whole operation.
pub async fn onboard_worker(
    api: &dyn ChefApi,
    request: CreateWorkerRequest,
    certificates: Vec<CreateWorkerCertificateRequest>,
) -> Result<WorkerOnboarding, TaskError> {
    let request = request.normalized();
    if let Some(first) = worker_form_errors(&request).first() {
        return Err(TaskError::validation("Validation Error", *first));
    }

    let worker = api
        .create_worker(&request)
        .await
        .map_err(|e| TaskError::Api {
            message: e.worker_creation_message(),
            source: e,
        })?;

    let requests: Vec<CreateWorkerCertificateRequest> = certificates
        .into_iter()
        .map(|mut c| {
            c.employee_id = worker.id;
            c
        })
        .collect();
    let results = join_all(
        requests
            .iter()
            .map(|c| api.add_worker_certificate(worker.id, c)),
    )
    .await;

    let mut added = Vec::new();
    let mut certificate_errors = Vec::new();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(response) if response.success => added.extend(response.certificate),
            Ok(response) => certificate_errors.push(format!("{}: {}", request.skill_name, response.message)),
            Err(e) => certificate_errors.push(format!("{}: {e}", request.skill_name)),
        }
    }
    if !certificate_errors.is_empty() {
        tracing::warn!(
            worker_id = worker.id,
            failed = certificate_errors.len(),
            "Worker created but some certificates were not added"
        );
    }

    Ok(WorkerOnboarding {
        worker,
        certificates: added,
        certificate_errors,
    })
}
