//! Create-task session: form state, validation and submission.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::api::{ChefApi, WorkerQuery, create_task_with_workers, equipment};
use crate::error::{ApiError, TaskError};
use crate::matching::{
    Compatibility, RequirementSet, WorkerAssignmentValidation, assemble_assignments, evaluate,
    validate_workers,
};
use crate::model::{
    AvailableWorker, CertificateType, CreateTaskRequest, DegradedFallback,
    EquipmentValidationResult, SelectedEquipment, Supervisor, SupervisorChoice,
    TaskCreationResult,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 255;

/// State behind the "new task" form.
///
/// Every mutation that changes requirements or the worker pool recomputes
/// compatibility before returning.
pub struct CreateTaskSession {
    api: Arc<dyn ChefApi>,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub supervisor: SupervisorChoice,
    supervisors: Vec<Supervisor>,
    certificate_catalog: Vec<CertificateType>,
    equipment: SelectedEquipment,
    /// Catalog check of `equipment`; cleared whenever the selection changes.
    equipment_validation: Option<EquipmentValidationResult>,
    certificates: Vec<CertificateType>,
    available_workers: Vec<AvailableWorker>,
    selected_workers: Vec<AvailableWorker>,
    requirements: RequirementSet,
    compatibility: Vec<Compatibility>,
}

impl CreateTaskSession {
    pub fn new(api: Arc<dyn ChefApi>, project_id: i64) -> Self {
        Self {
            api,
            project_id,
            title: String::new(),
            description: String::new(),
            deadline: None,
            supervisor: SupervisorChoice::None,
            supervisors: Vec::new(),
            certificate_catalog: Vec::new(),
            equipment: SelectedEquipment::default(),
            equipment_validation: None,
            certificates: Vec::new(),
            available_workers: Vec::new(),
            selected_workers: Vec::new(),
            requirements: RequirementSet::default(),
            compatibility: Vec::new(),
        }
    }

    // ── Field validation ──────────────────────────────────────────

    pub fn title_error(&self) -> Option<&'static str> {
        let len = self.title.trim().chars().count();
        if len > 0 && len < TITLE_MIN {
            Some("Task title must be at least 3 characters")
        } else if len > TITLE_MAX {
            Some("Task title must be less than 255 characters")
        } else {
            None
        }
    }

    pub fn supervisor_name_error(&self) -> Option<&'static str> {
        let SupervisorChoice::External { name, .. } = &self.supervisor else {
            return None;
        };
        let len = name.trim().chars().count();
        (len > 0 && len < 2).then_some("Name must be at least 2 characters")
    }

    pub fn supervisor_email_error(&self) -> Option<&'static str> {
        let SupervisorChoice::External { email, .. } = &self.supervisor else {
            return None;
        };
        let email = email.trim();
        (!email.is_empty() && !EMAIL_RE.is_match(email)).then_some("Please enter a valid email")
    }

    pub fn supervisor_phone_error(&self) -> Option<&'static str> {
        let SupervisorChoice::External { phone, .. } = &self.supervisor else {
            return None;
        };
        let len = phone.trim().chars().count();
        (len > 0 && len < 8).then_some("Please enter a valid phone number")
    }

    /// Shown while the internal supervisor has not been picked yet.
    pub fn supervisor_error(&self) -> Option<&'static str> {
        matches!(self.supervisor, SupervisorChoice::None).then_some("Please select a supervisor")
    }

    /// No crane type picked, or the last catalog check failed.
    pub fn equipment_error(&self) -> Option<&'static str> {
        if !self.equipment.has_selection() {
            return Some("Please select at least one crane type");
        }
        self.equipment_validation
            .and_then(|result| result.validation_errors().first().copied())
    }

    pub fn is_form_valid(&self) -> bool {
        self.are_fields_valid() && self.equipment_error().is_none()
    }

    fn are_fields_valid(&self) -> bool {
        let has_valid_title = !self.title.trim().is_empty() && self.title_error().is_none();
        let has_valid_supervisor = match &self.supervisor {
            SupervisorChoice::None => false,
            SupervisorChoice::Internal(_) => true,
            SupervisorChoice::External { name, email, phone } => {
                !name.trim().is_empty()
                    && !email.trim().is_empty()
                    && !phone.trim().is_empty()
                    && self.supervisor_name_error().is_none()
                    && self.supervisor_email_error().is_none()
                    && self.supervisor_phone_error().is_none()
            }
        };
        has_valid_title && has_valid_supervisor
    }

    // ── Loading ───────────────────────────────────────────────────

    /// Load internal supervisors.
    ///
    /// On failure the session keeps a placeholder list and the caller gets
    /// the degraded result to show; an internal selection is cleared.
    pub async fn load_supervisors(&mut self) -> Result<Vec<Supervisor>, DegradedFallback> {
        match self.api.fetch_supervisors(false).await {
            Ok(supervisors) => {
                tracing::debug!(count = supervisors.len(), "Supervisors loaded");
                self.supervisors = supervisors.clone();
                Ok(supervisors)
            }
            Err(e) => {
                let degraded = DegradedFallback::new(e.to_string());
                tracing::warn!(error = %e, "Failed to load supervisors, using fallback list");
                self.supervisors = degraded.fallback.clone();
                if matches!(self.supervisor, SupervisorChoice::Internal(_)) {
                    self.supervisor = SupervisorChoice::None;
                }
                Err(degraded)
            }
        }
    }

    pub fn supervisors(&self) -> &[Supervisor] {
        &self.supervisors
    }

    pub async fn load_certificate_types(&mut self) -> Result<&[CertificateType], ApiError> {
        self.certificate_catalog = self.api.fetch_certificate_types(true).await?;
        Ok(&self.certificate_catalog)
    }

    pub fn certificate_catalog(&self) -> &[CertificateType] {
        &self.certificate_catalog
    }

    /// Fetch candidate workers for the project, filtered by the selected crane types.
    pub async fn load_workers(&mut self, query: WorkerQuery) -> Result<usize, ApiError> {
        let query = if query.crane_types.is_empty() {
            query.with_crane_types(self.equipment.type_ids.iter().copied())
        } else {
            query
        };
        let response = self.api.fetch_project_workers(self.project_id, &query).await?;
        tracing::debug!(
            project_id = self.project_id,
            workers = response.workers.len(),
            available = response.total_available,
            "Project workers loaded"
        );
        self.available_workers = response.workers;
        self.recompute(Utc::now());
        Ok(self.available_workers.len())
    }

    pub fn available_workers(&self) -> &[AvailableWorker] {
        &self.available_workers
    }

    // ── Requirements and selection ────────────────────────────────

    pub fn set_equipment(&mut self, equipment: SelectedEquipment) {
        if equipment != self.equipment {
            self.equipment_validation = None;
        }
        self.equipment = equipment;
        self.recompute(Utc::now());
    }

    pub fn equipment(&self) -> &SelectedEquipment {
        &self.equipment
    }

    /// Check the selection against the live catalog and keep the verdict.
    pub async fn validate_equipment(&mut self) -> Result<EquipmentValidationResult, ApiError> {
        let result = equipment::validate_selection(self.api.as_ref(), &self.equipment).await?;
        self.equipment_validation = Some(result);
        Ok(result)
    }

    pub fn equipment_validation(&self) -> Option<&EquipmentValidationResult> {
        self.equipment_validation.as_ref()
    }

    /// Require the certificates the selected crane category demands.
    ///
    /// Without a category the current certificate list is kept.
    pub async fn load_category_certificates(&mut self) -> Result<&[CertificateType], ApiError> {
        if let Some(category_id) = self.equipment.category_id {
            let certificates = self.api.fetch_category_certificates(category_id).await?;
            tracing::debug!(category_id, count = certificates.len(), "Category certificates loaded");
            self.set_certificates(certificates);
        }
        Ok(&self.certificates)
    }

    pub fn set_certificates(&mut self, certificates: Vec<CertificateType>) {
        self.certificates = certificates;
        self.recompute(Utc::now());
    }

    pub fn certificates(&self) -> &[CertificateType] {
        &self.certificates
    }

    /// Add a worker; a worker already selected (by employee id) is ignored.
    pub fn add_worker(&mut self, worker: AvailableWorker) -> bool {
        if self
            .selected_workers
            .iter()
            .any(|w| w.employee_id() == worker.employee_id())
        {
            return false;
        }
        self.selected_workers.push(worker);
        self.recompute(Utc::now());
        true
    }

    pub fn remove_worker(&mut self, employee_id: i64) -> bool {
        let before = self.selected_workers.len();
        self.selected_workers.retain(|w| w.employee_id() != employee_id);
        let removed = self.selected_workers.len() != before;
        if removed {
            self.recompute(Utc::now());
        }
        removed
    }

    pub fn selected_workers(&self) -> &[AvailableWorker] {
        &self.selected_workers
    }

    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    /// Rebuild requirements and re-evaluate every known worker at `now`.
    pub fn recompute(&mut self, now: DateTime<Utc>) {
        self.requirements = RequirementSet::from_selection(&self.equipment, &self.certificates);
        self.compatibility = self
            .candidates()
            .map(|w| evaluate(w, &self.requirements, now))
            .collect();
    }

    /// Loaded workers, then selected workers not in the loaded list.
    fn candidates(&self) -> impl Iterator<Item = &AvailableWorker> {
        let extra = self.selected_workers.iter().filter(|s| {
            !self
                .available_workers
                .iter()
                .any(|a| a.employee_id() == s.employee_id())
        });
        self.available_workers.iter().chain(extra)
    }

    pub fn compatibility(&self) -> &[Compatibility] {
        &self.compatibility
    }

    pub fn compatible_workers(&self) -> Vec<&AvailableWorker> {
        self.partition_candidates(true)
    }

    pub fn incompatible_workers(&self) -> Vec<&AvailableWorker> {
        self.partition_candidates(false)
    }

    fn partition_candidates(&self, eligible: bool) -> Vec<&AvailableWorker> {
        self.candidates()
            .zip(&self.compatibility)
            .filter(|(_, c)| c.is_eligible() == eligible)
            .map(|(w, _)| w)
            .collect()
    }

    pub fn validate_selected_workers(&self, now: DateTime<Utc>) -> WorkerAssignmentValidation {
        validate_workers(&self.selected_workers, &self.requirements, now)
    }

    // ── Submission ────────────────────────────────────────────────

    /// Build the request body from the current form.
    pub fn build_request(&self) -> CreateTaskRequest {
        let description = self.description.trim();
        let mut request = CreateTaskRequest {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            deadline: self.deadline,
            required_crane_types: (!self.equipment.type_ids.is_empty())
                .then(|| self.equipment.type_ids.clone()),
            preferred_crane_model_id: self.equipment.model_id,
            equipment_category_id: self.equipment.category_id,
            equipment_brand_id: self.equipment.brand_id,
            required_certificates: (!self.certificates.is_empty())
                .then(|| self.certificates.iter().map(|c| c.id).collect()),
            ..Default::default()
        };

        match &self.supervisor {
            SupervisorChoice::None => {}
            SupervisorChoice::Internal(s) => {
                request.supervisor_id = Some(s.id);
                request.supervisor_name = Some(s.name.clone());
                request.supervisor_email = Some(s.email.clone());
                request.supervisor_phone = s.phone_number.clone();
            }
            SupervisorChoice::External { name, email, phone } => {
                request.supervisor_name = Some(name.trim().to_string());
                request.supervisor_email = Some(email.trim().to_string());
                request.supervisor_phone = Some(phone.trim().to_string());
            }
        }
        request
    }

    /// Validate, then create the task and assign the selected workers.
    ///
    /// A selection already checked with [`Self::validate_equipment`] must have passed.
    pub async fn create_task(&self) -> Result<TaskCreationResult, TaskError> {
        if !self.are_fields_valid() {
            return Err(TaskError::validation(
                "Validation Error",
                "Please correct the errors in the form.",
            ));
        }
        let invalid_supervisor = match &self.supervisor {
            SupervisorChoice::Internal(supervisor) => !supervisor.can_supervise(),
            _ => false,
        };
        if invalid_supervisor {
            return Err(TaskError::validation(
                "Invalid Supervisor",
                "Please select a valid supervisor (byggeleder or chef) from the list.",
            ));
        }
        if let Some(error) = self.equipment_error() {
            return Err(TaskError::validation("Equipment Required", error));
        }

        let now = Utc::now();
        let requirements = RequirementSet::from_selection(&self.equipment, &self.certificates);
        if !self.selected_workers.is_empty() {
            let validation = validate_workers(&self.selected_workers, &requirements, now);
            if validation.has_issues() {
                tracing::warn!(issues = %validation.issues_summary(), "Worker validation issues");
            }
            if !validation.can_proceed() {
                return Err(TaskError::validation(
                    "Worker Assignment Error",
                    validation.issues_summary(),
                ));
            }
        }

        let request = self.build_request();
        let assignments = assemble_assignments(&self.selected_workers, &requirements, now);
        tracing::info!(
            project_id = self.project_id,
            title = %request.title,
            external_supervisor = self.supervisor.is_external(),
            workers = assignments.len(),
            "Creating task"
        );

        let result = create_task_with_workers(self.api.as_ref(), self.project_id, &request, &assignments)
            .await
            .map_err(|e| TaskError::Api {
                message: e.task_creation_message(),
                source: e,
            })?;

        if result.is_fully_successful() {
            tracing::info!(task_id = result.task.id, "{}", result.success_message());
        } else {
            tracing::warn!(
                task_id = result.task.id,
                errors = ?result.assignment_errors,
                "{}",
                result.success_message()
            );
        }
        Ok(result)
    }
}
