//! In-memory `ChefApi` for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ChefApi, RosterQuery, WorkerQuery};
use crate::error::ApiError;
use crate::model::{
    AvailableWorker, AvailableWorkersResponse, CertificateDeleteResponse,
    CertificateMutationResponse, CertificateType, CertificateValidationResponse, CraneCategory,
    CraneModel, CraneType, CreateTaskAssignmentRequest, CreateTaskRequest,
    CreateWorkerCertificateRequest, CreateWorkerRequest, DeleteAssignmentResponse,
    DeleteWorkerDocumentResponse, DeleteWorkerResponse, DocumentCategory, DocumentUpload,
    Employee, EmploymentType, ProjectTask, RosterWorker, Supervisor, TaskAssignment,
    TaskCertificateRequirements, UpdateWorkerCertificateRequest, UpdateWorkerRequest,
    UploadWorkerDocumentResponse, WorkerCertificate, WorkerDocument, WorkerDocumentsResponse,
    WorkerRole, WorkerSearchResponse, WorkerStatus,
};

fn server(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message.to_string(),
    }
}

/// Endpoints the unit tests never reach; the HTTP tests cover them.
fn not_stubbed(operation: &str) -> ApiError {
    ApiError::Unsupported(format!("{operation} is not stubbed"))
}

pub(crate) fn task(id: i64, project_id: i64, title: &str) -> ProjectTask {
    ProjectTask {
        id,
        project_id,
        title: title.to_string(),
        description: None,
        deadline: None,
        supervisor_id: None,
        supervisor_name: None,
        supervisor_email: None,
        supervisor_phone: None,
        is_active: true,
        created_at: None,
        required_crane_types: Vec::new(),
        preferred_crane_model_id: None,
        equipment_category_id: None,
        equipment_brand_id: None,
    }
}

pub(crate) fn assignment(id: i64, task_id: i64, employee: Employee) -> TaskAssignment {
    TaskAssignment {
        id,
        task_id,
        employee_id: employee.id,
        assigned_at: None,
        crane_model_id: None,
        employee: Some(employee),
        crane_model: None,
    }
}

pub(crate) fn roster_worker(id: i64, name: &str, status: WorkerStatus, hourly_rate: f64) -> RosterWorker {
    RosterWorker {
        id,
        name: name.to_string(),
        email: format!("w{id}@ksrcranes.dk"),
        phone: None,
        address: None,
        hourly_rate,
        employment_type: EmploymentType::FuldTid,
        role: WorkerRole::Arbejder,
        status,
        profile_picture_url: None,
        created_at: Utc::now(),
        last_active: None,
        stats: None,
        certificates: Vec::new(),
    }
}

#[derive(Default)]
pub(crate) struct StubApi {
    pub task: Option<ProjectTask>,
    pub assignments: Vec<TaskAssignment>,
    pub task_certificates: TaskCertificateRequirements,
    /// `None` makes the supervisor fetch fail.
    pub supervisors: Option<Vec<Supervisor>>,
    pub certificate_types: Vec<CertificateType>,
    pub worker_certificates: HashMap<i64, Vec<WorkerCertificate>>,
    pub workers: Vec<AvailableWorker>,
    pub crane_types: Vec<CraneType>,
    pub crane_models: Vec<CraneModel>,
    pub crane_categories: Vec<CraneCategory>,
    pub category_certificates: HashMap<i64, Vec<CertificateType>>,
    /// Server verdicts per worker id; missing workers get a 404.
    pub certificate_validations: HashMap<i64, CertificateValidationResponse>,
    /// Certificate type the backend refuses to add.
    pub reject_certificate_type: Option<i64>,
    pub roster: Mutex<Vec<RosterWorker>>,
    pub added_certificates: Mutex<Vec<CreateWorkerCertificateRequest>>,
    pub fail_create: Option<u16>,
    pub fail_assign: Option<u16>,
    pub fail_remove: Option<u16>,
    pub created: Mutex<Vec<CreateTaskRequest>>,
    pub assigned: Mutex<Vec<CreateTaskAssignmentRequest>>,
    pub removed: Mutex<Vec<i64>>,
}

#[async_trait]
impl ChefApi for StubApi {
    async fn fetch_task(&self, task_id: i64) -> Result<ProjectTask, ApiError> {
        self.task
            .clone()
            .filter(|t| t.id == task_id)
            .ok_or_else(|| server(404, "Task not found"))
    }

    async fn fetch_task_assignments(&self, task_id: i64) -> Result<Vec<TaskAssignment>, ApiError> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn fetch_task_certificates(
        &self,
        _task_id: i64,
    ) -> Result<TaskCertificateRequirements, ApiError> {
        Ok(self.task_certificates.clone())
    }

    async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<ProjectTask, ApiError> {
        if let Some(status) = self.fail_create {
            return Err(server(status, "create failed"));
        }
        self.created.lock().unwrap().push(request.clone());
        let mut created = task(500, project_id, &request.title);
        created.description = request.description.clone();
        created.supervisor_id = request.supervisor_id;
        created.required_crane_types = request.required_crane_types.clone().unwrap_or_default();
        created.preferred_crane_model_id = request.preferred_crane_model_id;
        Ok(created)
    }

    async fn assign_workers(
        &self,
        task_id: i64,
        assignments: &[CreateTaskAssignmentRequest],
    ) -> Result<Vec<TaskAssignment>, ApiError> {
        if let Some(status) = self.fail_assign {
            return Err(server(status, "assign failed"));
        }
        self.assigned.lock().unwrap().extend_from_slice(assignments);
        Ok(assignments
            .iter()
            .map(|req| {
                let employee = Employee::new(req.employee_id, format!("Worker {}", req.employee_id), "arbejder");
                let mut created = assignment(1000 + req.employee_id, task_id, employee);
                created.crane_model_id = req.crane_model_id;
                created
            })
            .collect())
    }

    async fn remove_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse, ApiError> {
        if let Some(status) = self.fail_remove {
            return Err(server(status, "remove failed"));
        }
        self.removed.lock().unwrap().push(assignment_id);
        Ok(DeleteAssignmentResponse {
            success: true,
            message: "Worker removed from task".to_string(),
            employee_name: None,
            task_title: None,
        })
    }

    async fn fetch_available_workers(
        &self,
        _task_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        self.fetch_project_workers(0, query).await
    }

    async fn fetch_project_workers(
        &self,
        _project_id: i64,
        _query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        Ok(AvailableWorkersResponse {
            workers: self.workers.clone(),
            total_available: self.workers.iter().filter(|w| w.is_available()).count(),
            total_with_conflicts: self.workers.iter().filter(|w| w.has_conflicts()).count(),
        })
    }

    async fn fetch_supervisors(&self, _include_external: bool) -> Result<Vec<Supervisor>, ApiError> {
        self.supervisors
            .clone()
            .ok_or_else(|| server(503, "Supervisor service unavailable"))
    }

    async fn fetch_certificate_types(
        &self,
        only_active: bool,
    ) -> Result<Vec<CertificateType>, ApiError> {
        Ok(self
            .certificate_types
            .iter()
            .filter(|t| !only_active || t.is_active)
            .cloned()
            .collect())
    }

    async fn fetch_worker_certificates(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerCertificate>, ApiError> {
        Ok(self
            .worker_certificates
            .get(&worker_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_crane_types(&self, category_id: Option<i64>) -> Result<Vec<CraneType>, ApiError> {
        Ok(self
            .crane_types
            .iter()
            .filter(|t| category_id.is_none() || t.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn fetch_crane_models(
        &self,
        type_id: Option<i64>,
        brand_id: Option<i64>,
    ) -> Result<Vec<CraneModel>, ApiError> {
        Ok(self
            .crane_models
            .iter()
            .filter(|m| type_id.is_none() || m.type_id == type_id)
            .filter(|m| brand_id.is_none() || m.brand_id == brand_id)
            .cloned()
            .collect())
    }

    async fn fetch_crane_categories(&self) -> Result<Vec<CraneCategory>, ApiError> {
        Ok(self.crane_categories.clone())
    }

    async fn add_worker_certificate(
        &self,
        _worker_id: i64,
        request: &CreateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        if self.reject_certificate_type == Some(request.certificate_type_id) {
            return Err(server(422, "Certificate type not allowed"));
        }
        let mut added = self.added_certificates.lock().unwrap();
        added.push(request.clone());
        let mut certificate = WorkerCertificate::certified(added.len() as i64, request.certificate_type_id);
        certificate.is_certified = request.is_certified;
        certificate.certification_expires = request.certification_expires;
        certificate.skill_name = Some(request.skill_name.clone());
        Ok(CertificateMutationResponse {
            success: true,
            message: "Certificate added".to_string(),
            certificate: Some(certificate),
        })
    }

    async fn update_worker_certificate(
        &self,
        _worker_id: i64,
        _certificate_id: i64,
        _request: &UpdateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        Err(not_stubbed("update_worker_certificate"))
    }

    async fn remove_worker_certificate(
        &self,
        _worker_id: i64,
        _certificate_id: i64,
    ) -> Result<CertificateDeleteResponse, ApiError> {
        Err(not_stubbed("remove_worker_certificate"))
    }

    async fn fetch_category_certificates(
        &self,
        category_id: i64,
    ) -> Result<Vec<CertificateType>, ApiError> {
        Ok(self
            .category_certificates
            .get(&category_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_workers_with_certificates(
        &self,
        _certificate_ids: &[i64],
        _include_expired: bool,
    ) -> Result<Vec<RosterWorker>, ApiError> {
        Err(not_stubbed("find_workers_with_certificates"))
    }

    async fn validate_worker_certificates(
        &self,
        worker_id: i64,
        _task_id: i64,
    ) -> Result<CertificateValidationResponse, ApiError> {
        self.certificate_validations
            .get(&worker_id)
            .cloned()
            .ok_or_else(|| server(404, "Worker not found"))
    }

    async fn fetch_workers(&self, query: &RosterQuery) -> Result<Vec<RosterWorker>, ApiError> {
        let search = query.search.clone().unwrap_or_default().to_lowercase();
        Ok(self
            .roster
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.name.to_lowercase().contains(&search))
            .cloned()
            .collect())
    }

    async fn search_workers(
        &self,
        text: &str,
        limit: u32,
        offset: u32,
    ) -> Result<WorkerSearchResponse, ApiError> {
        let matched = self.fetch_workers(&RosterQuery::search(text)).await?;
        let total_count = matched.len();
        let workers: Vec<RosterWorker> = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(WorkerSearchResponse {
            has_more: (offset as usize) + workers.len() < total_count,
            workers,
            total_count,
            page: None,
            limit: Some(limit),
        })
    }

    async fn create_worker(&self, request: &CreateWorkerRequest) -> Result<RosterWorker, ApiError> {
        let mut roster = self.roster.lock().unwrap();
        if roster.iter().any(|w| w.email.eq_ignore_ascii_case(&request.email)) {
            return Err(server(409, "Email already in use"));
        }
        let mut worker = roster_worker(
            200 + roster.len() as i64,
            &request.name,
            request.status,
            request.hourly_rate,
        );
        worker.email = request.email.clone();
        worker.employment_type = request.employment_type;
        worker.role = request.role;
        roster.push(worker.clone());
        Ok(worker)
    }

    async fn update_worker(
        &self,
        worker_id: i64,
        request: &UpdateWorkerRequest,
    ) -> Result<RosterWorker, ApiError> {
        let mut roster = self.roster.lock().unwrap();
        let worker = roster
            .iter_mut()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| server(404, "Worker not found"))?;
        if let Some(name) = &request.name {
            worker.name = name.clone();
        }
        if let Some(rate) = request.hourly_rate {
            worker.hourly_rate = rate;
        }
        if let Some(status) = request.status {
            worker.status = status;
        }
        Ok(worker.clone())
    }

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: WorkerStatus,
    ) -> Result<RosterWorker, ApiError> {
        let update = UpdateWorkerRequest {
            status: Some(status),
            ..Default::default()
        };
        self.update_worker(worker_id, &update).await
    }

    async fn delete_worker(&self, worker_id: i64) -> Result<DeleteWorkerResponse, ApiError> {
        let mut roster = self.roster.lock().unwrap();
        let before = roster.len();
        roster.retain(|w| w.id != worker_id);
        if roster.len() == before {
            return Err(server(404, "Worker not found"));
        }
        Ok(DeleteWorkerResponse {
            success: true,
            message: "Worker deleted".to_string(),
            worker_id: Some(worker_id),
        })
    }

    async fn fetch_worker_documents(
        &self,
        _worker_id: i64,
        _category: Option<DocumentCategory>,
        _limit: Option<u32>,
        _offset: Option<u32>,
    ) -> Result<WorkerDocumentsResponse, ApiError> {
        Err(not_stubbed("fetch_worker_documents"))
    }

    async fn upload_worker_document(
        &self,
        _worker_id: i64,
        _upload: &DocumentUpload,
    ) -> Result<UploadWorkerDocumentResponse, ApiError> {
        Err(not_stubbed("upload_worker_document"))
    }

    async fn move_worker_document(
        &self,
        _worker_id: i64,
        _key: &str,
        _category: DocumentCategory,
    ) -> Result<WorkerDocument, ApiError> {
        Err(not_stubbed("move_worker_document"))
    }

    async fn delete_worker_document(
        &self,
        _worker_id: i64,
        _key: &str,
    ) -> Result<DeleteWorkerDocumentResponse, ApiError> {
        Err(not_stubbed("delete_worker_document"))
    }

    async fn document_download_url(
        &self,
        _worker_id: i64,
        _document_id: &str,
    ) -> Result<String, ApiError> {
        Err(not_stubbed("document_download_url"))
    }
}
