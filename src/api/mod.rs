//! Chef REST API: transport, endpoints and the `ChefApi` seam.
//!
//! `ApiClient` talks HTTP. Sessions only see `Arc<dyn ChefApi>`, so tests can
//! swap in a stub.

pub mod certificates;
pub mod client;
pub mod documents;
pub mod equipment;
pub mod projects;
pub mod roster;
pub mod workers;

#[cfg(test)]
pub(crate) mod stub;

pub use client::ApiClient;
pub use projects::create_task_with_workers;
pub use roster::RosterQuery;
pub use workers::WorkerQuery;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{
    AvailableWorkersResponse, CertificateDeleteResponse, CertificateMutationResponse,
    CertificateType, CertificateValidationResponse, CraneCategory, CraneModel, CraneType,
    CreateTaskAssignmentRequest, CreateTaskRequest, CreateWorkerCertificateRequest,
    CreateWorkerRequest, DeleteAssignmentResponse, DeleteWorkerDocumentResponse,
    DeleteWorkerResponse, DocumentCategory, DocumentUpload, ProjectTask, RosterWorker, Supervisor,
    TaskAssignment, TaskCertificateRequirements, UpdateWorkerCertificateRequest,
    UpdateWorkerRequest, UploadWorkerDocumentResponse, WorkerCertificate, WorkerDocument,
    WorkerDocumentsResponse, WorkerSearchResponse, WorkerStatus,
};

/// Operations the chef side performs against the backend.
#[async_trait]
pub trait ChefApi: Send + Sync {
    async fn fetch_task(&self, task_id: i64) -> Result<ProjectTask, ApiError>;

    async fn fetch_task_assignments(&self, task_id: i64) -> Result<Vec<TaskAssignment>, ApiError>;

    async fn fetch_task_certificates(
        &self,
        task_id: i64,
    ) -> Result<TaskCertificateRequirements, ApiError>;

    async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<ProjectTask, ApiError>;

    /// Returns the assignments the server created; per-worker rejections are logged.
    async fn assign_workers(
        &self,
        task_id: i64,
        assignments: &[CreateTaskAssignmentRequest],
    ) -> Result<Vec<TaskAssignment>, ApiError>;

    async fn remove_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse, ApiError>;

    async fn fetch_available_workers(
        &self,
        task_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError>;

    async fn fetch_project_workers(
        &self,
        project_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError>;

    async fn fetch_supervisors(&self, include_external: bool) -> Result<Vec<Supervisor>, ApiError>;

    async fn fetch_certificate_types(
        &self,
        only_active: bool,
    ) -> Result<Vec<CertificateType>, ApiError>;

    async fn fetch_worker_certificates(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerCertificate>, ApiError>;

    async fn fetch_crane_types(&self, category_id: Option<i64>) -> Result<Vec<CraneType>, ApiError>;

    async fn fetch_crane_models(
        &self,
        type_id: Option<i64>,
        brand_id: Option<i64>,
    ) -> Result<Vec<CraneModel>, ApiError>;

    async fn fetch_crane_categories(&self) -> Result<Vec<CraneCategory>, ApiError>;

    // Certificate tracking

    async fn add_worker_certificate(
        &self,
        worker_id: i64,
        request: &CreateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError>;

    async fn update_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
        request: &UpdateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError>;

    async fn remove_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
    ) -> Result<CertificateDeleteResponse, ApiError>;

    async fn fetch_category_certificates(
        &self,
        category_id: i64,
    ) -> Result<Vec<CertificateType>, ApiError>;

    async fn find_workers_with_certificates(
        &self,
        certificate_ids: &[i64],
        include_expired: bool,
    ) -> Result<Vec<RosterWorker>, ApiError>;

    async fn validate_worker_certificates(
        &self,
        worker_id: i64,
        task_id: i64,
    ) -> Result<CertificateValidationResponse, ApiError>;

    // Worker roster

    async fn fetch_workers(&self, query: &RosterQuery) -> Result<Vec<RosterWorker>, ApiError>;

    async fn search_workers(
        &self,
        text: &str,
        limit: u32,
        offset: u32,
    ) -> Result<WorkerSearchResponse, ApiError>;

    async fn create_worker(&self, request: &CreateWorkerRequest) -> Result<RosterWorker, ApiError>;

    async fn update_worker(
        &self,
        worker_id: i64,
        request: &UpdateWorkerRequest,
    ) -> Result<RosterWorker, ApiError>;

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: WorkerStatus,
    ) -> Result<RosterWorker, ApiError>;

    async fn delete_worker(&self, worker_id: i64) -> Result<DeleteWorkerResponse, ApiError>;

    // Worker documents

    async fn fetch_worker_documents(
        &self,
        worker_id: i64,
        category: Option<DocumentCategory>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<WorkerDocumentsResponse, ApiError>;

    async fn upload_worker_document(
        &self,
        worker_id: i64,
        upload: &DocumentUpload,
    ) -> Result<UploadWorkerDocumentResponse, ApiError>;

    async fn move_worker_document(
        &self,
        worker_id: i64,
        key: &str,
        category: DocumentCategory,
    ) -> Result<WorkerDocument, ApiError>;

    async fn delete_worker_document(
        &self,
        worker_id: i64,
        key: &str,
    ) -> Result<DeleteWorkerDocumentResponse, ApiError>;

    async fn document_download_url(
        &self,
        worker_id: i64,
        document_id: &str,
    ) -> Result<String, ApiError>;
}

#[async_trait]
impl ChefApi for ApiClient {
    async fn fetch_task(&self, task_id: i64) -> Result<ProjectTask, ApiError> {
        ApiClient::fetch_task(self, task_id).await
    }

    async fn fetch_task_assignments(&self, task_id: i64) -> Result<Vec<TaskAssignment>, ApiError> {
        ApiClient::fetch_task_assignments(self, task_id).await
    }

    async fn fetch_task_certificates(
        &self,
        task_id: i64,
    ) -> Result<TaskCertificateRequirements, ApiError> {
        ApiClient::fetch_task_certificates(self, task_id).await
    }

    async fn create_task(
        &self,
        project_id: i64,
        request: &CreateTaskRequest,
    ) -> Result<ProjectTask, ApiError> {
        ApiClient::create_task(self, project_id, request).await
    }

    async fn assign_workers(
        &self,
        task_id: i64,
        assignments: &[CreateTaskAssignmentRequest],
    ) -> Result<Vec<TaskAssignment>, ApiError> {
        ApiClient::assign_workers(self, task_id, assignments).await
    }

    async fn remove_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<DeleteAssignmentResponse, ApiError> {
        ApiClient::remove_assignment(self, assignment_id).await
    }

    async fn fetch_available_workers(
        &self,
        task_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        ApiClient::fetch_available_workers(self, task_id, query).await
    }

    async fn fetch_project_workers(
        &self,
        project_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        ApiClient::fetch_project_workers(self, project_id, query).await
    }

    async fn fetch_supervisors(&self, include_external: bool) -> Result<Vec<Supervisor>, ApiError> {
        ApiClient::fetch_supervisors(self, include_external).await
    }

    async fn fetch_certificate_types(
        &self,
        only_active: bool,
    ) -> Result<Vec<CertificateType>, ApiError> {
        ApiClient::fetch_certificate_types(self, only_active).await
    }

    async fn fetch_worker_certificates(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerCertificate>, ApiError> {
        ApiClient::fetch_worker_certificates(self, worker_id).await
    }

    async fn fetch_crane_types(&self, category_id: Option<i64>) -> Result<Vec<CraneType>, ApiError> {
        ApiClient::fetch_crane_types(self, category_id).await
    }

    async fn fetch_crane_models(
        &self,
        type_id: Option<i64>,
        brand_id: Option<i64>,
    ) -> Result<Vec<CraneModel>, ApiError> {
        ApiClient::fetch_crane_models(self, type_id, brand_id).await
    }

    async fn fetch_crane_categories(&self) -> Result<Vec<CraneCategory>, ApiError> {
        ApiClient::fetch_crane_categories(self).await
    }

    async fn add_worker_certificate(
        &self,
        worker_id: i64,
        request: &CreateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        ApiClient::add_worker_certificate(self, worker_id, request).await
    }

    async fn update_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
        request: &UpdateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        ApiClient::update_worker_certificate(self, worker_id, certificate_id, request).await
    }

    async fn remove_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
    ) -> Result<CertificateDeleteResponse, ApiError> {
        ApiClient::remove_worker_certificate(self, worker_id, certificate_id).await
    }

    async fn fetch_category_certificates(
        &self,
        category_id: i64,
    ) -> Result<Vec<CertificateType>, ApiError> {
        ApiClient::fetch_category_certificates(self, category_id).await
    }

    async fn find_workers_with_certificates(
        &self,
        certificate_ids: &[i64],
        include_expired: bool,
    ) -> Result<Vec<RosterWorker>, ApiError> {
        ApiClient::find_workers_with_certificates(self, certificate_ids, include_expired).await
    }

    async fn validate_worker_certificates(
        &self,
        worker_id: i64,
        task_id: i64,
    ) -> Result<CertificateValidationResponse, ApiError> {
        ApiClient::validate_worker_certificates(self, worker_id, task_id).await
    }

    async fn fetch_workers(&self, query: &RosterQuery) -> Result<Vec<RosterWorker>, ApiError> {
        ApiClient::fetch_workers(self, query).await
    }

    async fn search_workers(
        &self,
        text: &str,
        limit: u32,
        offset: u32,
    ) -> Result<WorkerSearchResponse, ApiError> {
        ApiClient::search_workers(self, text, limit, offset).await
    }

    async fn create_worker(&self, request: &CreateWorkerRequest) -> Result<RosterWorker, ApiError> {
        ApiClient::create_worker(self, request).await
    }

    async fn update_worker(
        &self,
        worker_id: i64,
        request: &UpdateWorkerRequest,
    ) -> Result<RosterWorker, ApiError> {
        ApiClient::update_worker(self, worker_id, request).await
    }

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: WorkerStatus,
    ) -> Result<RosterWorker, ApiError> {
        ApiClient::update_worker_status(self, worker_id, status).await
    }

    async fn delete_worker(&self, worker_id: i64) -> Result<DeleteWorkerResponse, ApiError> {
        ApiClient::delete_worker(self, worker_id).await
    }

    async fn fetch_worker_documents(
        &self,
        worker_id: i64,
        category: Option<DocumentCategory>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<WorkerDocumentsResponse, ApiError> {
        ApiClient::fetch_worker_documents(self, worker_id, category, limit, offset).await
    }

    async fn upload_worker_document(
        &self,
        worker_id: i64,
        upload: &DocumentUpload,
    ) -> Result<UploadWorkerDocumentResponse, ApiError> {
        ApiClient::upload_worker_document(self, worker_id, upload).await
    }

    async fn move_worker_document(
        &self,
        worker_id: i64,
        key: &str,
        category: DocumentCategory,
    ) -> Result<WorkerDocument, ApiError> {
        ApiClient::move_worker_document(self, worker_id, key, category).await
    }

    async fn delete_worker_document(
        &self,
        worker_id: i64,
        key: &str,
    ) -> Result<DeleteWorkerDocumentResponse, ApiError> {
        ApiClient::delete_worker_document(self, worker_id, key).await
    }

    async fn document_download_url(
        &self,
        worker_id: i64,
        document_id: &str,
    ) -> Result<String, ApiError> {
        ApiClient::document_download_url(self, worker_id, document_id).await
    }
}
