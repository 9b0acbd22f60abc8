//! Wire types for the chef API: tasks, workers, certificates, equipment and documents.

pub mod certificate;
pub mod crane;
pub mod document;
pub mod roster;
pub mod supervisor;
pub mod task;
pub mod worker;

pub use certificate::{
    CertificateDeleteResponse, CertificateMutationResponse, CertificateType, CertificateTypeInfo,
    CertificateValidationResponse, CreateWorkerCertificateRequest, SkillLevel,
    TaskCertificateRequirements, UpdateWorkerCertificateRequest, WorkerCertificate,
};
pub use crane::{
    CraneCategory, CraneModel, CraneType, EmployeeCraneType, EquipmentValidationResult,
    SelectedEquipment,
};
pub use document::{
    DeleteWorkerDocumentResponse, DocumentCategory, DocumentUpload, UploadWorkerDocumentResponse,
    UploadedDocument, WorkerDocument, WorkerDocumentsResponse,
};
pub use roster::{
    CreateWorkerRequest, DeleteWorkerResponse, EmploymentType, RosterWorker, UpdateWorkerRequest,
    WorkerQuickStats, WorkerRole, WorkerSearchResponse, WorkerStatus,
};
pub use supervisor::{DegradedFallback, Supervisor, SupervisorChoice};
pub use task::{
    CreateTaskAssignmentRequest, CreateTaskRequest, DeleteAssignmentResponse, ProjectTask,
    TaskAssignment, TaskAssignmentBulkRequest, TaskAssignmentBulkResponse, TaskAssignmentDetail,
    TaskCreationResult,
};
pub use worker::{AvailableWorker, AvailableWorkersResponse, Employee, TaskConflict, WorkerAvailability};

use serde::{Deserialize, Deserializer};

/// Decode a missing or `null` field as the type's default.
///
/// Pair with `#[serde(default)]` so absent keys are covered too.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `serde(default = ...)` helper for flags the backend omits when true.
pub(crate) fn default_true() -> bool {
    true
}
