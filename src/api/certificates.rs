//! Certificate catalog, worker certificate tracking and server-side validation.

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::null_as_default;
use crate::model::{
    CertificateDeleteResponse, CertificateMutationResponse, CertificateType,
    CertificateValidationResponse, CreateWorkerCertificateRequest, RosterWorker,
    TaskCertificateRequirements, UpdateWorkerCertificateRequest, WorkerCertificate,
    WorkerSearchResponse,
};

#[derive(Deserialize)]
struct CertificateTypesEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    certificate_types: Vec<CertificateType>,
}

#[derive(Deserialize)]
struct WorkerCertificatesEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    certificates: Vec<WorkerCertificate>,
}

#[derive(Serialize)]
struct ValidationRequest {
    task_id: i64,
}

/// `certificate_ids` repeated once per id, as the search route expects.
fn certificate_search_pairs(certificate_ids: &[i64], include_expired: bool) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<_> = certificate_ids
        .iter()
        .map(|id| ("certificate_ids", id.to_string()))
        .collect();
    if include_expired {
        pairs.push(("include_expired", "true".to_string()));
    }
    pairs
}

impl ApiClient {
    /// Certificate catalog. Inactive types are dropped when `only_active`.
    pub async fn fetch_certificate_types(
        &self,
        only_active: bool,
    ) -> Result<Vec<CertificateType>, ApiError> {
        let envelope: CertificateTypesEnvelope = self.get("/api/app/chef/certificates", &[]).await?;
        let mut types = envelope.certificate_types;
        if only_active {
            types.retain(|t| t.is_active);
        }
        Ok(types)
    }

    pub async fn fetch_worker_certificates(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerCertificate>, ApiError> {
        let envelope: WorkerCertificatesEnvelope = self
            .get(&format!("/api/app/chef/workers/{worker_id}/certificates"), &[])
            .await?;
        Ok(envelope.certificates)
    }

    pub async fn add_worker_certificate(
        &self,
        worker_id: i64,
        request: &CreateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        let response: CertificateMutationResponse = self
            .post(&format!("/api/app/chef/workers/{worker_id}/certificates"), request)
            .await?;
        tracing::info!(
            worker_id,
            certificate_type_id = request.certificate_type_id,
            success = response.success,
            "Certificate added"
        );
        Ok(response)
    }

    pub async fn update_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
        request: &UpdateWorkerCertificateRequest,
    ) -> Result<CertificateMutationResponse, ApiError> {
        self.put(
            &format!("/api/app/chef/workers/{worker_id}/certificates/{certificate_id}"),
            request,
        )
        .await
    }

    pub async fn remove_worker_certificate(
        &self,
        worker_id: i64,
        certificate_id: i64,
    ) -> Result<CertificateDeleteResponse, ApiError> {
        let response: CertificateDeleteResponse = self
            .delete(
                &format!("/api/app/chef/workers/{worker_id}/certificates/{certificate_id}"),
                &[],
            )
            .await?;
        tracing::info!(worker_id, certificate_id, "Certificate removed");
        Ok(response)
    }

    /// Certificates a crane category demands of its operators.
    pub async fn fetch_category_certificates(
        &self,
        category_id: i64,
    ) -> Result<Vec<CertificateType>, ApiError> {
        let envelope: CertificateTypesEnvelope = self
            .get(
                &format!("/api/app/chef/crane-categories/{category_id}/required-certificates"),
                &[],
            )
            .await?;
        Ok(envelope.certificate_types)
    }

    /// Roster workers holding all of `certificate_ids`.
    pub async fn find_workers_with_certificates(
        &self,
        certificate_ids: &[i64],
        include_expired: bool,
    ) -> Result<Vec<RosterWorker>, ApiError> {
        let response: WorkerSearchResponse = self
            .get(
                "/api/app/chef/workers/with-certificates",
                &certificate_search_pairs(certificate_ids, include_expired),
            )
            .await?;
        Ok(response.workers)
    }

    pub async fn validate_worker_certificates(
        &self,
        worker_id: i64,
        task_id: i64,
    ) -> Result<CertificateValidationResponse, ApiError> {
        self.post(
            &format!("/api/app/chef/workers/{worker_id}/validate-certificates"),
            &ValidationRequest { task_id },
        )
        .await
    }

    /// Certificates the server derives for a task from its crane category.
    pub async fn fetch_task_certificates(
        &self,
        task_id: i64,
    ) -> Result<TaskCertificateRequirements, ApiError> {
        self.get(&format!("/api/app/chef/tasks/{task_id}/certificates"), &[])
            .await
    }
}
