//! Builds assignment requests for the selected workers.

use chrono::{DateTime, Utc};

use super::eligibility::{WorkerProfile, has_required_certificates, has_required_crane_type};
use super::requirements::RequirementSet;
use crate::model::CreateTaskAssignmentRequest;

/// One request per worker, in input order.
///
/// Workers failing the certificate check are still sent, flagged with
/// `skip_certificate_validation` so the server does not reject them. The
/// preferred crane model is only attached for workers who can operate one of
/// the required crane types.
pub fn assemble_assignments<W: WorkerProfile>(
    workers: &[W],
    requirements: &RequirementSet,
    now: DateTime<Utc>,
) -> Vec<CreateTaskAssignmentRequest> {
    workers
        .iter()
        .map(|worker| assemble_one(worker, requirements, now))
        .collect()
}

pub fn assemble_one(
    worker: &impl WorkerProfile,
    requirements: &RequirementSet,
    now: DateTime<Utc>,
) -> CreateTaskAssignmentRequest {
    let certified = has_required_certificates(worker, &requirements.certificates, now);
    let skilled = has_required_crane_type(worker, &requirements.crane_types);

    if !certified {
        tracing::debug!(
            employee_id = worker.worker_id(),
            "Worker lacks required certificates; skipping server certificate validation"
        );
    }

    CreateTaskAssignmentRequest {
        employee_id: worker.worker_id(),
        crane_model_id: requirements.preferred_crane_model_id.filter(|_| skilled),
        skip_certificate_validation: !certified,
        skip_crane_type_validation: false,
        work_date: None,
        status: None,
        notes: None,
    }
}
