//! Pre-flight check of the workers picked for a new task.

use chrono::{DateTime, Utc};

use super::eligibility::is_eligible;
use super::requirements::RequirementSet;
use crate::model::AvailableWorker;

/// Selected workers, by employee id, sorted into buckets.
///
/// Unavailable workers land only in `unavailable`. Every available worker is
/// either `valid` or `missing_skills`, and may additionally appear in
/// `with_conflicts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerAssignmentValidation {
    pub valid: Vec<i64>,
    pub unavailable: Vec<i64>,
    pub missing_skills: Vec<i64>,
    pub with_conflicts: Vec<i64>,
}

impl WorkerAssignmentValidation {
    pub fn has_issues(&self) -> bool {
        !self.unavailable.is_empty()
            || !self.missing_skills.is_empty()
            || !self.with_conflicts.is_empty()
    }

    pub fn can_proceed(&self) -> bool {
        !self.valid.is_empty()
    }

    pub fn issues_summary(&self) -> String {
        let mut issues = Vec::new();
        if !self.unavailable.is_empty() {
            issues.push(format!("{} unavailable", self.unavailable.len()));
        }
        if !self.missing_skills.is_empty() {
            issues.push(format!("{} missing required skills", self.missing_skills.len()));
        }
        if !self.with_conflicts.is_empty() {
            issues.push(format!("{} have schedule conflicts", self.with_conflicts.len()));
        }
        issues.join(", ")
    }
}

pub fn validate_workers(
    workers: &[AvailableWorker],
    requirements: &RequirementSet,
    now: DateTime<Utc>,
) -> WorkerAssignmentValidation {
    let mut validation = WorkerAssignmentValidation::default();

    for worker in workers {
        let id = worker.employee_id();
        if !worker.is_available() {
            validation.unavailable.push(id);
            continue;
        }

        if is_eligible(worker, &requirements.crane_types, &requirements.certificates, now) {
            validation.valid.push(id);
        } else {
            validation.missing_skills.push(id);
        }

        if worker.has_conflicts() {
            validation.with_conflicts.push(id);
        }
    }

    tracing::debug!(
        valid = validation.valid.len(),
        unavailable = validation.unavailable.len(),
        missing_skills = validation.missing_skills.len(),
        conflicts = validation.with_conflicts.len(),
        "Validated selected workers"
    );
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Employee, TaskConflict, WorkerAvailability, WorkerCertificate};

    fn worker(id: i64, types: &[i64]) -> AvailableWorker {
        AvailableWorker::new(Employee::new(id, format!("W{id}"), "arbejder"))
            .with_crane_types(types.iter().copied())
            .with_availability(WorkerAvailability::free())
    }

    fn busy(mut w: AvailableWorker) -> AvailableWorker {
        let mut availability = WorkerAvailability::free();
        availability.conflicting_tasks.push(TaskConflict {
            task_id: 77,
            task_title: "Harbour lift".into(),
            project_title: None,
            conflict_dates: Vec::new(),
        });
        w.availability = Some(availability);
        w
    }

    fn unavailable(mut w: AvailableWorker) -> AvailableWorker {
        let mut availability = WorkerAvailability::free();
        availability.is_available = false;
        availability.conflicting_tasks.push(TaskConflict {
            task_id: 78,
            task_title: "Bridge".into(),
            project_title: None,
            conflict_dates: Vec::new(),
        });
        w.availability = Some(availability);
        w
    }

    #[test]
    fn classifies_each_bucket() {
        let reqs = RequirementSet::new([2], [10]);
        let workers = vec![
            worker(1, &[2]).with_certificate(WorkerCertificate::certified(1, 10)),
            worker(2, &[3]).with_certificate(WorkerCertificate::certified(2, 10)),
            unavailable(worker(3, &[2])),
            busy(worker(4, &[2, 9]).with_certificate(WorkerCertificate::certified(3, 10))),
        ];
        let v = validate_workers(&workers, &reqs, Utc::now());
        assert_eq!(v.valid, vec![1, 4]);
        assert_eq!(v.missing_skills, vec![2]);
        assert_eq!(v.unavailable, vec![3]);
        assert_eq!(v.with_conflicts, vec![4]);
        assert!(v.has_issues());
        assert!(v.can_proceed());
        assert_eq!(
            v.issues_summary(),
            "1 unavailable, 1 missing required skills, 1 have schedule conflicts"
        );
    }

    #[test]
    fn crane_check_accepts_any_shared_type() {
        let reqs = RequirementSet::new([2, 3], []);
        let v = validate_workers(&[worker(1, &[3])], &reqs, Utc::now());
        assert_eq!(v.valid, vec![1]);
        assert!(!v.has_issues());
        assert_eq!(v.issues_summary(), "");
    }

    #[test]
    fn nobody_valid_cannot_proceed() {
        let reqs = RequirementSet::new([5], []);
        let v = validate_workers(&[worker(1, &[1]), unavailable(worker(2, &[5]))], &reqs, Utc::now());
        assert!(!v.can_proceed());
        assert_eq!(v.issues_summary(), "1 unavailable, 1 missing required skills");
    }

    #[test]
    fn unknown_availability_counts_as_available() {
        let w = AvailableWorker::new(Employee::new(9, "Ida", "arbejder"));
        let v = validate_workers(&[w], &RequirementSet::default(), Utc::now());
        assert_eq!(v.valid, vec![9]);
    }
}
