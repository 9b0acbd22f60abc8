//! Worker/task compatibility.
//!
//! Crane skills use ANY semantics: one shared crane type is enough.
//! Certificates use ALL semantics: every required certificate must be held,
//! certified and unexpired. Empty requirement sets are always satisfied.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::requirements::RequirementSet;
use crate::model::{AvailableWorker, Employee, WorkerCertificate};

/// Certificates expiring within this many days are flagged.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Skill data the evaluator needs from a worker.
pub trait WorkerProfile {
    fn worker_id(&self) -> i64;
    fn worker_name(&self) -> &str;
    fn crane_type_ids(&self) -> BTreeSet<i64>;
    fn certificates(&self) -> &[WorkerCertificate];
}

impl WorkerProfile for AvailableWorker {
    fn worker_id(&self) -> i64 {
        self.employee.id
    }

    fn worker_name(&self) -> &str {
        &self.employee.name
    }

    fn crane_type_ids(&self) -> BTreeSet<i64> {
        self.crane_types
            .iter()
            .map(|ct| ct.id)
            .chain(self.employee.crane_types.iter().map(|ct| ct.crane_type_id))
            .collect()
    }

    fn certificates(&self) -> &[WorkerCertificate] {
        &self.certificates
    }
}

/// An employee record carries crane skills but no certificates.
impl WorkerProfile for Employee {
    fn worker_id(&self) -> i64 {
        self.id
    }

    fn worker_name(&self) -> &str {
        &self.name
    }

    fn crane_type_ids(&self) -> BTreeSet<i64> {
        self.crane_types.iter().map(|ct| ct.crane_type_id).collect()
    }

    fn certificates(&self) -> &[WorkerCertificate] {
        &[]
    }
}

/// Certificate-type ids the worker holds validly at `now`.
pub fn valid_certificate_ids(worker: &impl WorkerProfile, now: DateTime<Utc>) -> BTreeSet<i64> {
    worker
        .certificates()
        .iter()
        .filter(|c| c.is_valid_at(now))
        .filter_map(|c| c.certificate_type_id)
        .collect()
}

/// ANY: the worker shares at least one crane type with `required`.
pub fn has_required_crane_type(worker: &impl WorkerProfile, required: &BTreeSet<i64>) -> bool {
    if required.is_empty() {
        return true;
    }
    !worker.crane_type_ids().is_disjoint(required)
}

/// ALL: every required certificate is held validly.
pub fn has_required_certificates(
    worker: &impl WorkerProfile,
    required: &BTreeSet<i64>,
    now: DateTime<Utc>,
) -> bool {
    if required.is_empty() {
        return true;
    }
    required.is_subset(&valid_certificate_ids(worker, now))
}

/// Whether `worker` may be assigned to a task with these requirements.
pub fn is_eligible(
    worker: &impl WorkerProfile,
    required_crane_types: &BTreeSet<i64>,
    required_certificates: &BTreeSet<i64>,
    now: DateTime<Utc>,
) -> bool {
    has_required_crane_type(worker, required_crane_types)
        && has_required_certificates(worker, required_certificates, now)
}

/// A required certificate that is valid but runs out soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiringCertificate {
    pub certificate_type_id: i64,
    pub days_remaining: i64,
}

/// Detailed compatibility of one worker with one requirement set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compatibility {
    pub employee_id: i64,
    pub has_crane_skill: bool,
    /// Required, and not held as a certified record.
    pub missing_certificates: Vec<i64>,
    /// Required, certified, but expired at evaluation time.
    pub expired_certificates: Vec<i64>,
    pub expiring_soon: Vec<ExpiringCertificate>,
}

impl Compatibility {
    pub fn is_eligible(&self) -> bool {
        self.has_crane_skill
            && self.missing_certificates.is_empty()
            && self.expired_certificates.is_empty()
    }

    pub fn has_certificate_issues(&self) -> bool {
        !self.missing_certificates.is_empty() || !self.expired_certificates.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_eligible() {
            return match self.expiring_soon.len() {
                0 => "Compatible with task requirements".to_string(),
                n => format!("Compatible, but {n} certificate(s) expiring soon"),
            };
        }

        let mut problems = Vec::new();
        if !self.has_crane_skill {
            problems.push("Missing required crane skills".to_string());
        }
        if !self.missing_certificates.is_empty() {
            problems.push(format!(
                "missing {} required certificate(s)",
                self.missing_certificates.len()
            ));
        }
        if !self.expired_certificates.is_empty() {
            problems.push(format!(
                "{} required certificate(s) expired",
                self.expired_certificates.len()
            ));
        }
        problems.join(", ")
    }
}

/// Evaluate a worker in detail. `evaluate(..).is_eligible()` equals [`is_eligible`].
pub fn evaluate(
    worker: &impl WorkerProfile,
    requirements: &RequirementSet,
    now: DateTime<Utc>,
) -> Compatibility {
    let valid = valid_certificate_ids(worker, now);
    let mut missing_certificates = Vec::new();
    let mut expired_certificates = Vec::new();
    let mut expiring_soon = Vec::new();

    for &required in &requirements.certificates {
        let records: Vec<&WorkerCertificate> = worker
            .certificates()
            .iter()
            .filter(|c| c.certificate_type_id == Some(required))
            .collect();

        if valid.contains(&required) {
            if let Some(days) = days_until_latest_expiry(&records, now)
                .filter(|days| *days <= EXPIRY_WARNING_DAYS)
            {
                expiring_soon.push(ExpiringCertificate {
                    certificate_type_id: required,
                    days_remaining: days,
                });
            }
        } else if records.iter().any(|c| c.is_expired_at(now)) {
            expired_certificates.push(required);
        } else {
            missing_certificates.push(required);
        }
    }

    let compatibility = Compatibility {
        employee_id: worker.worker_id(),
        has_crane_skill: has_required_crane_type(worker, &requirements.crane_types),
        missing_certificates,
        expired_certificates,
        expiring_soon,
    };
    tracing::debug!(
        employee_id = compatibility.employee_id,
        worker = worker.worker_name(),
        eligible = compatibility.is_eligible(),
        "{}",
        compatibility.summary()
    );
    compatibility
}

/// Days left on the longest-lasting valid record; `None` if one never expires.
fn days_until_latest_expiry(records: &[&WorkerCertificate], now: DateTime<Utc>) -> Option<i64> {
    let mut latest: Option<DateTime<Utc>> = None;
    for cert in records.iter().filter(|c| c.is_valid_at(now)) {
        let expires = cert.certification_expires?;
        latest = Some(latest.map_or(expires, |l| l.max(expires)));
    }
    let seconds = (latest? - now).num_seconds();
    Some((seconds + 86_399) / 86_400)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmployeeCraneType;
    use chrono::Duration;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    fn worker(types: &[i64]) -> AvailableWorker {
        AvailableWorker::new(Employee::new(1, "Jens", "arbejder"))
            .with_crane_types(types.iter().copied())
    }

    fn scenario_worker() -> AvailableWorker {
        worker(&[1, 2]).with_certificate(WorkerCertificate::certified(100, 10))
    }

    #[test]
    fn empty_requirements_always_eligible() {
        let now = Utc::now();
        let bare = AvailableWorker::new(Employee::new(2, "Bo", "arbejder"));
        assert!(is_eligible(&bare, &set(&[]), &set(&[]), now));
        assert!(is_eligible(&scenario_worker(), &set(&[]), &set(&[]), now));
        let uncertified = worker(&[]).with_certificate(WorkerCertificate::certified(1, 10).uncertified());
        assert!(is_eligible(&uncertified, &set(&[]), &set(&[]), now));
    }

    #[test]
    fn disjoint_crane_types_fail() {
        let now = Utc::now();
        assert!(!is_eligible(&worker(&[1, 2]), &set(&[3, 4]), &set(&[]), now));
        assert!(!is_eligible(&worker(&[]), &set(&[3]), &set(&[]), now));
    }

    #[test]
    fn one_shared_crane_type_is_enough() {
        assert!(has_required_crane_type(&worker(&[1, 2]), &set(&[2, 3])));
    }

    #[test]
    fn scenario_overlapping_types_and_held_certificate() {
        let now = Utc::now();
        assert!(is_eligible(&scenario_worker(), &set(&[2, 3]), &set(&[10]), now));
    }

    #[test]
    fn scenario_missing_one_of_two_certificates() {
        let now = Utc::now();
        assert!(!is_eligible(&scenario_worker(), &set(&[2, 3]), &set(&[10, 11]), now));
    }

    #[test]
    fn scenario_expired_yesterday_fails_any_requirement_including_it() {
        let now = Utc::now();
        let w = worker(&[1, 2])
            .with_certificate(WorkerCertificate::certified(100, 10).expiring(now - Duration::days(1)));
        assert!(!is_eligible(&w, &set(&[]), &set(&[10]), now));
        assert!(!is_eligible(&w, &set(&[2]), &set(&[10]), now));
        assert!(!is_eligible(&w, &set(&[]), &set(&[10, 11]), now));
    }

    #[test]
    fn expiry_exactly_now_is_invalid() {
        let now = Utc::now();
        let w = worker(&[]).with_certificate(WorkerCertificate::certified(100, 10).expiring(now));
        assert!(!is_eligible(&w, &set(&[]), &set(&[10]), now));
        assert!(valid_certificate_ids(&w, now).is_empty());
    }

    #[test]
    fn uncertified_record_does_not_count() {
        let now = Utc::now();
        let w = worker(&[]).with_certificate(WorkerCertificate::certified(100, 10).uncertified());
        assert!(!has_required_certificates(&w, &set(&[10]), now));
    }

    #[test]
    fn idempotent_for_same_inputs() {
        let now = Utc::now();
        let w = scenario_worker();
        let first = is_eligible(&w, &set(&[2]), &set(&[10]), now);
        let second = is_eligible(&w, &set(&[2]), &set(&[10]), now);
        assert_eq!(first, second);
        let reqs = RequirementSet::new([2], [10]);
        assert_eq!(evaluate(&w, &reqs, now), evaluate(&w, &reqs, now));
    }

    #[test]
    fn employee_skills_count_for_crane_check() {
        let mut employee = Employee::new(5, "Mette", "arbejder");
        employee.crane_types.push(EmployeeCraneType {
            crane_type_id: 7,
            name: "Tower".into(),
            certification_date: None,
        });
        assert!(has_required_crane_type(&employee, &set(&[7, 8])));
        assert!(!has_required_certificates(&employee, &set(&[10]), Utc::now()));
    }

    #[test]
    fn evaluate_splits_missing_and_expired() {
        let now = Utc::now();
        let w = worker(&[1])
            .with_certificate(WorkerCertificate::certified(1, 10))
            .with_certificate(WorkerCertificate::certified(2, 11).expiring(now - Duration::days(3)))
            .with_certificate(WorkerCertificate::certified(3, 12).uncertified());
        let result = evaluate(&w, &RequirementSet::new([1], [10, 11, 12, 13]), now);
        assert!(result.has_crane_skill);
        assert_eq!(result.missing_certificates, vec![12, 13]);
        assert_eq!(result.expired_certificates, vec![11]);
        assert!(!result.is_eligible());
        assert_eq!(
            result.summary(),
            "missing 2 required certificate(s), 1 required certificate(s) expired"
        );
    }

    #[test]
    fn renewed_certificate_beats_expired_record() {
        let now = Utc::now();
        let w = worker(&[])
            .with_certificate(WorkerCertificate::certified(1, 10).expiring(now - Duration::days(400)))
            .with_certificate(WorkerCertificate::certified(2, 10).expiring(now + Duration::days(300)));
        let result = evaluate(&w, &RequirementSet::new([], [10]), now);
        assert!(result.is_eligible());
        assert!(result.expiring_soon.is_empty());
    }

    #[test]
    fn expiring_soon_rounds_days_up() {
        let now = Utc::now();
        let w = worker(&[]).with_certificate(
            WorkerCertificate::certified(1, 10).expiring(now + Duration::days(4) + Duration::hours(2)),
        );
        let result = evaluate(&w, &RequirementSet::new([], [10]), now);
        assert!(result.is_eligible());
        assert_eq!(
            result.expiring_soon,
            vec![ExpiringCertificate {
                certificate_type_id: 10,
                days_remaining: 5
            }]
        );
        assert_eq!(result.summary(), "Compatible, but 1 certificate(s) expiring soon");
    }

    #[test]
    fn summary_for_missing_crane_skill() {
        let result = evaluate(&worker(&[1]), &RequirementSet::new([2], []), Utc::now());
        assert_eq!(result.summary(), "Missing required crane skills");
        let ok = evaluate(&worker(&[2]), &RequirementSet::new([2], []), Utc::now());
        assert_eq!(ok.summary(), "Compatible with task requirements");
    }

    #[test]
    fn evaluate_agrees_with_is_eligible() {
        let now = Utc::now();
        let workers = [
            worker(&[]),
            scenario_worker(),
            worker(&[3]).with_certificate(WorkerCertificate::certified(1, 11).expiring(now)),
            worker(&[1, 3]).with_certificate(WorkerCertificate::certified(1, 11)),
        ];
        let requirement_sets = [
            RequirementSet::new([], []),
            RequirementSet::new([2, 3], [10]),
            RequirementSet::new([3], [11]),
            RequirementSet::new([], [10, 11]),
            RequirementSet::new([4], []),
        ];
        for w in &workers {
            for reqs in &requirement_sets {
                assert_eq!(
                    evaluate(w, reqs, now).is_eligible(),
                    is_eligible(w, &reqs.crane_types, &reqs.certificates, now)
                );
            }
        }
    }
}
