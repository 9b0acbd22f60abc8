//! Certificate catalog and per-worker certificate records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A certificate type from the catalog (e.g. `CLASS_A`, `RIGGER`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateType {
    #[serde(rename = "certificate_type_id")]
    pub id: i64,
    pub code: String,
    pub name_da: String,
    pub name_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub requires_medical: bool,
    #[serde(default)]
    pub min_age: i32,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl CertificateType {
    /// English name, used as the display name.
    pub fn display_name(&self) -> &str {
        &self.name_en
    }
}

/// Short certificate-type info embedded in worker certificate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateTypeInfo {
    pub code: String,
    pub name_en: String,
    pub name_da: String,
}

/// One certificate (skill record) held by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerCertificate {
    #[serde(rename = "skill_id", alias = "id")]
    pub id: i64,
    #[serde(default)]
    pub certificate_type_id: Option<i64>,
    #[serde(default, alias = "CertificateTypes", skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<CertificateTypeInfo>,
    #[serde(default)]
    pub skill_name: Option<String>,
    pub is_certified: bool,
    #[serde(default)]
    pub certification_expires: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i32>,
}

impl WorkerCertificate {
    /// Certified record for `certificate_type_id`, without expiry.
    pub fn certified(id: i64, certificate_type_id: i64) -> Self {
        Self {
            id,
            certificate_type_id: Some(certificate_type_id),
            certificate_type: None,
            skill_name: None,
            is_certified: true,
            certification_expires: None,
            certification_number: None,
            years_experience: None,
        }
    }

    /// Builder: set expiry.
    pub fn expiring(mut self, at: DateTime<Utc>) -> Self {
        self.certification_expires = Some(at);
        self
    }

    /// Builder: clear the certified flag.
    pub fn uncertified(mut self) -> Self {
        self.is_certified = false;
        self
    }

    /// Whether this record counts toward eligibility at `now`.
    ///
    /// Expiry is exclusive: a certificate expiring exactly at `now` is invalid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.certificate_type_id.is_some()
            && self.is_certified
            && self.certification_expires.is_none_or(|expires| expires > now)
    }

    /// Certified, but expired at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.is_certified
            && self
                .certification_expires
                .is_some_and(|expires| expires <= now)
    }
}

/// Certificate requirements of a task, derived server-side from its crane category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskCertificateRequirements {
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_certificates: Vec<RequiredCertificate>,
}

impl TaskCertificateRequirements {
    pub fn certificate_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.required_certificates
            .iter()
            .map(|c| c.certificate_type_id)
    }
}

/// A required certificate entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RequiredCertificate {
    pub certificate_type_id: i64,
    pub code: String,
    pub name_en: String,
}

/// Proficiency recorded with a worker certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

/// Body of `POST /workers/{id}/certificates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkerCertificateRequest {
    pub employee_id: i64,
    pub certificate_type_id: i64,
    pub skill_name: String,
    pub skill_level: SkillLevel,
    pub is_certified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_expires: Option<DateTime<Utc>>,
    pub years_experience: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crane_type_specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateWorkerCertificateRequest {
    /// Uncertified record of `certificate_type` for `employee_id`, named after the type.
    pub fn for_type(employee_id: i64, certificate_type: &CertificateType) -> Self {
        Self {
            employee_id,
            certificate_type_id: certificate_type.id,
            skill_name: certificate_type.display_name().to_string(),
            skill_level: SkillLevel::default(),
            is_certified: false,
            certification_number: None,
            certification_expires: None,
            years_experience: 0,
            crane_type_specialization: None,
            notes: None,
        }
    }

    /// Builder: mark certified, optionally with an expiry.
    pub fn certified(mut self, expires: Option<DateTime<Utc>>) -> Self {
        self.is_certified = true;
        self.certification_expires = expires;
        self
    }
}

/// Body of `PUT /workers/{id}/certificates/{certificate_id}`; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWorkerCertificateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_certified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crane_type_specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response of adding or updating a worker certificate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CertificateMutationResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub certificate: Option<WorkerCertificate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CertificateDeleteResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub certificate_id: Option<i64>,
}

/// Server-side check of one worker against one task's certificate requirements.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CertificateValidationResponse {
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_certificates: Vec<CertificateType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expired_certificates: Vec<WorkerCertificate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiring_soon_certificates: Vec<WorkerCertificate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_details: String,
}

impl CertificateValidationResponse {
    pub fn can_assign_to_task(&self) -> bool {
        self.is_valid && self.expired_certificates.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.expiring_soon_certificates.is_empty()
    }

    pub fn summary(&self) -> &'static str {
        if self.can_assign_to_task() && !self.has_warnings() {
            "Worker has all required valid certificates"
        } else if self.can_assign_to_task() {
            "Worker qualified but has certificates expiring soon"
        } else {
            "Worker missing required certificates or has expired certificates"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn decodes_catalog_entry() {
        let json = r#"{
            "certificate_type_id": 3,
            "code": "CLASS_A",
            "name_da": "Tårnkran",
            "name_en": "Tower crane",
            "description": null,
            "requires_medical": true,
            "min_age": 18,
            "is_active": true
        }"#;
        let cert: CertificateType = serde_json::from_str(json).unwrap();
        assert_eq!(cert.id, 3);
        assert_eq!(cert.display_name(), "Tower crane");
        assert!(cert.requires_medical);
    }

    #[test]
    fn decodes_worker_certificate_with_prisma_relation_key() {
        let json = r#"{
            "skill_id": 7,
            "certificate_type_id": 10,
            "CertificateTypes": {"code": "RIGGER", "name_en": "Rigger", "name_da": "Anhugger"},
            "skill_name": "Rigging",
            "is_certified": true,
            "certification_expires": "2030-01-01T00:00:00.000Z"
        }"#;
        let cert: WorkerCertificate = serde_json::from_str(json).unwrap();
        assert_eq!(cert.id, 7);
        assert_eq!(cert.certificate_type_id, Some(10));
        assert_eq!(cert.certificate_type.unwrap().code, "RIGGER");
        assert!(cert.certification_expires.is_some());
    }

    #[test]
    fn validity_requires_certified_flag() {
        let now = Utc::now();
        assert!(WorkerCertificate::certified(1, 10).is_valid_at(now));
        assert!(!WorkerCertificate::certified(1, 10).uncertified().is_valid_at(now));
    }

    #[test]
    fn expiry_at_now_is_invalid() {
        let now = Utc::now();
        let cert = WorkerCertificate::certified(1, 10).expiring(now);
        assert!(!cert.is_valid_at(now));
        assert!(cert.is_expired_at(now));

        let later = WorkerCertificate::certified(1, 10).expiring(now + Duration::seconds(1));
        assert!(later.is_valid_at(now));
    }

    #[test]
    fn record_without_type_never_counts() {
        let mut cert = WorkerCertificate::certified(1, 10);
        cert.certificate_type_id = None;
        assert!(!cert.is_valid_at(Utc::now()));
    }

    #[test]
    fn null_requirements_decode_empty() {
        let reqs: TaskCertificateRequirements =
            serde_json::from_str(r#"{"required_certificates": null}"#).unwrap();
        assert_eq!(reqs.certificate_ids().count(), 0);
    }

    #[test]
    fn new_certificate_request_omits_unset_fields() {
        let tower: CertificateType = serde_json::from_value(serde_json::json!({
            "certificate_type_id": 10,
            "code": "CLASS_A",
            "name_da": "Tårnkran",
            "name_en": "Tower crane",
        }))
        .unwrap();
        let request = CreateWorkerCertificateRequest::for_type(5, &tower).certified(None);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["skill_name"], "Tower crane");
        assert_eq!(body["skill_level"], "beginner");
        assert_eq!(body["is_certified"], true);
        assert!(body.get("certification_expires").is_none());
        assert!(body.get("notes").is_none());

        let update = UpdateWorkerCertificateRequest {
            skill_level: Some(SkillLevel::Expert),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"skill_level": "expert"}));
    }

    #[test]
    fn validation_outcomes() {
        let clean = CertificateValidationResponse {
            is_valid: true,
            ..Default::default()
        };
        assert!(clean.can_assign_to_task());
        assert_eq!(clean.summary(), "Worker has all required valid certificates");

        let expiring = CertificateValidationResponse {
            is_valid: true,
            expiring_soon_certificates: vec![WorkerCertificate::certified(1, 10)],
            ..Default::default()
        };
        assert!(expiring.has_warnings());
        assert_eq!(expiring.summary(), "Worker qualified but has certificates expiring soon");

        let expired = CertificateValidationResponse {
            is_valid: true,
            expired_certificates: vec![WorkerCertificate::certified(2, 11)],
            ..Default::default()
        };
        assert!(!expired.can_assign_to_task());
        assert_eq!(
            expired.summary(),
            "Worker missing required certificates or has expired certificates"
        );
    }
}
