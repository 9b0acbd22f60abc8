//! Requirement sets derived from the current selection or a fetched task.

use std::collections::BTreeSet;

use crate::model::{CertificateType, ProjectTask, SelectedEquipment, TaskCertificateRequirements};

/// What a worker must satisfy to be eligible for a task.
///
/// Sets are ordered so that derived lists (missing certificates etc.) come out
/// in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    pub crane_types: BTreeSet<i64>,
    pub certificates: BTreeSet<i64>,
    pub preferred_crane_model_id: Option<i64>,
}

impl RequirementSet {
    pub fn new(
        crane_types: impl IntoIterator<Item = i64>,
        certificates: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            crane_types: crane_types.into_iter().collect(),
            certificates: certificates.into_iter().collect(),
            preferred_crane_model_id: None,
        }
    }

    /// From the task-creation form: equipment picks plus chosen certificate types.
    pub fn from_selection(equipment: &SelectedEquipment, certificates: &[CertificateType]) -> Self {
        Self {
            crane_types: equipment.type_ids.iter().copied().collect(),
            certificates: certificates.iter().map(|c| c.id).collect(),
            preferred_crane_model_id: equipment.model_id,
        }
    }

    /// From a stored task and the certificate requirements the server derived for it.
    pub fn from_task(task: &ProjectTask, certificates: &TaskCertificateRequirements) -> Self {
        Self {
            crane_types: task.required_crane_types.iter().copied().collect(),
            certificates: certificates.certificate_ids().collect(),
            preferred_crane_model_id: task.preferred_crane_model_id,
        }
    }

    /// Builder: set the preferred crane model.
    pub fn with_preferred_model(mut self, model_id: i64) -> Self {
        self.preferred_crane_model_id = Some(model_id);
        self
    }

    /// No crane or certificate constraint at all.
    pub fn is_empty(&self) -> bool {
        self.crane_types.is_empty() && self.certificates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::certificate::RequiredCertificate;

    fn cert_type(id: i64, code: &str) -> CertificateType {
        CertificateType {
            id,
            code: code.to_string(),
            name_da: code.to_string(),
            name_en: code.to_string(),
            description: None,
            requires_medical: false,
            min_age: 18,
            is_active: true,
        }
    }

    #[test]
    fn from_selection_collects_ids_and_dedups() {
        let equipment = SelectedEquipment {
            category_id: Some(1),
            type_ids: vec![3, 2, 3],
            brand_id: Some(4),
            model_id: Some(9),
        };
        let reqs = RequirementSet::from_selection(
            &equipment,
            &[cert_type(10, "CLASS_A"), cert_type(11, "RIGGER")],
        );
        assert_eq!(reqs.crane_types.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(reqs.certificates.len(), 2);
        assert_eq!(reqs.preferred_crane_model_id, Some(9));
    }

    #[test]
    fn empty_selection_is_empty() {
        let reqs = RequirementSet::from_selection(&SelectedEquipment::default(), &[]);
        assert!(reqs.is_empty());
        assert!(!RequirementSet::new([1], []).is_empty());
    }

    #[test]
    fn from_task_uses_server_certificates() {
        let task: ProjectTask = serde_json::from_value(serde_json::json!({
            "task_id": 1,
            "project_id": 1,
            "title": "Lift",
            "required_crane_types": [5],
            "preferred_crane_model_id": 42
        }))
        .unwrap();
        let certs = TaskCertificateRequirements {
            required_certificates: vec![RequiredCertificate {
                certificate_type_id: 10,
                code: "CLASS_A".into(),
                name_en: "Tower crane".into(),
            }],
        };
        let reqs = RequirementSet::from_task(&task, &certs);
        assert!(reqs.crane_types.contains(&5));
        assert!(reqs.certificates.contains(&10));
        assert_eq!(reqs.preferred_crane_model_id, Some(42));
    }
}
