//! Equipment: crane types, crane models and the task's equipment selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level equipment grouping, as served by `/crane-categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraneCategory {
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "iconUrl")]
    pub icon_url: Option<String>,
    #[serde(default, rename = "displayOrder")]
    pub display_order: i32,
    #[serde(default = "super::default_true", rename = "isActive")]
    pub is_active: bool,
}

impl CraneCategory {
    pub fn new(id: i64, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            description: None,
            icon_url: None,
            display_order: 0,
            is_active: true,
        }
    }
}

/// A crane type (operation skill category), as served by `/crane-types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraneType {
    #[serde(alias = "crane_type_id")]
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "categoryId", alias = "category_id")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "super::default_true", rename = "isActive", alias = "is_active")]
    pub is_active: bool,
}

impl CraneType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category_id: None,
            code: None,
            description: None,
            is_active: true,
        }
    }
}

/// Crane-type skill attached to an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCraneType {
    pub crane_type_id: i64,
    pub name: String,
    #[serde(default)]
    pub certification_date: Option<DateTime<Utc>>,
}

/// A concrete crane model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraneModel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "typeId", alias = "type_id")]
    pub type_id: Option<i64>,
    #[serde(default, rename = "brandId", alias = "brand_id")]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Equipment requirements picked for a task.
///
/// Only `type_ids` feeds eligibility; category and brand are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedEquipment {
    pub category_id: Option<i64>,
    pub type_ids: Vec<i64>,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
}

impl SelectedEquipment {
    pub fn with_types(type_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            type_ids: type_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn has_selection(&self) -> bool {
        !self.type_ids.is_empty() || self.model_id.is_some()
    }

    pub fn is_complete(&self) -> bool {
        !self.type_ids.is_empty()
    }

    /// Human-readable summary of the selection.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if let Some(category_id) = self.category_id {
            parts.push(format!("Category ID: {category_id}"));
        }
        match self.type_ids.as_slice() {
            [] => {}
            [only] => parts.push(format!("1 crane type (ID: {only})")),
            many => parts.push(format!(
                "{} crane types (IDs: {})",
                many.len(),
                many.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
        if let Some(brand_id) = self.brand_id {
            parts.push(format!("Brand ID: {brand_id}"));
        }
        if let Some(model_id) = self.model_id {
            parts.push(format!("Model ID: {model_id}"));
        }

        if parts.is_empty() {
            "No equipment selected".to_string()
        } else {
            parts.join(" • ")
        }
    }
}

/// Outcome of checking an equipment selection against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentValidationResult {
    pub is_category_valid: bool,
    pub is_type_valid: bool,
    pub is_brand_valid: bool,
    pub is_model_valid: bool,
}

impl Default for EquipmentValidationResult {
    fn default() -> Self {
        Self {
            is_category_valid: true,
            is_type_valid: true,
            is_brand_valid: true,
            is_model_valid: true,
        }
    }
}

impl EquipmentValidationResult {
    pub fn is_completely_valid(&self) -> bool {
        self.is_category_valid && self.is_type_valid && self.is_brand_valid && self.is_model_valid
    }

    pub fn validation_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if !self.is_category_valid {
            errors.push("Invalid category selection");
        }
        if !self.is_type_valid {
            errors.push("Type not available in selected category");
        }
        if !self.is_brand_valid {
            errors.push("Brand has no models for selected type");
        }
        if !self.is_model_valid {
            errors.push("Model not available for selected type/brand combination");
        }
        errors
    }
}
