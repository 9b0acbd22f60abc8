//! Equipment catalog endpoints and selection validation.

use super::ChefApi;
use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::{
    CraneCategory, CraneModel, CraneType, EquipmentValidationResult, SelectedEquipment,
};

impl ApiClient {
    pub async fn fetch_crane_categories(&self) -> Result<Vec<CraneCategory>, ApiError> {
        self.get("/api/app/chef/crane-categories", &[("is_active", "true".to_string())])
            .await
    }

    pub async fn fetch_crane_types(&self, category_id: Option<i64>) -> Result<Vec<CraneType>, ApiError> {
        let mut query = vec![("is_active", "true".to_string())];
        if let Some(id) = category_id {
            query.push(("category_id", id.to_string()));
        }
        self.get("/api/app/chef/crane-types", &query).await
    }

    pub async fn fetch_crane_models(
        &self,
        type_id: Option<i64>,
        brand_id: Option<i64>,
    ) -> Result<Vec<CraneModel>, ApiError> {
        let mut query = vec![("is_active", "true".to_string())];
        if let Some(id) = type_id {
            query.push(("type_id", id.to_string()));
        }
        if let Some(id) = brand_id {
            query.push(("brand_id", id.to_string()));
        }
        self.get("/api/app/chef/crane-models", &query).await
    }
}

/// Check a selection against the live catalog.
///
/// A category is valid when it is among the active categories; every selected
/// type must belong to the chosen category. The brand must have models for at
/// least one selected type, and the model must be among them.
pub async fn validate_selection(
    api: &dyn ChefApi,
    selection: &SelectedEquipment,
) -> Result<EquipmentValidationResult, ApiError> {
    let mut result = EquipmentValidationResult::default();

    if let Some(category_id) = selection.category_id {
        let categories = api.fetch_crane_categories().await?;
        result.is_category_valid = categories.iter().any(|c| c.id == category_id);
    }

    if selection.category_id.is_some() || !selection.type_ids.is_empty() {
        let types = api.fetch_crane_types(selection.category_id).await?;
        result.is_type_valid = selection
            .type_ids
            .iter()
            .all(|id| types.iter().any(|t| t.id == *id));
    }

    if selection.brand_id.is_none() && selection.model_id.is_none() {
        return Ok(result);
    }

    let mut models = Vec::new();
    if selection.type_ids.is_empty() {
        models = api.fetch_crane_models(None, selection.brand_id).await?;
    } else {
        for type_id in &selection.type_ids {
            models.extend(api.fetch_crane_models(Some(*type_id), selection.brand_id).await?);
        }
    }

    if selection.brand_id.is_some() {
        result.is_brand_valid = !models.is_empty();
    }
    if let Some(model_id) = selection.model_id {
        result.is_model_valid = models.iter().any(|m| m.id == model_id);
    }

    if !result.is_completely_valid() {
        tracing::debug!(errors = ?result.validation_errors(), "Equipment selection invalid");
    }
    Ok(result)
}
