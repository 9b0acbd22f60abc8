//! Available-worker endpoints.

use chrono::NaiveDate;

use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::AvailableWorkersResponse;

/// Filters for the available-workers endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerQuery {
    pub date: Option<NaiveDate>,
    pub crane_types: Vec<i64>,
    pub include_availability: bool,
}

impl Default for WorkerQuery {
    fn default() -> Self {
        Self {
            date: None,
            crane_types: Vec::new(),
            include_availability: true,
        }
    }
}

impl WorkerQuery {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Builder: restrict to workers with any of these crane types.
    pub fn with_crane_types(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.crane_types = ids.into_iter().collect();
        self
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if !self.crane_types.is_empty() {
            let ids: Vec<String> = self.crane_types.iter().map(ToString::to_string).collect();
            pairs.push(("crane_types", ids.join(",")));
        }
        if self.include_availability {
            pairs.push(("include_availability", "true".to_string()));
        }
        pairs
    }
}

impl ApiClient {
    /// Workers for an existing task; already-assigned workers are excluded server-side.
    pub async fn fetch_available_workers(
        &self,
        task_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        self.get(
            &format!("/api/app/chef/tasks/{task_id}/available-workers"),
            &query.to_pairs(),
        )
        .await
    }

    /// Workers for a project, used before the task exists.
    pub async fn fetch_project_workers(
        &self,
        project_id: i64,
        query: &WorkerQuery,
    ) -> Result<AvailableWorkersResponse, ApiError> {
        self.get(
            &format!("/api/app/chef/projects/{project_id}/available-workers"),
            &query.to_pairs(),
        )
        .await
    }
}
