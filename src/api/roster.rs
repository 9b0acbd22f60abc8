//! Worker roster endpoints: list, search and maintain the chef's employees.

use serde::Serialize;

use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::{
    CreateWorkerRequest, DeleteWorkerResponse, RosterWorker, UpdateWorkerRequest,
    WorkerSearchResponse, WorkerStatus,
};

/// Paging and include flags for the roster listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub include_profile_image: bool,
    pub include_stats: bool,
    pub include_certificates: bool,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            search: None,
            limit: None,
            offset: None,
            include_profile_image: true,
            include_stats: true,
            include_certificates: true,
        }
    }
}

impl RosterQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        for (key, on) in [
            ("include_profile_image", self.include_profile_image),
            ("include_stats", self.include_stats),
            ("include_certificates", self.include_certificates),
        ] {
            if on {
                pairs.push((key, "true".to_string()));
            }
        }
        pairs
    }
}

#[derive(Serialize)]
struct StatusUpdate {
    status: WorkerStatus,
}

impl ApiClient {
    pub async fn fetch_workers(&self, query: &RosterQuery) -> Result<Vec<RosterWorker>, ApiError> {
        self.get("/api/app/chef/workers", &query.to_pairs()).await
    }

    pub async fn search_workers(
        &self,
        text: &str,
        limit: u32,
        offset: u32,
    ) -> Result<WorkerSearchResponse, ApiError> {
        self.get(
            "/api/app/chef/workers/search",
            &[
                ("q", text.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    pub async fn create_worker(&self, request: &CreateWorkerRequest) -> Result<RosterWorker, ApiError> {
        let worker: RosterWorker = self.post_long("/api/app/chef/workers", request).await?;
        tracing::info!(worker_id = worker.id, name = %worker.name, "Worker created");
        Ok(worker)
    }

    pub async fn update_worker(
        &self,
        worker_id: i64,
        request: &UpdateWorkerRequest,
    ) -> Result<RosterWorker, ApiError> {
        self.put_long(&format!("/api/app/chef/workers/{worker_id}"), request)
            .await
    }

    pub async fn update_worker_status(
        &self,
        worker_id: i64,
        status: WorkerStatus,
    ) -> Result<RosterWorker, ApiError> {
        let worker: RosterWorker = self
            .put(
                &format!("/api/app/chef/workers/{worker_id}/status"),
                &StatusUpdate { status },
            )
            .await?;
        tracing::info!(worker_id, status = status.display_name(), "Worker status changed");
        Ok(worker)
    }

    pub async fn delete_worker(&self, worker_id: i64) -> Result<DeleteWorkerResponse, ApiError> {
        let response: DeleteWorkerResponse = self
            .delete(&format!("/api/app/chef/workers/{worker_id}"), &[])
            .await?;
        tracing::info!(worker_id, message = %response.message, "Worker deleted");
        Ok(response)
    }
}
