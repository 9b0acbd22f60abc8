//! Worker document endpoints.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ApiError;
use crate::model::{
    DeleteWorkerDocumentResponse, DocumentCategory, DocumentUpload, UploadWorkerDocumentResponse,
    WorkerDocument, WorkerDocumentsResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveDocument<'a> {
    from_key: &'a str,
    new_category: DocumentCategory,
}

#[derive(Deserialize)]
struct DownloadLink {
    download_url: String,
}

fn document_pairs(
    category: Option<DocumentCategory>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(category) = category {
        pairs.push(("category", category.to_string()));
    }
    if let Some(limit) = limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        pairs.push(("offset", offset.to_string()));
    }
    pairs
}

fn upload_form(upload: &DocumentUpload) -> Result<Form, ApiError> {
    let file = Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.mime_type)?;
    Ok(Form::new()
        .part("files", file)
        .text("category", upload.category.to_string()))
}

impl ApiClient {
    pub async fn fetch_worker_documents(
        &self,
        worker_id: i64,
        category: Option<DocumentCategory>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<WorkerDocumentsResponse, ApiError> {
        self.get(
            &format!("/api/app/chef/workers/{worker_id}/documents"),
            &document_pairs(category, limit, offset),
        )
        .await
    }

    pub async fn upload_worker_document(
        &self,
        worker_id: i64,
        upload: &DocumentUpload,
    ) -> Result<UploadWorkerDocumentResponse, ApiError> {
        let response: UploadWorkerDocumentResponse = self
            .post_multipart(
                &format!("/api/app/chef/workers/{worker_id}/documents"),
                upload_form(upload)?,
            )
            .await?;
        tracing::info!(
            worker_id,
            file = %upload.file_name,
            category = %upload.category,
            uploaded = response.uploaded.len(),
            "Document uploaded"
        );
        Ok(response)
    }

    /// Move a document to another category.
    pub async fn move_worker_document(
        &self,
        worker_id: i64,
        key: &str,
        category: DocumentCategory,
    ) -> Result<WorkerDocument, ApiError> {
        self.patch_long(
            &format!("/api/app/chef/workers/{worker_id}/documents"),
            &MoveDocument {
                from_key: key,
                new_category: category,
            },
        )
        .await
    }

    pub async fn delete_worker_document(
        &self,
        worker_id: i64,
        key: &str,
    ) -> Result<DeleteWorkerDocumentResponse, ApiError> {
        let response: DeleteWorkerDocumentResponse = self
            .delete(
                &format!("/api/app/chef/workers/{worker_id}/documents"),
                &[("key", key.to_string())],
            )
            .await?;
        tracing::info!(worker_id, key, "Document deleted");
        Ok(response)
    }

    /// Short-lived download link for one document.
    pub async fn document_download_url(
        &self,
        worker_id: i64,
        document_id: &str,
    ) -> Result<String, ApiError> {
        let link: DownloadLink = self
            .get(
                &format!("/api/app/chef/workers/{worker_id}/documents/{document_id}/download"),
                &[],
            )
            .await?;
        Ok(link.download_url)
    }
}
