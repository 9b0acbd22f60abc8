//! Worker documents stored under `documents/{worker_id}/{category}/{file}`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Contracts,
    Certificates,
    Licenses,
    Reports,
    Photos,
    General,
}

impl DocumentCategory {
    pub const ALL: [Self; 6] = [
        Self::Contracts,
        Self::Certificates,
        Self::Licenses,
        Self::Reports,
        Self::Photos,
        Self::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contracts => "contracts",
            Self::Certificates => "certificates",
            Self::Licenses => "licenses",
            Self::Reports => "reports",
            Self::Photos => "photos",
            Self::General => "general",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Contracts => "Contracts",
            Self::Certificates => "Certificates",
            Self::Licenses => "Licenses",
            Self::Reports => "Reports",
            Self::Photos => "Photos",
            Self::General => "General",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown document category: {s}"))
    }
}

/// Timestamps the storage backend cannot format are treated as unknown.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|t| t.with_timezone(&Utc))))
}

/// A stored document. The storage listing uses camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDocument {
    pub key: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extension: String,
    #[serde(default)]
    pub is_folder: bool,
}

impl WorkerDocument {
    /// Category from the storage key, falling back to the `category` field.
    ///
    /// The backend reports the top-level folder as `documents`; that maps to
    /// [`DocumentCategory::General`].
    pub fn document_category(&self) -> DocumentCategory {
        let from_key = self
            .key
            .split('/')
            .nth(2)
            .and_then(|part| part.parse().ok());
        from_key.unwrap_or_else(|| match self.category.as_str() {
            "documents" => DocumentCategory::General,
            other => other.parse().unwrap_or(DocumentCategory::General),
        })
    }
}

/// Response of `GET /workers/{id}/documents`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkerDocumentsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<WorkerDocument>,
    #[serde(default)]
    pub total_count: usize,
    /// Document count per category name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: BTreeMap<String, usize>,
}

/// A file to upload for a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub category: DocumentCategory,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub name: String,
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadWorkerDocumentResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uploaded: Vec<UploadedDocument>,
    #[serde(default)]
    pub worker_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteWorkerDocumentResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub document_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(key: &str, category: &str) -> WorkerDocument {
        WorkerDocument {
            key: key.to_string(),
            name: "file.pdf".to_string(),
            last_modified: None,
            size: None,
            url: String::new(),
            category: category.to_string(),
            extension: "pdf".to_string(),
            is_folder: false,
        }
    }

    #[test]
    fn category_comes_from_key_first() {
        assert_eq!(
            document("documents/4/licenses/file.pdf", "general").document_category(),
            DocumentCategory::Licenses
        );
        assert_eq!(
            document("documents/4/file.pdf", "documents").document_category(),
            DocumentCategory::General
        );
        assert_eq!(
            document("documents/4/misc/file.pdf", "photos").document_category(),
            DocumentCategory::Photos
        );
        assert_eq!(
            document("other", "nonsense").document_category(),
            DocumentCategory::General
        );
    }

    #[test]
    fn unparseable_timestamp_is_unknown() {
        let json = r#"{
            "key": "documents/4/reports/r.pdf", "name": "r.pdf",
            "lastModified": "yesterday", "size": 1024, "url": "https://cdn/r.pdf",
            "category": "reports", "extension": "pdf", "isFolder": false
        }"#;
        let doc: WorkerDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.last_modified, None);
        assert_eq!(doc.size, Some(1024));

        let dated: WorkerDocument = serde_json::from_str(
            r#"{"key": "k", "name": "n", "lastModified": "2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert!(dated.last_modified.is_some());
        assert!(!dated.is_folder);
    }

    #[test]
    fn categories_parse_from_wire_names() {
        for category in DocumentCategory::ALL {
            assert_eq!(category.to_string().parse::<DocumentCategory>(), Ok(category));
        }
        assert!("documents".parse::<DocumentCategory>().is_err());
    }
}
