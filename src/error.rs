//! Error types for the chef client.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decoding error: {0}")]
    Decoding(#[from] serde_json::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl ApiError {
    /// HTTP status carried by a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message for a failed task creation, keyed by status code.
    pub fn task_creation_message(&self) -> String {
        match self {
            Self::Server { status, message } => match status {
                400 => "Invalid task data. Please check all fields and try again.".into(),
                401 => "Authentication expired. Please log in again.".into(),
                403 => "You don't have permission to create tasks for this project.".into(),
                404 => "Project not found. Please refresh and try again.".into(),
                409 => "A task with this name already exists in the project.".into(),
                422 => {
                    "Some workers are not available for assignment. Please review your selection."
                        .into()
                }
                500 if message.contains("Foreign key constraint") => {
                    "Selected supervisor is no longer available. Please choose a different supervisor."
                        .into()
                }
                500 => "Server error occurred. Please try again.".into(),
                _ => message.clone(),
            },
            Self::Network(_) => {
                "Network connection error. Please check your internet connection and try again."
                    .into()
            }
            Self::Decoding(_) => "Unexpected response from server. Please try again.".into(),
            _ => "An unexpected error occurred. Please try again.".into(),
        }
    }

    /// Message for a failed worker removal from a task.
    pub fn assignment_removal_message(&self) -> String {
        match self {
            Self::Server { status: 404, .. } => "Worker assignment no longer exists".into(),
            Self::Server { status: 403, .. } => {
                "You don't have permission to remove this worker".into()
            }
            Self::Server { status: 409, .. } => {
                "Cannot remove worker - task is currently active".into()
            }
            Self::Network(_) => "Network error - please check your connection".into(),
            _ => "Failed to remove worker from task".into(),
        }
    }

    /// Message for a failed roster worker creation.
    pub fn worker_creation_message(&self) -> String {
        match self {
            Self::Server { status: 409, .. } => "A worker with this email already exists.".into(),
            Self::Server { status: 400, .. } => {
                "Invalid data provided. Please check your inputs.".into()
            }
            Self::Server { status, message } => format!("Server error ({status}): {message}"),
            Self::Network(_) => "Network error. Please check your connection and try again.".into(),
            Self::Decoding(_) => "Error processing server response. Please try again.".into(),
            _ => "An unexpected error occurred. Please try again.".into(),
        }
    }
}

/// Errors raised by the task and roster flows before or around API calls.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{title}: {message}")]
    Validation { title: String, message: String },

    #[error("Worker assignment not found")]
    AssignmentNotFound { assignment_id: i64 },

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl TaskError {
    pub(crate) fn validation(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Wrap an API failure, keeping its display text as the message.
    pub(crate) fn api(source: ApiError) -> Self {
        Self::Api {
            message: source.to_string(),
            source,
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
