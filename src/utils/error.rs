use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    RequestError { message: String },

    #[error("{message}")]
    UploadTooLarge { message: String },

    #[error("{message}")]
    ModelError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Model,
    Request,
    Archive,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FixerError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::RequestError {
            message: message.into(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::ModelError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ZipError(_) => ErrorCategory::Archive,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::System,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::RequestError { .. } | Self::UploadTooLarge { .. } => ErrorCategory::Request,
            Self::ModelError { .. } => ErrorCategory::Model,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RequestError { .. } | Self::UploadTooLarge { .. } => ErrorSeverity::Low,
            Self::ApiError(_) | Self::ModelError { .. } => ErrorSeverity::Medium,
            Self::ZipError(_) => ErrorSeverity::High,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags, environment variables and config file"
            }
            ErrorCategory::Network => "Check connectivity to the model endpoint and retry",
            ErrorCategory::Model => "Verify GEMINI_API_KEY and the model name, then retry",
            ErrorCategory::Request => "Send a multipart form with one or more 'files' parts",
            ErrorCategory::Archive => "Retry the request; the archive could not be written",
            ErrorCategory::System => "Check that the port is free and the process has permission to bind it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("'{}' is invalid: {}", field, reason)
            }
            Self::IoError(e) => format!("System error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestError { .. } => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FixerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {} (Category: {:?})", self, self.category());
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, FixerError>;
