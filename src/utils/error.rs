use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} with key {key} already exists")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data store unavailable: {path}")]
    StoreUnavailable { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Conflict,
    Validation,
    Storage,
    Configuration,
}

impl RecommenderError {
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::DuplicateKey { .. } => ErrorCategory::Conflict,
            Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::StoreUnavailable { .. } | Self::CsvError(_) | Self::IoError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Stable machine-readable code used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::CsvError(_) | Self::IoError(_) => "STORAGE_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
    }

    /// HTTP status code the API layer answers with.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict | ErrorCategory::Validation => 400,
            ErrorCategory::Storage | ErrorCategory::Configuration => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommenderError>;
