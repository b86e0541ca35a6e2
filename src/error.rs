use thiserror::Error;

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PortalError {
    /// True when the caller sent something wrong (unknown collection, bad record).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PortalError::NotFound(_) | PortalError::Validation(_))
    }
}
