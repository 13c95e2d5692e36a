//! Error types for configuration, generation and export.

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation cancelled before stage '{0}'")]
    Cancelled(Stage),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot export an empty grid")]
    EmptyGrid,
}
