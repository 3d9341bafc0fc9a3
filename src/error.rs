// src/error.rs
use polypdf_core::{ConversionError, ConvertError, StructuralError};
use polypdf_registry::RegistryError;
use polypdf_render_core::RenderError;
use thiserror::Error;

/// A comprehensive error type for the entire document generation pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid document root: {0}")]
    Structural(#[from] StructuralError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Rendering failed: {0}")]
    Engine(#[from] RenderError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<ConvertError> for PipelineError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::Structural(e) => PipelineError::Structural(e),
            ConvertError::Conversion(e) => PipelineError::Conversion(e),
        }
    }
}
