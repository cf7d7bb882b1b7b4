//! Error taxonomy shared by both pipelines.

use thiserror::Error;

/// Failures surfaced by model loading, inference and result encoding.
#[derive(Debug, Error)]
pub enum NlpError {
    /// Model artefacts are missing, corrupt or incompatible.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// The oracle rejected the input or failed while scoring it.
    #[error("inference failed: {0}")]
    Inference(String),

    #[error(transparent)]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NlpError>;
