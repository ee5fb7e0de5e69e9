//! Error taxonomy shared by the annotation engine and its collaborators.

use thiserror::Error;

/// Failures surfaced to the host.
///
/// Interactive editing (drawing, erasing, undo/redo) never produces one of
/// these; only document loading and export do.
#[derive(Debug, Error)]
pub enum InkError {
    /// The source document could not be opened or is corrupt.
    #[error("Load failed: {0}")]
    LoadFailure(String),
    /// A single page failed to rasterize.
    #[error("Render failed for page {page}: {reason}")]
    RenderFailure { page: usize, reason: String },
    /// The output document could not be created or written.
    #[error("Write failed: {0}")]
    WriteFailure(String),
    /// The export was cancelled before completion.
    #[error("Export cancelled")]
    Cancelled,
}

impl InkError {
    /// Build a render failure for `page`.
    pub fn render(page: usize, reason: impl Into<String>) -> Self {
        InkError::RenderFailure {
            page,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for InkError {
    fn from(err: std::io::Error) -> Self {
        InkError::WriteFailure(err.to_string())
    }
}

/// Result type for fallible document operations.
pub type InkResult<T> = Result<T, InkError>;
