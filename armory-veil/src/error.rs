//! Error types for the generator adapter crate.

use std::path::PathBuf;

/// Errors that can occur while driving the external Veil toolkit.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VeilError {
    /// The toolkit binary is not present at the configured path.
    #[error("veil toolkit not found at {path}")]
    ToolkitNotFound { path: PathBuf },

    /// The toolkit exited unsuccessfully.
    #[error("payload generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// The toolkit reported success but the artifact is missing on disk.
    #[error("generated artifact missing at {path}")]
    ArtifactMissing { path: PathBuf },

    /// Underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
