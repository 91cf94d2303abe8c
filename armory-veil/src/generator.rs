//! Generator abstraction trait.
//!
//! Keeps the generation backend swappable so gateway tests can substitute
//! a mock and deployments can point at different toolkit builds.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{GeneratorOptions, VeilError};

/// Result of a successful generator invocation.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GeneratedArtifact {
    /// Absolute path of the compiled executable on disk.
    pub file_path: PathBuf,
}

/// A payload generation backend.
///
/// Implementations must be `Send + Sync` to allow sharing across request
/// handlers. The call blocks for the full duration of generation; retry,
/// timeout, and cancellation are the toolkit's concern, not this trait's.
#[async_trait]
pub trait PayloadGenerator: Send + Sync {
    /// Generate an executable for the given options and return where the
    /// artifact landed.
    ///
    /// # Errors
    /// Returns [`VeilError::ToolkitNotFound`] if the backend binary is
    /// absent, [`VeilError::GenerationFailed`] if the toolkit exits
    /// unsuccessfully, and [`VeilError::ArtifactMissing`] if the reported
    /// output path does not exist.
    async fn generate(&self, options: &GeneratorOptions)
        -> Result<GeneratedArtifact, VeilError>;
}
