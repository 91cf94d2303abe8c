//! Veil toolkit backend implementation.
//!
//! Drives the external Veil CLI non-interactively. The toolkit owns the hard
//! parts (cryptor construction, obfuscation, compilation); this controller
//! only assembles its command line and resolves the artifact it reports.
//!
//! # CLI contract
//! The toolkit is invoked as
//! `veil -p <language>/<cryptor> --msfpayload <id> --msfoptions KEY=V.. -c
//! COMPILE_TO_EXE=Y USE_PYHERION=Y -o <base> --output-dir <dir>` and prints
//! the produced executable's path as its last non-empty stdout line.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::generator::{GeneratedArtifact, PayloadGenerator};
use crate::options::{GeneratorOptions, LANGUAGE};
use crate::VeilError;

/// Generator backend that shells out to the Veil toolkit.
#[derive(Debug, Clone)]
pub struct VeilController {
    /// Path to the toolkit binary.
    binary_path: PathBuf,

    /// Directory the toolkit writes artifacts into.
    output_dir: PathBuf,
}

impl VeilController {
    /// Create a controller with the given paths.
    ///
    /// # Arguments
    /// - `binary_path`: path to the toolkit binary
    /// - `output_dir`: directory for generated artifacts (must be writable)
    #[must_use]
    pub fn new(binary_path: PathBuf, output_dir: PathBuf) -> Self {
        Self { binary_path, output_dir }
    }

    /// Create a controller using system defaults.
    ///
    /// Looks for `veil` in `$PATH` and writes artifacts under
    /// `/tmp/armory-output`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PathBuf::from("veil"), PathBuf::from("/tmp/armory-output"))
    }
}

#[async_trait]
impl PayloadGenerator for VeilController {
    async fn generate(
        &self,
        options: &GeneratorOptions,
    ) -> Result<GeneratedArtifact, VeilError> {
        tracing::info!(
            msf_payload = %options.msf_payload,
            cryptor = %options.cryptor,
            output_base = %options.output_base,
            "invoking veil toolkit"
        );

        let output = Command::new(&self.binary_path)
            .args(command_args(options, &self.output_dir))
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VeilError::ToolkitNotFound { path: self.binary_path.clone() }
                } else {
                    VeilError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VeilError::GenerationFailed {
                reason: match stderr.trim() {
                    "" => format!("toolkit exited with {}", output.status),
                    detail => detail.to_owned(),
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let file_path = parse_artifact_path(&stdout).ok_or_else(|| {
            VeilError::GenerationFailed {
                reason: "toolkit did not report an output path".to_owned(),
            }
        })?;
        if !file_path.exists() {
            return Err(VeilError::ArtifactMissing { path: file_path });
        }

        tracing::info!(file_path = %file_path.display(), "veil toolkit finished");
        Ok(GeneratedArtifact { file_path })
    }
}

/// Assemble the toolkit command line for one invocation.
fn command_args(options: &GeneratorOptions, output_dir: &std::path::Path) -> Vec<String> {
    let mut args = vec![
        "-p".to_owned(),
        format!("{LANGUAGE}/{}", options.cryptor),
        "--msfpayload".to_owned(),
        options.msf_payload.clone(),
        "--msfoptions".to_owned(),
    ];
    args.extend(options.msf_options.iter().cloned());
    args.push("-c".to_owned());
    if options.compile_to_exe {
        args.push("COMPILE_TO_EXE=Y".to_owned());
    }
    if options.use_pyherion {
        args.push("USE_PYHERION=Y".to_owned());
    }
    args.push("-o".to_owned());
    args.push(options.output_base.clone());
    args.push("--output-dir".to_owned());
    args.push(output_dir.display().to_string());
    args
}

/// The artifact path is the toolkit's last non-empty stdout line.
fn parse_artifact_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
