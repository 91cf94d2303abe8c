//! The payload record: one requested artifact and its generation state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::id::{PayloadId, UserId};
use crate::shell::{BindProtocol, Cryptor, ReverseProtocol, ShellMode, ShellProtocol};
use crate::validate::{validate_address, validate_port};

/// Placeholder stored in whichever address field the shell mode does not use.
pub const UNUSED_ADDR: &str = "0.0.0.0";

/// A persisted record describing one requested generated artifact.
///
/// Created on a successful validated form submission, mutated once to attach
/// the generator result, deleted only by its owning user. Every access checks
/// ownership against `user_id` first.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct Payload {
    /// Unique identifier; immutable after creation.
    pub id: PayloadId,
    /// The owning user. All view/download/delete decisions key off this.
    pub user_id: UserId,
    /// Listener address for reverse shells; [`UNUSED_ADDR`] in bind mode.
    pub lhost: String,
    /// Remote address for bind shells; [`UNUSED_ADDR`] in reverse mode.
    pub rhost: String,
    /// Listener port, already validated (or defaulted).
    pub lport: u16,
    /// Metasploit payload identifier, e.g. `"windows/meterpreter/reverse_tcp"`.
    pub msf_payload: String,
    /// The validated protocol, tagged with its shell mode.
    pub protocol: ShellProtocol,
    /// The validated cryptor.
    pub cryptor: Cryptor,
    /// Where this record is in the generation lifecycle.
    pub status: GenerationStatus,
    /// Path of the generated executable, once generation has succeeded.
    pub file_path: Option<PathBuf>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Where a payload record is in the generation lifecycle.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub enum GenerationStatus {
    /// Persisted, generator not yet finished.
    Pending,
    /// Generator completed and the artifact path is attached.
    Generated,
    /// Generator failed; the record stays in history with the reason.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl Payload {
    /// Validates reverse-shell form input and builds a `Pending` record.
    ///
    /// Validation order is address, port, protocol, cryptor; the first
    /// failure aborts and nothing should be persisted by the caller.
    ///
    /// # Errors
    /// [`CoreError::InvalidListenerAddress`] if `lhost` is not dotted-quad
    /// IPv4, [`CoreError::UnsupportedProtocol`] /
    /// [`CoreError::UnsupportedCryptor`] for values outside the whitelists.
    /// A bad `lport` is not an error; it falls back to the default.
    pub fn reverse(
        user_id: UserId,
        lhost: &str,
        lport: &str,
        protocol: &str,
        cryptor: &str,
    ) -> Result<Self, CoreError> {
        let lhost = validate_address(lhost).ok_or(CoreError::InvalidListenerAddress)?;
        let lport = validate_port(lport);
        let protocol = ShellProtocol::Reverse(ReverseProtocol::parse(protocol)?);
        let cryptor = Cryptor::parse(cryptor)?;
        Ok(Self::new(user_id, lhost, UNUSED_ADDR.to_owned(), lport, protocol, cryptor))
    }

    /// Validates bind-shell form input and builds a `Pending` record.
    ///
    /// # Errors
    /// [`CoreError::InvalidRemoteAddress`] if `rhost` is not dotted-quad
    /// IPv4, [`CoreError::UnsupportedProtocol`] /
    /// [`CoreError::UnsupportedCryptor`] for values outside the whitelists.
    pub fn bind(
        user_id: UserId,
        rhost: &str,
        lport: &str,
        protocol: &str,
        cryptor: &str,
    ) -> Result<Self, CoreError> {
        let rhost = validate_address(rhost).ok_or(CoreError::InvalidRemoteAddress)?;
        let lport = validate_port(lport);
        let protocol = ShellProtocol::Bind(BindProtocol::parse(protocol)?);
        let cryptor = Cryptor::parse(cryptor)?;
        Ok(Self::new(user_id, UNUSED_ADDR.to_owned(), rhost, lport, protocol, cryptor))
    }

    fn new(
        user_id: UserId,
        lhost: String,
        rhost: String,
        lport: u16,
        protocol: ShellProtocol,
        cryptor: Cryptor,
    ) -> Self {
        Self {
            id: PayloadId::new(),
            user_id,
            lhost,
            rhost,
            lport,
            msf_payload: protocol.msf_payload(),
            protocol,
            cryptor,
            status: GenerationStatus::Pending,
            file_path: None,
            created_at: Utc::now(),
        }
    }

    /// The shell mode this payload was created under.
    #[must_use]
    pub fn mode(&self) -> ShellMode {
        self.protocol.mode()
    }

    /// Short label for logs and output base names, e.g. `"reverse_tcp"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.protocol.label()
    }

    /// The address meaningful for this payload's mode.
    #[must_use]
    pub fn target_addr(&self) -> &str {
        match self.mode() {
            ShellMode::Reverse => &self.lhost,
            ShellMode::Bind => &self.rhost,
        }
    }

    /// File name of the generated executable, if generation has completed.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }

    /// File name for the companion resource script.
    ///
    /// Derived from the artifact's stem once generated, from the payload
    /// label otherwise, so the script stays downloadable either way.
    #[must_use]
    pub fn rc_file_name(&self) -> String {
        let stem = self
            .file_path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str());
        match stem {
            Some(stem) => format!("{stem}.rc"),
            None => format!("{}_veil.rc", self.label()),
        }
    }
}
