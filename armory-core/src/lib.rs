//! Core domain types for the Armory payload service.
//!
//! Defines the payload record, the protocol/cryptor whitelists, form input
//! validation, and the user entity with credential handling.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod id;
pub mod payload;
pub mod shell;
pub mod user;
pub mod validate;

pub use error::CoreError;
pub use id::{PayloadId, UserId};
pub use payload::{GenerationStatus, Payload, UNUSED_ADDR};
pub use shell::{BindProtocol, Cryptor, ReverseProtocol, ShellMode, ShellProtocol};
pub use user::{User, MIN_PASSWORD_LEN};
pub use validate::{validate_address, validate_port, DEFAULT_LPORT};
