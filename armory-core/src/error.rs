/// Errors produced by the `armory-core` crate.
///
/// The `Display` strings of the validation variants are the messages shown
/// back to the user on the originating form.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The listener address is not a dotted-quad IPv4 address.
    #[error("Invalid listener address")]
    InvalidListenerAddress,

    /// The remote address is not a dotted-quad IPv4 address.
    #[error("Invalid remote address")]
    InvalidRemoteAddress,

    /// The protocol is not in the whitelist for the requested shell mode.
    #[error("Invalid protocol")]
    UnsupportedProtocol { value: String },

    /// The cryptor is not in the supported set.
    #[error("Invalid cryptor")]
    UnsupportedCryptor { value: String },

    /// Hashing a credential failed.
    #[error("password hashing failed: {reason}")]
    PasswordHash { reason: String },
}
