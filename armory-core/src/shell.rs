//! Shell mode, protocol, and cryptor whitelists.
//!
//! Every value a creation form may carry is an explicit enum variant, so an
//! unsupported protocol or cryptor cannot survive past parsing.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;

/// Connection-establishment mode of a generated shell.
///
/// Determines which address field is meaningful: a reverse shell calls back
/// to the listener (`lhost`), a bind shell listens on the target (`rhost`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellMode {
    Reverse,
    Bind,
}

impl ShellMode {
    /// Parses a URL path segment (`"reverse"` / `"bind"`).
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "reverse" => Some(Self::Reverse),
            "bind" => Some(Self::Bind),
            _ => None,
        }
    }

    /// The mode's wire name, as it appears in payload labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reverse => "reverse",
            Self::Bind => "bind",
        }
    }
}

impl fmt::Display for ShellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocols available for reverse shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReverseProtocol {
    #[serde(rename = "tcp")]
    Tcp,
    #[serde(rename = "tcp_rc4")]
    TcpRc4,
    #[serde(rename = "tcp_allports")]
    TcpAllports,
    #[serde(rename = "tcp_dns")]
    TcpDns,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "https")]
    Https,
}

impl ReverseProtocol {
    /// Every supported reverse protocol, in form-rendering order.
    pub const ALL: [Self; 6] = [
        Self::Tcp,
        Self::TcpRc4,
        Self::TcpAllports,
        Self::TcpDns,
        Self::Http,
        Self::Https,
    ];

    /// Parses a form value against the reverse whitelist.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedProtocol`] for any value outside it.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| CoreError::UnsupportedProtocol { value: value.to_owned() })
    }

    /// The protocol's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::TcpRc4 => "tcp_rc4",
            Self::TcpAllports => "tcp_allports",
            Self::TcpDns => "tcp_dns",
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Protocols available for bind shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindProtocol {
    #[serde(rename = "tcp")]
    Tcp,
    #[serde(rename = "tcp_rc4")]
    TcpRc4,
    #[serde(rename = "ipv6_tcp")]
    Ipv6Tcp,
}

impl BindProtocol {
    /// Every supported bind protocol, in form-rendering order.
    pub const ALL: [Self; 3] = [Self::Tcp, Self::TcpRc4, Self::Ipv6Tcp];

    /// Parses a form value against the bind whitelist.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedProtocol`] for any value outside it.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| CoreError::UnsupportedProtocol { value: value.to_owned() })
    }

    /// The protocol's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::TcpRc4 => "tcp_rc4",
            Self::Ipv6Tcp => "ipv6_tcp",
        }
    }
}

/// A protocol together with the shell mode it was validated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellProtocol {
    Reverse(ReverseProtocol),
    Bind(BindProtocol),
}

impl ShellProtocol {
    /// The mode this protocol was validated under.
    #[must_use]
    pub fn mode(self) -> ShellMode {
        match self {
            Self::Reverse(_) => ShellMode::Reverse,
            Self::Bind(_) => ShellMode::Bind,
        }
    }

    /// The protocol's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reverse(p) => p.as_str(),
            Self::Bind(p) => p.as_str(),
        }
    }

    /// Short label for this mode/protocol pair, e.g. `"reverse_tcp"`.
    ///
    /// Used for generator output base names and log fields.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}_{}", self.mode(), self.as_str())
    }

    /// The Metasploit payload identifier for this mode/protocol pair,
    /// e.g. `"windows/meterpreter/reverse_tcp"`.
    #[must_use]
    pub fn msf_payload(self) -> String {
        format!("windows/meterpreter/{}", self.label())
    }
}

impl Serialize for ShellProtocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Obfuscation/encoding schemes applied by the external generator.
///
/// Wire names are spelled exactly as the toolkit expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cryptor {
    #[serde(rename = "AESVirtualAlloc")]
    AesVirtualAlloc,
    #[serde(rename = "ARCVirtualAlloc")]
    ArcVirtualAlloc,
    #[serde(rename = "DESVirtualAlloc")]
    DesVirtualAlloc,
    #[serde(rename = "LetterSubVirtualAlloc")]
    LetterSubVirtualAlloc,
    #[serde(rename = "b64VirtualAlloc")]
    B64VirtualAlloc,
}

impl Cryptor {
    /// Every supported cryptor, in form-rendering order. The set is shared
    /// between both shell modes.
    pub const ALL: [Self; 5] = [
        Self::AesVirtualAlloc,
        Self::ArcVirtualAlloc,
        Self::DesVirtualAlloc,
        Self::LetterSubVirtualAlloc,
        Self::B64VirtualAlloc,
    ];

    /// Parses a form value against the cryptor whitelist.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedCryptor`] for any value outside it.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| CoreError::UnsupportedCryptor { value: value.to_owned() })
    }

    /// The cryptor's wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AesVirtualAlloc => "AESVirtualAlloc",
            Self::ArcVirtualAlloc => "ARCVirtualAlloc",
            Self::DesVirtualAlloc => "DESVirtualAlloc",
            Self::LetterSubVirtualAlloc => "LetterSubVirtualAlloc",
            Self::B64VirtualAlloc => "b64VirtualAlloc",
        }
    }
}
