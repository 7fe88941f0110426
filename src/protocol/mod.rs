//! Protocol selection and per-connection knobs
//!
//! This module handles:
//! * Which ClickHouse interface to talk to (HTTP or Native)
//! * Compression methods and their connection string spelling
//! * Typed query settings

pub mod constants;
mod compression;
mod settings;

pub use compression::{Compression, CompressionMethod};
pub use settings::{SettingValue, Settings};
pub(crate) use settings::is_valid_name as is_valid_setting_name;

use crate::{Error, Result};

/// ClickHouse interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// HTTP interface
    Http,
    /// Binary native protocol
    #[default]
    Native,
}

impl Protocol {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Native => "native",
        }
    }

    /// Connection string scheme for this protocol
    pub fn scheme(&self, secure: bool) -> &'static str {
        match (self, secure) {
            (Self::Http, false) => constants::schemes::HTTP,
            (Self::Http, true) => constants::schemes::HTTPS,
            (Self::Native, _) => constants::schemes::CLICKHOUSE,
        }
    }

    /// Well-known default port
    pub fn default_port(&self, secure: bool) -> u16 {
        match (self, secure) {
            (Self::Http, false) => constants::ports::HTTP,
            (Self::Http, true) => constants::ports::HTTPS,
            (Self::Native, false) => constants::ports::NATIVE,
            (Self::Native, true) => constants::ports::NATIVE_TLS,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "native" | "clickhouse" | "tcp" => Ok(Self::Native),
            _ => Err(Error::UnsupportedProtocol(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("HTTP".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("native".parse::<Protocol>().unwrap(), Protocol::Native);
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Native);
    }

    #[test]
    fn test_protocol_from_str_unsupported_names_protocol() {
        let err = "grpc".parse::<Protocol>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedProtocol(ref p) if p == "grpc"));
        assert!(err.to_string().contains("grpc"));
    }

    #[test]
    fn test_protocol_scheme() {
        assert_eq!(Protocol::Http.scheme(false), "http");
        assert_eq!(Protocol::Http.scheme(true), "https");
        assert_eq!(Protocol::Native.scheme(false), "clickhouse");
        assert_eq!(Protocol::Native.scheme(true), "clickhouse");
    }

    #[test]
    fn test_protocol_default_port() {
        assert_eq!(Protocol::Http.default_port(false), 8123);
        assert_eq!(Protocol::Http.default_port(true), 8443);
        assert_eq!(Protocol::Native.default_port(false), 9000);
        assert_eq!(Protocol::Native.default_port(true), 9440);
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Http.to_string(), "http");
        assert_eq!(Protocol::Native.to_string(), "native");
    }
}
