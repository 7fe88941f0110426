//! Compression modes

use crate::{Error, Result};

/// Compression method negotiated with the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// No compression
    #[default]
    None,
    /// LZ4 block compression (native protocol)
    Lz4,
    /// Zstandard
    Zstd,
    /// gzip (HTTP only)
    Gzip,
    /// deflate (HTTP only)
    Deflate,
    /// Brotli (HTTP only)
    Brotli,
}

impl CompressionMethod {
    /// Check if the HTTP driver can decode this method from a response
    ///
    /// Only `Content-Encoding` compression is used over HTTP. ClickHouse's
    /// own LZ4 block format (`compress=1` on the HTTP interface) is not
    /// spoken by this crate, so LZ4 requests run uncompressed.
    pub fn supported_over_http(&self) -> bool {
        !matches!(self, Self::Lz4)
    }

    /// Check if the native driver honours this method
    ///
    /// The native driver always negotiates LZ4 and cannot be told
    /// otherwise, so every other request, `None` included, is overridden.
    pub fn supported_over_native(&self) -> bool {
        matches!(self, Self::Lz4)
    }

    /// Method actually in effect when `self` is requested over HTTP
    pub fn effective_over_http(&self) -> Self {
        if self.supported_over_http() {
            *self
        } else {
            Self::None
        }
    }

    /// Method actually in effect when `self` is requested over the native protocol
    pub fn effective_over_native(&self) -> Self {
        Self::Lz4
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Lz4 => write!(f, "lz4"),
            Self::Zstd => write!(f, "zstd"),
            Self::Gzip => write!(f, "gzip"),
            Self::Deflate => write!(f, "deflate"),
            Self::Brotli => write!(f, "br"),
        }
    }
}

impl std::str::FromStr for CompressionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" | "false" | "0" => Ok(Self::None),
            "lz4" | "true" | "1" => Ok(Self::Lz4),
            "zstd" => Ok(Self::Zstd),
            "gzip" => Ok(Self::Gzip),
            "deflate" => Ok(Self::Deflate),
            "br" | "brotli" => Ok(Self::Brotli),
            _ => Err(Error::Config(format!(
                "invalid compress '{}': expected lz4, zstd, gzip, deflate, br, true, or false",
                s
            ))),
        }
    }
}

/// Compression settings for a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compression {
    /// Method
    pub method: CompressionMethod,
    /// Optional level (method specific)
    pub level: Option<i32>,
}

impl Compression {
    /// Compression with the method's default level
    pub fn new(method: CompressionMethod) -> Self {
        Self {
            method,
            level: None,
        }
    }

    /// Set the level
    pub fn level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Check if any compression is requested
    pub fn is_enabled(&self) -> bool {
        self.method != CompressionMethod::None
    }
}

impl From<CompressionMethod> for Compression {
    fn from(method: CompressionMethod) -> Self {
        Self::new(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_method_from_str() {
        assert_eq!("lz4".parse::<CompressionMethod>().unwrap(), CompressionMethod::Lz4);
        assert_eq!("LZ4".parse::<CompressionMethod>().unwrap(), CompressionMethod::Lz4);
        assert_eq!("zstd".parse::<CompressionMethod>().unwrap(), CompressionMethod::Zstd);
        assert_eq!("gzip".parse::<CompressionMethod>().unwrap(), CompressionMethod::Gzip);
        assert_eq!(
            "deflate".parse::<CompressionMethod>().unwrap(),
            CompressionMethod::Deflate
        );
        assert_eq!("br".parse::<CompressionMethod>().unwrap(), CompressionMethod::Brotli);
    }

    #[test]
    fn test_compression_method_boolean_spellings() {
        assert_eq!("true".parse::<CompressionMethod>().unwrap(), CompressionMethod::Lz4);
        assert_eq!("1".parse::<CompressionMethod>().unwrap(), CompressionMethod::Lz4);
        assert_eq!("false".parse::<CompressionMethod>().unwrap(), CompressionMethod::None);
        assert_eq!("0".parse::<CompressionMethod>().unwrap(), CompressionMethod::None);
        assert_eq!("".parse::<CompressionMethod>().unwrap(), CompressionMethod::None);
    }

    #[test]
    fn test_compression_method_invalid() {
        assert!("snappy".parse::<CompressionMethod>().is_err());
    }

    #[test]
    fn test_compression_method_display_parses_back() {
        for method in [
            CompressionMethod::None,
            CompressionMethod::Lz4,
            CompressionMethod::Zstd,
            CompressionMethod::Gzip,
            CompressionMethod::Deflate,
            CompressionMethod::Brotli,
        ] {
            assert_eq!(method.to_string().parse::<CompressionMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_compression_support_matrix() {
        assert!(!CompressionMethod::Lz4.supported_over_http());
        assert!(CompressionMethod::Gzip.supported_over_http());
        assert!(CompressionMethod::Lz4.supported_over_native());
        assert!(!CompressionMethod::Gzip.supported_over_native());
        assert!(!CompressionMethod::None.supported_over_native());
    }

    #[test]
    fn test_effective_compression() {
        assert_eq!(CompressionMethod::Gzip.effective_over_http(), CompressionMethod::Gzip);
        assert_eq!(CompressionMethod::Lz4.effective_over_http(), CompressionMethod::None);
        assert_eq!(CompressionMethod::None.effective_over_http(), CompressionMethod::None);
        assert_eq!(CompressionMethod::None.effective_over_native(), CompressionMethod::Lz4);
        assert_eq!(CompressionMethod::Zstd.effective_over_native(), CompressionMethod::Lz4);
    }

    #[test]
    fn test_compression_builder() {
        let c = Compression::new(CompressionMethod::Zstd).level(3);
        assert!(c.is_enabled());
        assert_eq!(c.level, Some(3));
        assert!(!Compression::default().is_enabled());
    }
}
