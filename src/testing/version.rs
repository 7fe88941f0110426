//! Server version gate

use crate::client::Database;
use crate::protocol::constants::VERSION_QUERY;
use crate::{Error, Result};
use async_trait::async_trait;

/// A three-part server version, ordered major, then minor, then patch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    /// Major
    pub major: u64,
    /// Minor
    pub minor: u64,
    /// Patch
    pub patch: u64,
}

impl ServerVersion {
    /// Create a version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dot-separated version leniently.
    ///
    /// Missing and non-numeric components read as zero; anything past the
    /// third component is ignored (`"24.3.1.2672"` is 24.3.1).
    pub fn parse(s: &str) -> Self {
        let mut version = Self::default();
        for (i, part) in s.trim().split('.').enumerate() {
            let value = part.parse::<u64>().unwrap_or(0);
            match i {
                0 => version.major = value,
                1 => version.minor = value,
                2 => version.patch = value,
                _ => break,
            }
        }
        version
    }
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for ServerVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<(u64, u64, u64)> for ServerVersion {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Self::new(major, minor, patch)
    }
}

/// Anything that can report the server's version string
#[async_trait]
pub trait ServerVersionSource {
    /// Raw result of `SELECT version()`
    async fn server_version(&self) -> Result<String>;
}

#[async_trait]
impl ServerVersionSource for Database {
    async fn server_version(&self) -> Result<String> {
        self.query_string(VERSION_QUERY).await
    }
}

/// Fail unless the server is at least `major.minor.patch`.
///
/// # Panics
///
/// Panics if the version query itself fails: a test that cannot even ask
/// the server for its version has nothing left to check.
pub async fn check_min_server_version<S>(conn: &S, major: u64, minor: u64, patch: u64) -> Result<()>
where
    S: ServerVersionSource + Sync + ?Sized,
{
    let raw = match conn.server_version().await {
        Ok(raw) => raw,
        Err(e) => panic!("{}: {}", VERSION_QUERY, e),
    };

    let actual = ServerVersion::parse(&raw);
    let required = ServerVersion::new(major, minor, patch);
    if actual < required {
        tracing::debug!(%actual, %required, "server older than required");
        crate::metrics::counters::version_gate(crate::metrics::labels::STATUS_SKIPPED);
        return Err(Error::UnsupportedServerVersion { actual, required });
    }

    crate::metrics::counters::version_gate(crate::metrics::labels::STATUS_OK);
    Ok(())
}

/// Return early from the calling test unless the server is new enough.
///
/// ```ignore
/// #[tokio::test]
/// async fn test_json_type() {
///     let conn = get_std_dsn_connection(Protocol::Native, false, "lz4").unwrap();
///     skip_unless_server_version!(&conn, 24, 8, 0);
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! skip_unless_server_version {
    ($conn:expr, $major:expr, $minor:expr, $patch:expr) => {
        if let Err(e) =
            $crate::testing::check_min_server_version($conn, $major, $minor, $patch).await
        {
            eprintln!("Skipping test: {}", e);
            return;
        }
    };
}
