//! ClickHouse interface constants

use std::time::Duration;

/// Default ports per interface
pub mod ports {
    /// Plain HTTP interface
    pub const HTTP: u16 = 8123;

    /// HTTPS interface
    pub const HTTPS: u16 = 8443;

    /// Plain native protocol
    pub const NATIVE: u16 = 9000;

    /// TLS native protocol
    pub const NATIVE_TLS: u16 = 9440;
}

/// Connection string schemes
pub mod schemes {
    /// HTTP interface
    pub const HTTP: &str = "http";

    /// HTTP interface over TLS
    pub const HTTPS: &str = "https";

    /// Native protocol
    pub const CLICKHOUSE: &str = "clickhouse";

    /// Native protocol (alias)
    pub const TCP: &str = "tcp";
}

/// HTTP interface headers
pub mod headers {
    /// User name
    pub const USER: &str = "X-ClickHouse-User";

    /// Password
    pub const KEY: &str = "X-ClickHouse-Key";
}

/// Database used when none is given
pub const DEFAULT_DATABASE: &str = "default";

/// User used when none is given
pub const DEFAULT_USER: &str = "default";

/// Dial timeout when none is configured
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Dial timeout used by the test connection helpers
pub const TEST_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Query returning the server version string
pub const VERSION_QUERY: &str = "SELECT version()";
