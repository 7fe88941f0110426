//! Connection options for the native-style open path

use super::tls::TlsConfig;
use crate::protocol::constants::{DEFAULT_DATABASE, DEFAULT_DIAL_TIMEOUT, DEFAULT_USER};
use crate::protocol::{Compression, Protocol, SettingValue, Settings};
use crate::{Error, Result};
use std::time::Duration;

/// Credentials and default database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    /// Default database for queries
    pub database: String,
    /// Username
    pub username: String,
    /// Password (may be empty)
    pub password: String,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            username: DEFAULT_USER.to_string(),
            password: String::new(),
        }
    }
}

/// Connection options
///
/// Fields are public so callers can build the struct directly; use
/// `Options::builder()` for the fluent form.
#[derive(Debug, Clone)]
pub struct Options {
    /// `host:port` addresses, dialed in order
    pub addr: Vec<String>,
    /// Credentials
    pub auth: Auth,
    /// Settings applied to every query
    pub settings: Settings,
    /// Compression (None = driver default, uncompressed)
    pub compression: Option<Compression>,
    /// TLS configuration (None = plaintext)
    pub tls: Option<TlsConfig>,
    /// Time allowed for TCP connect plus TLS handshake
    pub dial_timeout: Duration,
    /// Interface to speak
    pub protocol: Protocol,
    /// Upper bound on concurrently open connections (driver hint)
    pub max_open_conns: Option<usize>,
    /// How long an idle pooled connection may live (driver hint)
    pub conn_max_lifetime: Option<Duration>,
    /// Client name reported to the server
    pub client_name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            addr: Vec::new(),
            auth: Auth::default(),
            settings: Settings::default(),
            compression: None,
            tls: None,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            protocol: Protocol::default(),
            max_open_conns: None,
            conn_max_lifetime: None,
            client_name: None,
        }
    }
}

impl Options {
    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let options = Options::builder()
    ///     .addr("localhost:9000")
    ///     .username("default")
    ///     .dial_timeout(Duration::from_secs(5))
    ///     .protocol(Protocol::Native)
    ///     .build()?;
    /// ```
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder {
            options: Options::default(),
        }
    }

    /// Whether TLS is configured
    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    /// Check the options are usable
    pub fn validate(&self) -> Result<()> {
        if self.addr.is_empty() {
            return Err(Error::Config("at least one address is required".into()));
        }
        if self.dial_timeout.is_zero() {
            return Err(Error::Config("dial timeout must be positive".into()));
        }
        for addr in &self.addr {
            super::transport::split_addr(addr)?;
        }
        self.settings.validate()
    }
}

/// Builder for `Options`
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Append an address
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.options.addr.push(addr.into());
        self
    }

    /// Set the default database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.options.auth.database = database.into();
        self
    }

    /// Set the username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.options.auth.username = username.into();
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.options.auth.password = password.into();
        self
    }

    /// Add a setting
    pub fn setting(mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.options.settings.insert(name, value);
        self
    }

    /// Replace all settings
    pub fn settings(mut self, settings: Settings) -> Self {
        self.options.settings = settings;
        self
    }

    /// Set compression
    pub fn compression(mut self, compression: impl Into<Compression>) -> Self {
        self.options.compression = Some(compression.into());
        self
    }

    /// Enable TLS
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.options.tls = Some(tls);
        self
    }

    /// Set the dial timeout
    ///
    /// Default: 30 seconds
    pub fn dial_timeout(mut self, duration: Duration) -> Self {
        self.options.dial_timeout = duration;
        self
    }

    /// Set the protocol
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.options.protocol = protocol;
        self
    }

    /// Set the open-connection limit hint
    pub fn max_open_conns(mut self, max: usize) -> Self {
        self.options.max_open_conns = Some(max);
        self
    }

    /// Set the idle connection lifetime hint
    pub fn conn_max_lifetime(mut self, duration: Duration) -> Self {
        self.options.conn_max_lifetime = Some(duration);
        self
    }

    /// Set the client name reported to the server
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.options.client_name = Some(name.into());
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<Options> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CompressionMethod;

    #[test]
    fn test_options_defaults() {
        let options = Options::default();
        assert!(options.addr.is_empty());
        assert_eq!(options.auth.database, "default");
        assert_eq!(options.auth.username, "default");
        assert_eq!(options.auth.password, "");
        assert_eq!(options.dial_timeout, Duration::from_secs(30));
        assert_eq!(options.protocol, Protocol::Native);
        assert!(!options.is_secure());
    }

    #[test]
    fn test_options_builder() {
        let options = Options::builder()
            .addr("localhost:8123")
            .username("tester")
            .password("secret")
            .database("analytics")
            .setting("max_execution_time", 60u64)
            .compression(CompressionMethod::Gzip)
            .dial_timeout(Duration::from_secs(5))
            .protocol(Protocol::Http)
            .max_open_conns(4)
            .client_name("std-tests")
            .build()
            .unwrap();

        assert_eq!(options.addr, vec!["localhost:8123".to_string()]);
        assert_eq!(options.auth.username, "tester");
        assert_eq!(options.auth.password, "secret");
        assert_eq!(options.auth.database, "analytics");
        assert_eq!(options.settings.len(), 1);
        assert_eq!(
            options.compression.map(|c| c.method),
            Some(CompressionMethod::Gzip)
        );
        assert_eq!(options.dial_timeout, Duration::from_secs(5));
        assert_eq!(options.protocol, Protocol::Http);
        assert_eq!(options.max_open_conns, Some(4));
        assert_eq!(options.client_name.as_deref(), Some("std-tests"));
    }

    #[test]
    fn test_options_builder_requires_address() {
        let result = Options::builder().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_options_builder_rejects_bad_address() {
        let result = Options::builder().addr("localhost").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_options_builder_rejects_bad_setting_name() {
        let result = Options::builder()
            .addr("localhost:9000")
            .setting("max_threads; SELECT 1", 2)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_options_builder_rejects_zero_timeout() {
        let result = Options::builder()
            .addr("localhost:9000")
            .dial_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }
}
