//! Connection string (DSN) parsing
//!
//! Supports formats:
//! * http://[user[:password]@]host[:port][/database][?params]
//! * https://[user[:password]@]host[:port][/database][?params]
//! * clickhouse://[user[:password]@]host[:port][/database][?params]
//! * tcp://... (alias of clickhouse://)
//!
//! Recognized parameters: `secure`, `skip_verify`, `compress`,
//! `compress_level`, `dial_timeout`, `database`. Anything else is kept as a
//! query setting.

use crate::connection::{Auth, Options, TlsConfig};
use crate::protocol::constants::{schemes, DEFAULT_DATABASE, DEFAULT_DIAL_TIMEOUT, DEFAULT_USER};
use crate::protocol::{
    is_valid_setting_name as is_valid_name, Compression, CompressionMethod, Protocol,
    SettingValue, Settings,
};
use crate::{Error, Result};
use std::time::Duration;
use url::Url;

/// Parsed connection info
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
    /// Interface selected by the scheme
    pub protocol: Protocol,
    /// TLS requested (`https://` or `secure=true`)
    pub secure: bool,
    /// Skip server certificate verification
    pub skip_verify: bool,
    /// Host
    pub host: String,
    /// Port
    pub port: u16,
    /// Database name
    pub database: String,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Compression
    pub compression: Compression,
    /// Dial timeout (None = driver default)
    pub dial_timeout: Option<Duration>,
    /// Remaining parameters, as settings
    pub settings: Settings,
}

/// Parse a boolean query parameter the way ClickHouse drivers spell them
fn parse_bool_param(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(Error::Config(format!(
            "invalid {} '{}': expected true or false",
            name, value
        ))),
    }
}

/// Parse a duration such as `5s`, `300ms`, `1m`, or a bare number of seconds
fn parse_duration_param(value: &str) -> Result<Duration> {
    let invalid = || Error::Config(format!("invalid dial_timeout '{}'", value));
    let (digits, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(pos) => value.split_at(pos),
        None => (value, "s"),
    };
    let n: u64 = digits.parse().map_err(|_| invalid())?;
    match unit {
        "ms" => Ok(Duration::from_millis(n)),
        "s" => Ok(Duration::from_secs(n)),
        "m" => Ok(Duration::from_secs(n * 60)),
        _ => Err(invalid()),
    }
}

/// Infer a setting's type from its DSN spelling
fn setting_from_param(value: &str) -> SettingValue {
    match value.to_ascii_lowercase().as_str() {
        "true" => SettingValue::Bool(true),
        "false" => SettingValue::Bool(false),
        _ => match value.parse::<i64>() {
            Ok(n) => SettingValue::Int(n),
            Err(_) => SettingValue::String(value.to_string()),
        },
    }
}

fn decode(component: &str) -> Result<String> {
    urlencoding::decode(component)
        .map(|s| s.into_owned())
        .map_err(|_| Error::Config("connection string is not valid UTF-8".into()))
}

impl ConnectionInfo {
    /// Parse connection string
    pub fn parse(s: &str) -> Result<Self> {
        let url = Url::parse(s).map_err(|e| Error::Config(format!("invalid DSN: {}", e)))?;

        let (protocol, mut secure) = match url.scheme() {
            schemes::HTTP => (Protocol::Http, false),
            schemes::HTTPS => (Protocol::Http, true),
            schemes::CLICKHOUSE | schemes::TCP => (Protocol::Native, false),
            other => return Err(Error::UnsupportedProtocol(other.to_string())),
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::Config("DSN is missing a host".into()))?
            .to_string();

        let username = if url.username().is_empty() {
            DEFAULT_USER.to_string()
        } else {
            decode(url.username())?
        };
        let password = match url.password() {
            Some(p) => decode(p)?,
            None => String::new(),
        };

        let mut database = match url.path().trim_matches('/') {
            "" => DEFAULT_DATABASE.to_string(),
            db => decode(db)?,
        };

        let mut skip_verify = false;
        let mut method = CompressionMethod::None;
        let mut level = None;
        let mut dial_timeout = None;
        let mut settings = Settings::new();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secure" => secure = secure || parse_bool_param("secure", &value)?,
                "skip_verify" => skip_verify = parse_bool_param("skip_verify", &value)?,
                "compress" => method = value.parse()?,
                "compress_level" => {
                    level = Some(value.parse().map_err(|_| {
                        Error::Config(format!("invalid compress_level '{}'", value))
                    })?)
                }
                "dial_timeout" => dial_timeout = Some(parse_duration_param(&value)?),
                "database" => database = value.into_owned(),
                name if is_valid_name(name) => {
                    settings.insert(name.to_string(), setting_from_param(&value))
                }
                name => {
                    return Err(Error::Config(format!(
                        "invalid setting name '{}' in DSN: expected [A-Za-z0-9_]+",
                        name
                    )))
                }
            }
        }

        let port = url.port().unwrap_or_else(|| protocol.default_port(secure));

        Ok(Self {
            protocol,
            secure,
            skip_verify,
            host,
            port,
            database,
            username,
            password,
            compression: Compression { method, level },
            dial_timeout,
            settings,
        })
    }

    /// `host:port` address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build a `TlsConfig` from parsed connection parameters.
    ///
    /// Returns `None` when `secure` is off.
    pub fn to_tls_config(&self) -> Result<Option<TlsConfig>> {
        if !self.secure {
            return Ok(None);
        }

        let tls = TlsConfig::builder()
            .danger_accept_invalid_certs(self.skip_verify)
            .build()?;
        Ok(Some(tls))
    }

    /// Convert to `Options`
    pub fn to_options(&self) -> Result<Options> {
        let options = Options {
            addr: vec![self.addr()],
            auth: Auth {
                database: self.database.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
            },
            settings: self.settings.clone(),
            compression: self
                .compression
                .is_enabled()
                .then_some(self.compression),
            tls: self.to_tls_config()?,
            dial_timeout: self.dial_timeout.unwrap_or(DEFAULT_DIAL_TIMEOUT),
            protocol: self.protocol,
            ..Options::default()
        };
        options.validate()?;
        Ok(options)
    }
}
