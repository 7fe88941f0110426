//! Named test environments
//!
//! A harness that starts a server (a container, usually) publishes the
//! connection details as JSON in `CLICKHOUSE_<NAME>_ENV`; tests resolve them
//! by name. Tests against an externally managed server can use the plain
//! `CLICKHOUSE_HOST`/`CLICKHOUSE_PORT`/... variables instead.

use crate::protocol::constants::{ports, DEFAULT_USER};
use crate::protocol::Protocol;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment used by the `std` test suite
pub const STD_ENVIRONMENT: &str = "std";

/// Connection details of a test server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEnvironment {
    /// Hostname or IP the tests dial
    pub host: String,
    /// Username
    pub username: String,
    /// Password
    #[serde(default)]
    pub password: String,
    /// Plain native protocol port
    pub port: u16,
    /// Plain HTTP port
    pub http_port: u16,
    /// TLS native protocol port
    pub ssl_port: u16,
    /// HTTPS port
    pub https_port: u16,
    /// Server version the harness started, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Container IP, when the server runs in a container
    #[serde(default, rename = "ContainerIP", skip_serializing_if = "Option::is_none")]
    pub container_ip: Option<String>,
    /// Container ID, when the server runs in a container
    #[serde(default, rename = "ContainerID", skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

/// Process environment variable holding the named environment
pub fn environment_variable(name: &str) -> String {
    format!("CLICKHOUSE_{}_ENV", name.to_ascii_uppercase())
}

fn port_var(get: &impl Fn(&str) -> Option<String>, var: &str, default: u16) -> Result<u16> {
    match get(var) {
        Some(value) => value
            .parse()
            .map_err(|_| Error::Config(format!("invalid {} '{}'", var, value))),
        None => Ok(default),
    }
}

impl TestEnvironment {
    /// Resolve the environment published under `name`
    pub fn lookup(name: &str) -> Result<Self> {
        let var = environment_variable(name);
        let raw = env::var(&var)
            .map_err(|_| Error::environment(name, format!("unable to find environment ({} is not set)", var)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::environment(name, format!("malformed {}: {}", var, e)))
    }

    /// Resolve `name`, falling back to `from_process_env` when unpublished
    pub fn lookup_or_process_env(name: &str) -> Result<Self> {
        if env::var_os(environment_variable(name)).is_some() {
            return Self::lookup(name);
        }
        tracing::debug!(environment = name, "environment not published, using CLICKHOUSE_* variables");
        Self::from_process_env()
    }

    /// Publish this environment under `name` for later `lookup` calls
    pub fn store(&self, name: &str) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        env::set_var(environment_variable(name), raw);
        Ok(())
    }

    /// Environment for an externally managed server
    ///
    /// Reads `CLICKHOUSE_HOST`, `CLICKHOUSE_PORT`, `CLICKHOUSE_HTTP_PORT`,
    /// `CLICKHOUSE_SSL_PORT`, `CLICKHOUSE_HTTPS_PORT`, `CLICKHOUSE_USERNAME`
    /// and `CLICKHOUSE_PASSWORD`, with the server's stock defaults.
    pub fn from_process_env() -> Result<Self> {
        Self::from_vars(|var| env::var(var).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: get("CLICKHOUSE_HOST").unwrap_or_else(|| "localhost".to_string()),
            username: get("CLICKHOUSE_USERNAME").unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: get("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            port: port_var(&get, "CLICKHOUSE_PORT", ports::NATIVE)?,
            http_port: port_var(&get, "CLICKHOUSE_HTTP_PORT", ports::HTTP)?,
            ssl_port: port_var(&get, "CLICKHOUSE_SSL_PORT", ports::NATIVE_TLS)?,
            https_port: port_var(&get, "CLICKHOUSE_HTTPS_PORT", ports::HTTPS)?,
            version: get("CLICKHOUSE_VERSION"),
            container_ip: None,
            container_id: None,
        })
    }

    /// Port for the (protocol, security) combination
    pub fn port_for(&self, protocol: Protocol, secure: bool) -> u16 {
        match (protocol, secure) {
            (Protocol::Http, false) => self.http_port,
            (Protocol::Http, true) => self.https_port,
            (Protocol::Native, false) => self.port,
            (Protocol::Native, true) => self.ssl_port,
        }
    }
}
