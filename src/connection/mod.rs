//! Connection management
//!
//! This module handles:
//! * Connection options for the native-style open path
//! * TCP transport with optional TLS and a dial timeout
//! * TLS configuration and support

mod options;
mod tls;
mod transport;

pub use options::{Auth, Options, OptionsBuilder};
pub use tls::{parse_server_name, TlsConfig, TlsConfigBuilder};
pub use transport::{split_addr, Transport};
