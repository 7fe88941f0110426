//! clickhouse-testkit: connection helpers for ClickHouse integration tests
//!
//! Builds database handles against a test server for every combination of
//! interface (HTTP or the native protocol), transport security and
//! compression, and gates tests on a minimum server version.
//!
//! # Example
//!
//! ```no_run
//! use clickhouse_testkit::protocol::Protocol;
//! use clickhouse_testkit::skip_unless_server_version;
//! use clickhouse_testkit::testing::get_std_dsn_connection;
//!
//! # async fn example() {
//! let conn = get_std_dsn_connection(Protocol::Native, false, "lz4").unwrap();
//! skip_unless_server_version!(&conn, 22, 3, 0);
//! let version = conn.query_string("SELECT version()").await.unwrap();
//! # }
//! ```
//!
//! Wire encoding is left to the drivers: `reqwest` for the HTTP interface
//! and `klickhouse` for the native protocol.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod connection;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod testing;

pub use client::Database;
pub use error::{Error, Result};
