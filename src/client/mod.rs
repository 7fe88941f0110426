//! Client handles
//!
//! * `ConnectionInfo`: connection string (DSN) parsing
//! * `Database`: lazy, pool-style handle over HTTP or the native protocol

mod connection_string;
mod database;
mod http;
mod native;

pub use connection_string::ConnectionInfo;
pub use database::Database;
