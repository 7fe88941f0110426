//! Integration test support
//!
//! * `environment`: named test environments published by the harness
//! * `connect`: connection builders per (protocol, security, compression)
//! * `version`: minimum server version gate
//! * `seed`, `logging`: once-only harness setup

mod connect;
mod environment;
mod logging;
mod seed;
mod version;

pub use connect::{
    dsn_for, get_dsn_connection, get_open_db_connection, get_std_dsn_connection,
    get_std_open_db_connection, open_options_for,
};
pub use environment::{environment_variable, TestEnvironment, STD_ENVIRONMENT};
pub use logging::init_test_tracing;
pub use seed::{init_random_seed, random_seed, test_rng, SEED_VARIABLE};
pub use version::{check_min_server_version, ServerVersion, ServerVersionSource};
