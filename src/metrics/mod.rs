//! Metrics emitted through the `metrics` facade
//!
//! Nothing is recorded unless the test binary installs a recorder.

/// Label values
pub mod labels {
    /// HTTP interface
    pub const PROTOCOL_HTTP: &str = "http";
    /// Native interface
    pub const PROTOCOL_NATIVE: &str = "native";

    /// Query or gate succeeded
    pub const STATUS_OK: &str = "ok";
    /// Query or gate failed
    pub const STATUS_ERROR: &str = "error";
    /// Version gate refused an older server
    pub const STATUS_SKIPPED: &str = "skipped";
}

/// Counter helpers
pub mod counters {
    use crate::protocol::Protocol;

    fn protocol_label(protocol: Protocol) -> &'static str {
        match protocol {
            Protocol::Http => super::labels::PROTOCOL_HTTP,
            Protocol::Native => super::labels::PROTOCOL_NATIVE,
        }
    }

    /// A handle was opened
    pub fn connection_opened(protocol: Protocol, secure: bool) {
        ::metrics::counter!(
            "clickhouse_testkit_connections_opened_total",
            "protocol" => protocol_label(protocol),
            "secure" => if secure { "true" } else { "false" }
        )
        .increment(1);
    }

    /// A query finished
    pub fn query_completed(protocol: Protocol, status: &'static str) {
        ::metrics::counter!(
            "clickhouse_testkit_queries_total",
            "protocol" => protocol_label(protocol),
            "status" => status
        )
        .increment(1);
    }

    /// The version gate ran
    pub fn version_gate(status: &'static str) {
        ::metrics::counter!("clickhouse_testkit_version_gate_total", "status" => status)
            .increment(1);
    }
}
