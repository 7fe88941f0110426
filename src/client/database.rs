//! Pool-style database handle

use super::connection_string::ConnectionInfo;
use super::http::HttpDriver;
use super::native::NativeDriver;
use crate::connection::Options;
use crate::protocol::{CompressionMethod, Protocol};
use crate::Result;

#[derive(Debug)]
enum Driver {
    Http(HttpDriver),
    Native(NativeDriver),
}

/// Handle to a ClickHouse server, over either interface
///
/// Opening is lazy: neither `open` nor `open_with_options` touches the
/// network. Connections are made by the first query and reused after that.
#[derive(Debug)]
pub struct Database {
    protocol: Protocol,
    secure: bool,
    addr: Vec<String>,
    driver: Driver,
}

impl Database {
    /// Open a handle from a connection string
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> clickhouse_testkit::Result<()> {
    /// use clickhouse_testkit::Database;
    ///
    /// // HTTP interface
    /// let db = Database::open("http://default:@localhost:8123?compress=gzip")?;
    ///
    /// // Native protocol over TLS
    /// let db = Database::open("clickhouse://default:@localhost:9440?secure=true&compress=lz4")?;
    /// let version = db.query_string("SELECT version()").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(dsn: &str) -> Result<Self> {
        let info = ConnectionInfo::parse(dsn)?;
        tracing::debug!(
            protocol = %info.protocol,
            secure = info.secure,
            addr = %info.addr(),
            "opening handle from DSN"
        );
        Self::open_with_options(info.to_options()?)
    }

    /// Open a handle from explicit options
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn example() -> clickhouse_testkit::Result<()> {
    /// use clickhouse_testkit::{Database, connection::Options, protocol::Protocol};
    /// use std::time::Duration;
    ///
    /// let options = Options::builder()
    ///     .addr("localhost:9000")
    ///     .username("default")
    ///     .dial_timeout(Duration::from_secs(5))
    ///     .protocol(Protocol::Native)
    ///     .build()?;
    /// let db = Database::open_with_options(options)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open_with_options(options: Options) -> Result<Self> {
        options.validate()?;

        let driver = match options.protocol {
            Protocol::Http => Driver::Http(HttpDriver::new(&options)?),
            Protocol::Native => Driver::Native(NativeDriver::new(&options)),
        };
        crate::metrics::counters::connection_opened(options.protocol, options.is_secure());

        Ok(Self {
            protocol: options.protocol,
            secure: options.is_secure(),
            addr: options.addr,
            driver,
        })
    }

    /// Interface this handle speaks
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Whether TLS is in use
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Addresses this handle dials, in order
    pub fn addr(&self) -> &[String] {
        &self.addr
    }

    /// Compression actually in effect, which may differ from the request
    ///
    /// The native driver always uses LZ4; HTTP uses the requested content
    /// encoding, or none when LZ4 was requested.
    pub fn compression(&self) -> CompressionMethod {
        match &self.driver {
            Driver::Http(http) => http.compression(),
            Driver::Native(native) => native.compression(),
        }
    }

    /// Run a query returning a single string value
    ///
    /// Over HTTP the first line of the response body is returned, so any
    /// scalar works. Over the native protocol the column must be a String.
    pub async fn query_string(&self, sql: &str) -> Result<String> {
        let result = match &self.driver {
            Driver::Http(http) => http
                .query(sql)
                .await
                .map(|body| body.lines().next().unwrap_or_default().to_string()),
            Driver::Native(native) => native.query_string(sql).await,
        };

        let status = match &result {
            Ok(_) => crate::metrics::labels::STATUS_OK,
            Err(e) => {
                tracing::debug!(error = %e, "query failed");
                crate::metrics::labels::STATUS_ERROR
            }
        };
        crate::metrics::counters::query_completed(self.protocol, status);
        result
    }

    /// Check the server is reachable
    pub async fn ping(&self) -> Result<()> {
        match &self.driver {
            Driver::Http(http) => http.ping().await,
            Driver::Native(native) => native.ping().await,
        }
    }

    /// Release any open session
    pub async fn close(&self) {
        if let Driver::Native(native) = &self.driver {
            native.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_open_is_lazy() {
        // Nothing listens on port 1; opening must still succeed.
        let db = Database::open("clickhouse://default:@127.0.0.1:1?compress=lz4").unwrap();
        assert_eq!(db.protocol(), Protocol::Native);
        assert!(!db.is_secure());
        assert_eq!(db.addr(), ["127.0.0.1:1".to_string()]);

        let db = Database::open("http://default:@127.0.0.1:1?compress=false").unwrap();
        assert_eq!(db.protocol(), Protocol::Http);
    }

    #[test]
    fn test_compression_in_effect() {
        let db = Database::open("clickhouse://default:@127.0.0.1:9000?compress=false").unwrap();
        assert_eq!(db.compression(), CompressionMethod::Lz4);

        let db = Database::open("clickhouse://default:@127.0.0.1:9000?compress=lz4").unwrap();
        assert_eq!(db.compression(), CompressionMethod::Lz4);

        let db = Database::open("http://default:@127.0.0.1:8123?compress=gzip").unwrap();
        assert_eq!(db.compression(), CompressionMethod::Gzip);

        let db = Database::open("http://default:@127.0.0.1:8123?compress=lz4").unwrap();
        assert_eq!(db.compression(), CompressionMethod::None);

        let db = Database::open("http://default:@127.0.0.1:8123?compress=false").unwrap();
        assert_eq!(db.compression(), CompressionMethod::None);
    }

    #[test]
    fn test_open_secure() {
        let db =
            Database::open("https://default:@localhost:8443?secure=true&compress=gzip").unwrap();
        assert_eq!(db.protocol(), Protocol::Http);
        assert!(db.is_secure());
    }

    #[test]
    fn test_open_unknown_scheme() {
        let err = Database::open("mysql://localhost:3306").unwrap_err();
        assert!(matches!(err, Error::UnsupportedProtocol(_)));
    }

    #[test]
    fn test_open_with_options_requires_address() {
        let err = Database::open_with_options(Options::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_query_unreachable_server_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let db = Database::open(&format!("http://default:@127.0.0.1:{}", port)).unwrap();
        tokio_test::assert_err!(db.query_string("SELECT 1").await);
        tokio_test::assert_err!(db.ping().await);
    }
}
