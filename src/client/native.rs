//! Native protocol driver
//!
//! Dialing (address order, dial timeout, TLS) goes through our own
//! `Transport`; the binary protocol itself is spoken by `klickhouse`.

use crate::connection::{Options, Transport};
use crate::protocol::CompressionMethod;
use crate::Result;
use klickhouse::{Client, ClientOptions, UnitValue};
use tokio::sync::Mutex;
use tracing::Instrument;

/// Native handle: options plus a lazily dialed session
pub(crate) struct NativeDriver {
    options: Options,
    compression: CompressionMethod,
    session: Mutex<Option<Client>>,
}

impl std::fmt::Debug for NativeDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeDriver")
            .field("addr", &self.options.addr)
            .field("secure", &self.options.is_secure())
            .finish_non_exhaustive()
    }
}

impl NativeDriver {
    /// Keep the options; nothing is dialed until the first query
    pub(crate) fn new(options: &Options) -> Self {
        let method = options
            .compression
            .map(|c| c.method)
            .unwrap_or_default();
        if !method.supported_over_native() {
            tracing::warn!(
                compression = %method,
                effective = %method.effective_over_native(),
                "compression method not available over the native protocol, driver uses lz4"
            );
        }

        Self {
            options: options.clone(),
            compression: method.effective_over_native(),
            session: Mutex::new(None),
        }
    }

    /// Compression the driver negotiates, whatever was requested
    pub(crate) fn compression(&self) -> CompressionMethod {
        self.compression
    }

    fn client_options(&self) -> ClientOptions {
        let mut client_options = ClientOptions::default();
        client_options.username = self.options.auth.username.clone();
        client_options.password = self.options.auth.password.clone();
        client_options.default_database = self.options.auth.database.clone();
        client_options
    }

    async fn dial(&self) -> Result<Client> {
        let options = &self.options;
        async {
            let transport =
                Transport::connect_any(&options.addr, options.tls.as_ref(), options.dial_timeout)
                    .await?;
            let (read, write) = tokio::io::split(transport);
            let client = Client::connect_stream(read, write, self.client_options()).await?;

            for (name, value) in options.settings.iter() {
                client
                    .execute(format!("SET {} = {}", name, value.to_literal()))
                    .await?;
            }

            tracing::info!("native session established");
            Ok::<_, crate::Error>(client)
        }
        .instrument(tracing::info_span!(
            "native_dial",
            user = %options.auth.username,
            database = %options.auth.database
        ))
        .await
    }

    /// The current session, dialing one if needed
    async fn session(&self) -> Result<Client> {
        let mut session = self.session.lock().await;
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }
        let client = self.dial().await?;
        *session = Some(client.clone());
        Ok(client)
    }

    /// Run `sql`, which must return a single String value
    pub(crate) async fn query_string(&self, sql: &str) -> Result<String> {
        let client = self.session().await?;
        match client.query_one::<UnitValue<String>>(sql).await {
            Ok(UnitValue(value)) => Ok(value),
            Err(e) => {
                // Drop the session so the next call redials.
                self.session.lock().await.take();
                Err(e.into())
            }
        }
    }

    /// Round trip a trivial query
    pub(crate) async fn ping(&self) -> Result<()> {
        let client = self.session().await?;
        if let Err(e) = client.execute("SELECT 1").await {
            self.session.lock().await.take();
            return Err(e.into());
        }
        Ok(())
    }

    /// Drop the session, if any
    pub(crate) async fn close(&self) {
        if self.session.lock().await.take().is_some() {
            tracing::debug!("native session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Protocol;
    use std::time::Duration;

    #[test]
    fn test_client_options_carry_auth() {
        let options = Options::builder()
            .addr("localhost:9000")
            .username("tester")
            .password("pw")
            .database("analytics")
            .protocol(Protocol::Native)
            .build()
            .unwrap();
        let driver = NativeDriver::new(&options);
        let client_options = driver.client_options();
        assert_eq!(client_options.username, "tester");
        assert_eq!(client_options.password, "pw");
        assert_eq!(client_options.default_database, "analytics");
    }

    #[test]
    fn test_compression_is_always_lz4() {
        let uncompressed = Options::builder()
            .addr("localhost:9000")
            .compression(CompressionMethod::None)
            .build()
            .unwrap();
        assert_eq!(NativeDriver::new(&uncompressed).compression(), CompressionMethod::Lz4);

        let lz4 = Options::builder()
            .addr("localhost:9000")
            .compression(CompressionMethod::Lz4)
            .build()
            .unwrap();
        assert_eq!(NativeDriver::new(&lz4).compression(), CompressionMethod::Lz4);
    }

    #[tokio::test]
    async fn test_query_against_closed_port_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let options = Options::builder()
            .addr(addr)
            .dial_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let driver = NativeDriver::new(&options);
        assert!(driver.query_string("SELECT version()").await.is_err());
        assert!(driver.session.lock().await.is_none());
    }
}
