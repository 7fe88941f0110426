//! Transport for the native protocol (TCP with optional TLS)

use super::tls::{parse_server_name, TlsConfig};
use crate::{Error, Result};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tracing::Instrument;

/// TCP stream, plain or TLS-encrypted
#[allow(clippy::large_enum_variant)]
pub enum Transport {
    /// Plain TCP connection
    Plain(TcpStream),
    /// TLS-encrypted TCP connection
    Tls(tokio_rustls::client::TlsStream<TcpStream>),
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Plain(_) => f.write_str("Transport::Plain(TcpStream)"),
            Transport::Tls(_) => f.write_str("Transport::Tls(TlsStream)"),
        }
    }
}

/// Split a `host:port` address.
///
/// Bracketed IPv6 literals (`[::1]:9000`) are accepted.
pub fn split_addr(addr: &str) -> Result<(&str, u16)> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| Error::Config(format!("address '{}' is missing a port", addr)))?;
    let port = port
        .parse()
        .map_err(|_| Error::Config(format!("invalid port in address '{}'", addr)))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(Error::Config(format!("address '{}' is missing a host", addr)));
    }
    Ok((host, port))
}

impl Transport {
    /// Connect to `host:port`, upgrading to TLS when a config is given.
    ///
    /// The whole dial (TCP connect plus TLS handshake) must finish within
    /// `dial_timeout`.
    pub async fn connect(
        addr: &str,
        tls_config: Option<&TlsConfig>,
        dial_timeout: Duration,
    ) -> Result<Self> {
        let (host, port) = split_addr(addr)?;

        let dial = async {
            let stream = TcpStream::connect((host, port)).await?;
            stream.set_nodelay(true)?;
            match tls_config {
                Some(tls) => Self::handshake(stream, tls, host).await,
                None => Ok(Transport::Plain(stream)),
            }
        };

        match tokio::time::timeout(dial_timeout, dial)
            .instrument(tracing::debug_span!("dial", %addr, tls = tls_config.is_some()))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(dial_timeout)),
        }
    }

    /// Try each address in order, returning the first that connects.
    pub async fn connect_any(
        addrs: &[String],
        tls_config: Option<&TlsConfig>,
        dial_timeout: Duration,
    ) -> Result<Self> {
        let mut last_err: Option<Error> = None;
        for addr in addrs {
            match Self::connect(addr, tls_config, dial_timeout).await {
                Ok(transport) => {
                    tracing::debug!(%addr, "connected");
                    return Ok(transport);
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "dial failed, trying next address");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Config("no addresses to dial".into())))
    }

    async fn handshake(stream: TcpStream, tls: &TlsConfig, host: &str) -> Result<Self> {
        let server_name = parse_server_name(tls.server_name_for(host))?;
        let connector = tokio_rustls::TlsConnector::from(tls.client_config());
        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| Error::Config(format!("TLS handshake failed: {}", e)))?;
        tracing::debug!("TLS connection established");
        Ok(Transport::Tls(tls_stream))
    }

    /// Whether the stream is encrypted
    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }
}

impl AsyncRead for Transport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Transport::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Transport {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Transport::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Transport::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Transport::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Transport::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
