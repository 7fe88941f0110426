//! HTTP interface driver

use crate::connection::Options;
use crate::protocol::constants::headers;
use crate::protocol::{CompressionMethod, Settings};
use crate::{Error, Result};
use std::time::Duration;
use url::Url;

/// Idle pooled connections are dropped after this long unless configured
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(2);

/// TCP keepalive for pooled connections
const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// HTTP handle: a pooled `reqwest` client plus the endpoints it may use
#[derive(Debug, Clone)]
pub(crate) struct HttpDriver {
    client: reqwest::Client,
    endpoints: Vec<Url>,
    username: String,
    password: String,
    database: String,
    settings: Settings,
    compression: CompressionMethod,
}

impl HttpDriver {
    /// Build the client; no request is sent
    pub(crate) fn new(options: &Options) -> Result<Self> {
        let method = options
            .compression
            .map(|c| c.method)
            .unwrap_or_default();
        if !method.supported_over_http() {
            tracing::warn!(
                compression = %method,
                "compression method not available over HTTP, responses will be uncompressed"
            );
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(options.dial_timeout)
            .pool_idle_timeout(options.conn_max_lifetime.unwrap_or(POOL_IDLE_TIMEOUT))
            .tcp_keepalive(Some(TCP_KEEPALIVE))
            .gzip(method == CompressionMethod::Gzip)
            .deflate(method == CompressionMethod::Deflate)
            .brotli(method == CompressionMethod::Brotli)
            .zstd(method == CompressionMethod::Zstd);

        if let Some(max) = options.max_open_conns {
            builder = builder.pool_max_idle_per_host(max);
        }
        if let Some(name) = &options.client_name {
            builder = builder.user_agent(name.clone());
        }
        if let Some(tls) = &options.tls {
            builder = builder.use_preconfigured_tls((*tls.client_config()).clone());
        }

        let scheme = options.protocol.scheme(options.is_secure());
        let endpoints = options
            .addr
            .iter()
            .map(|addr| {
                Url::parse(&format!("{}://{}/", scheme, addr))
                    .map_err(|e| Error::Config(format!("invalid address '{}': {}", addr, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            client: builder.build()?,
            endpoints,
            username: options.auth.username.clone(),
            password: options.auth.password.clone(),
            database: options.auth.database.clone(),
            settings: options.settings.clone(),
            compression: method.effective_over_http(),
        })
    }

    /// Content encoding requested from the server
    pub(crate) fn compression(&self) -> CompressionMethod {
        self.compression
    }

    /// URL for a query against `endpoint`, carrying database and settings
    pub(crate) fn query_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("database", &self.database);
            if self.compression != CompressionMethod::None {
                pairs.append_pair("enable_http_compression", "1");
            }
            for (name, value) in self.settings.iter() {
                pairs.append_pair(name, &value.to_string());
            }
        }
        url
    }

    /// Run `sql` and return the raw response body
    pub(crate) async fn query(&self, sql: &str) -> Result<String> {
        let mut last_err: Option<Error> = None;
        for endpoint in &self.endpoints {
            let result = self
                .client
                .post(self.query_url(endpoint))
                .header(headers::USER, &self.username)
                .header(headers::KEY, &self.password)
                .body(sql.to_string())
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) if e.is_connect() => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "connect failed, trying next endpoint");
                    last_err = Some(e.into());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(Error::Server {
                    status: status.as_u16(),
                    message: body.trim_end().to_string(),
                });
            }
            return Ok(body);
        }
        Err(last_err.unwrap_or_else(|| Error::Config("no addresses to dial".into())))
    }

    /// `GET /ping` against the first reachable endpoint
    pub(crate) async fn ping(&self) -> Result<()> {
        let mut last_err: Option<Error> = None;
        for endpoint in &self.endpoints {
            let mut url = endpoint.clone();
            url.set_path("/ping");
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    let status = response.status().as_u16();
                    return Err(Error::Server {
                        status,
                        message: response.text().await.unwrap_or_default(),
                    });
                }
                Err(e) if e.is_connect() => last_err = Some(e.into()),
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Config("no addresses to dial".into())))
    }
}
