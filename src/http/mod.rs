//! HTTP client module
//!
//! Request building, body encoding and the transport seam that performs the
//! actual network I/O.

use crate::config::{Method, SessionConfig};
use crate::error::{Result, RequestsError};
use crate::ssl::SslUtils;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::HeaderMap;
use url::Url;

pub mod auth;
pub mod body;
pub mod multipart;
pub mod request;
pub mod response;

pub use response::Response;

/// A fully-formed outgoing request, ready for the transport
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Performs network I/O for a fully-formed request.
///
/// Implementations block until the response has been read.
pub trait Transport: Send + Sync {
    fn send(&self, request: WireRequest) -> Result<Response>;
}

/// Transport backed by a blocking reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given configuration
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects as usize)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        // Configure proxy if specified
        if let Some(proxy_config) = &config.proxy {
            let proxy = reqwest::Proxy::all(&proxy_config.url)
                .map_err(|e| RequestsError::Proxy(format!("Invalid proxy: {}", e)))?;

            let proxy = if let (Some(username), Some(password)) =
                (&proxy_config.username, &proxy_config.password)
            {
                proxy.basic_auth(username, password)
            } else {
                proxy
            };

            builder = builder.proxy(proxy);
        }

        // Configure SSL/TLS
        SslUtils::validate_config(&config.ssl)?;
        if let Some(ca_cert) = &config.ssl.ca_cert_file {
            builder = builder.add_root_certificate(SslUtils::load_ca_certificate(ca_cert)?);
        }
        if !config.ssl.verify_certs {
            log::warn!("TLS certificate verification is disabled for this session");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(RequestsError::Transport)?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: WireRequest) -> Result<Response> {
        let response = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .map_err(RequestsError::Transport)?;
        Response::from_blocking(response)
    }
}
