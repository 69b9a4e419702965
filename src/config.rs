//! Configuration management for requests

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::RequestsError;

/// HTTP methods accepted by the request constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    /// Canonical uppercase name as it appears on the request line
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = RequestsError;

    /// Names are matched exactly; `"get"` and `"TRACE"` are both rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "PATCH" => Ok(Method::Patch),
            other => Err(RequestsError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// SSL/TLS configuration
#[derive(Debug, Clone)]
pub struct SslConfig {
    /// Setting this to `false` disables certificate validation entirely.
    pub verify_certs: bool,
    pub ca_cert_file: Option<PathBuf>,
}

impl Default for SslConfig {
    fn default() -> Self {
        SslConfig {
            verify_certs: true,
            ca_cert_file: None,
        }
    }
}

/// Session configuration
///
/// Timeouts, redirects, proxy and TLS settings are forwarded to the
/// transport when the session is built; they are not re-read per send.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_store: bool,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    pub proxy: Option<ProxyConfig>,
    pub ssl: SslConfig,
}

impl SessionConfig {
    /// Default configuration without a cookie store
    pub fn stateless() -> Self {
        SessionConfig {
            cookie_store: false,
            ..SessionConfig::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cookie_store: true,
            user_agent: format!("requests/{}", crate::VERSION),
            timeout: None,
            connect_timeout: Some(Duration::from_secs(30)),
            follow_redirects: true,
            max_redirects: 10,
            proxy: None,
            ssl: SslConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip_through_display() {
        for method in [
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Head,
            Method::Options,
            Method::Patch,
        ] {
            let parsed: Method = method.to_string().parse().expect("known method");
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn method_parse_rejects_trace_and_lowercase() {
        let err = "TRACE".parse::<Method>().expect_err("trace is not accepted");
        assert!(matches!(err, RequestsError::UnsupportedMethod(name) if name == "TRACE"));

        let err = "get".parse::<Method>().expect_err("names are case-sensitive");
        assert!(matches!(err, RequestsError::UnsupportedMethod(_)));
    }

    #[test]
    fn default_config_verifies_certificates() {
        let config = SessionConfig::default();
        assert!(config.ssl.verify_certs);
        assert!(config.cookie_store);
        assert!(config.user_agent.starts_with("requests/"));
    }

    #[test]
    fn stateless_config_has_no_cookie_store() {
        let config = SessionConfig::stateless();
        assert!(!config.cookie_store);
        assert!(config.ssl.verify_certs);
    }
}
