//! SSL/TLS configuration and utilities

use crate::config::SslConfig;
use crate::error::{Result, RequestsError};
use std::path::Path;

/// SSL/TLS certificate utilities
pub struct SslUtils;

impl SslUtils {
    /// Validate SSL configuration
    pub fn validate_config(config: &SslConfig) -> Result<()> {
        if let Some(ca_cert) = &config.ca_cert_file {
            if !ca_cert.exists() {
                return Err(RequestsError::FileNotFound(format!(
                    "CA certificate file not found: {:?}",
                    ca_cert
                )));
            }
        }
        Ok(())
    }

    /// Read certificate file contents
    pub fn read_cert_file(path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(RequestsError::Io)
    }

    /// Load a PEM-encoded CA certificate for the transport
    pub fn load_ca_certificate(path: &Path) -> Result<reqwest::Certificate> {
        let pem = Self::read_cert_file(path)?;
        reqwest::Certificate::from_pem(&pem)
            .map_err(|e| RequestsError::Ssl(format!("Invalid CA certificate {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::SslUtils;
    use crate::config::{ProxyConfig, SessionConfig, SslConfig};
    use crate::error::RequestsError;
    use crate::session::Session;
    use tempfile::tempdir;

    #[test]
    fn validate_config_accepts_defaults() {
        SslUtils::validate_config(&SslConfig::default()).expect("no files to check");
    }

    #[test]
    fn validate_config_reports_missing_ca_file() {
        let temp = tempdir().expect("tempdir");
        let config = SslConfig {
            ca_cert_file: Some(temp.path().join("missing.pem")),
            ..SslConfig::default()
        };
        let err = SslUtils::validate_config(&config).expect_err("missing file");
        assert!(matches!(err, RequestsError::FileNotFound(_)));
    }

    #[test]
    fn read_cert_file_returns_contents() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("ca.pem");
        std::fs::write(&path, b"pem-data").expect("write file");
        assert_eq!(SslUtils::read_cert_file(&path).expect("read"), b"pem-data");
    }

    #[test]
    fn session_reports_missing_ca_file() {
        let temp = tempdir().expect("tempdir");
        let config = SessionConfig {
            ssl: SslConfig {
                ca_cert_file: Some(temp.path().join("missing.pem")),
                ..SslConfig::default()
            },
            ..SessionConfig::default()
        };
        let err = Session::with_config(config).expect_err("missing CA file");
        assert!(matches!(err, RequestsError::FileNotFound(_)));
    }

    #[test]
    fn session_reports_malformed_proxy_url() {
        let config = SessionConfig {
            proxy: Some(ProxyConfig {
                url: "http://[::1".to_string(),
                username: None,
                password: None,
            }),
            ..SessionConfig::default()
        };
        let err = Session::with_config(config).expect_err("malformed proxy url");
        assert!(matches!(err, RequestsError::Proxy(_)));
    }
}
