// ── Runtime connection configuration ──
//
// Describes *how* to reach the PLC web service. Carries credential data
// and connection tuning, but never touches disk -- the consumer (CLI,
// bridge process) constructs an `ApiConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::Error;

/// Configuration for connecting to a single PLC.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PLC host, with optional port (e.g. `192.168.1.40` or
    /// `plc.local:8080`). A scheme may be included; plain hosts
    /// default to `http://` -- the AMiNi web firmware has no TLS.
    pub host: String,
    /// Web service login name.
    pub username: String,
    /// Web service password.
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            timeout: Duration::from_secs(10),
        }
    }

    /// Resolve the configured host into a base URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };
        Ok(Url::parse(&raw)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(host: &str) -> ApiConfig {
        ApiConfig::new(host, "admin", SecretString::from("pw".to_string()))
    }

    #[test]
    fn bare_host_defaults_to_http() {
        let url = config("192.168.1.40").base_url().unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.40/");
    }

    #[test]
    fn host_with_port_is_preserved() {
        let url = config("plc.local:8080").base_url().unwrap();
        assert_eq!(url.as_str(), "http://plc.local:8080/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = config("https://plc.example.com").base_url().unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(config("not a host").base_url().is_err());
    }
}
