//! Network checks: loopback name resolution and outbound HTTP.

use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::NetworkConfig;

/// Result of one network run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkReport {
    pub localhost_ok: bool,
    pub connectivity_ok: bool,
}

impl NetworkReport {
    pub fn is_healthy(&self) -> bool {
        self.localhost_ok && self.connectivity_ok
    }
}

/// First IPv4 address `host` resolves to.
pub fn resolve_ipv4(host: &str) -> Result<Ipv4Addr> {
    (host, 0)
        .to_socket_addrs()
        .with_context(|| format!("Failed to resolve {host}"))?
        .find_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .with_context(|| format!("{host} has no IPv4 address"))
}

/// `true` if `localhost` resolves to `127.0.0.1`.
pub fn check_localhost() -> bool {
    match resolve_ipv4("localhost") {
        Ok(ip) => {
            info!("localhost resolves to {}", ip);
            ip == Ipv4Addr::LOCALHOST
        }
        Err(e) => {
            error!("Localhost check failed: {:#}", e);
            false
        }
    }
}

/// `true` if a GET of `url` answers 200 within `timeout`.
pub fn check_connectivity(url: &str, timeout: Duration) -> bool {
    let result = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .and_then(|client| client.get(url).send());

    match result {
        Ok(response) => {
            let status = response.status();
            info!("GET {} -> {}", url, status);
            status == reqwest::StatusCode::OK
        }
        Err(e) => {
            error!("Connectivity check to {} failed: {}", url, e);
            false
        }
    }
}

/// Run both checks.
pub fn run(config: &NetworkConfig) -> NetworkReport {
    NetworkReport {
        localhost_ok: check_localhost(),
        connectivity_ok: check_connectivity(
            &config.connectivity_url,
            Duration::from_secs(config.timeout_secs),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_resolve_literal_ip() {
        assert_eq!(resolve_ipv4("127.0.0.1").unwrap(), Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn test_localhost_resolves_to_loopback() {
        assert!(check_localhost());
    }

    #[test]
    fn test_report() {
        let report = NetworkReport {
            localhost_ok: true,
            connectivity_ok: false,
        };
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn test_connectivity_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = server.uri();
        let ok = tokio::task::spawn_blocking(move || {
            check_connectivity(&url, Duration::from_secs(5))
        })
        .await
        .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_connectivity_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = server.uri();
        let ok = tokio::task::spawn_blocking(move || {
            check_connectivity(&url, Duration::from_secs(5))
        })
        .await
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_connectivity_unreachable() {
        // Port 9 (discard) on loopback is closed in test environments
        assert!(!check_connectivity(
            "http://127.0.0.1:9/",
            Duration::from_secs(2)
        ));
    }
}
