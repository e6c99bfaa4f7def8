//! # IP Geolocation
//!
//! Resolves a visitor's IP address to a country and region through an
//! ipinfo-style HTTP API (`GET {base_url}/{ip}/json?token=...`).
//!
//! Lookups never fail from the caller's point of view: any transport error,
//! non-200 status or unreadable body yields [`Location::unknown`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use shared::UNKNOWN_LOCATION;
use std::time::Duration;

use crate::config::GeolocationConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub region: String,
}

impl Location {
    pub fn new(country: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LOCATION, UNKNOWN_LOCATION)
    }
}

#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn lookup(&self, ip_address: &str) -> Location;
}

/// Fields of the lookup response we care about
#[derive(Debug, Deserialize)]
struct LookupBody {
    country: Option<String>,
    region: Option<String>,
}

/// Extract the location from a lookup response body.
///
/// Missing or empty fields fall back to "Unknown" individually.
pub fn parse_lookup_body(body: &str) -> Option<Location> {
    let parsed: LookupBody = serde_json::from_str(body).ok()?;
    let pick = |value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    };
    Some(Location::new(pick(parsed.country), pick(parsed.region)))
}

pub struct IpInfoLocator {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl IpInfoLocator {
    pub fn new(config: &GeolocationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create geolocation HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn lookup_url(&self, ip_address: &str) -> String {
        let mut url = format!("{}/{}/json", self.base_url, urlencoding::encode(ip_address));
        if let Some(token) = &self.token {
            url.push_str("?token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }
}

#[async_trait]
impl GeoLocator for IpInfoLocator {
    async fn lookup(&self, ip_address: &str) -> Location {
        let url = self.lookup_url(ip_address);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Geolocation request for {} failed: {}", ip_address, e);
                return Location::unknown();
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            warn!("Geolocation lookup for {} returned HTTP {}", ip_address, response.status());
            return Location::unknown();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not read geolocation response for {}: {}", ip_address, e);
                return Location::unknown();
            }
        };

        match parse_lookup_body(&body) {
            Some(location) => {
                debug!("Resolved {} to {}/{}", ip_address, location.country, location.region);
                location
            }
            None => {
                warn!("Unreadable geolocation response for {}", ip_address);
                Location::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(base_url: &str, token: Option<&str>) -> IpInfoLocator {
        IpInfoLocator::new(&GeolocationConfig {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_lookup_body() {
        let body = r#"{"ip":"8.8.8.8","city":"Mountain View","region":"California","country":"US"}"#;
        assert_eq!(parse_lookup_body(body), Some(Location::new("US", "California")));
    }

    #[test]
    fn test_parse_lookup_body_fills_missing_fields() {
        assert_eq!(
            parse_lookup_body(r#"{"ip":"10.0.0.1","bogon":true}"#),
            Some(Location::unknown())
        );
        assert_eq!(
            parse_lookup_body(r#"{"country":"DE","region":""}"#),
            Some(Location::new("DE", "Unknown"))
        );
        assert_eq!(parse_lookup_body("<html>rate limited</html>"), None);
    }

    #[test]
    fn test_lookup_url() {
        assert_eq!(
            locator("https://ipinfo.io/", Some("abc123")).lookup_url("203.0.113.7"),
            "https://ipinfo.io/203.0.113.7/json?token=abc123"
        );
        assert_eq!(
            locator("https://ipinfo.io", None).lookup_url("2001:db8::1"),
            "https://ipinfo.io/2001%3Adb8%3A%3A1/json"
        );
    }

    /// Serve one HTTP response on a local port and return the base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}", address)
    }

    #[tokio::test]
    async fn test_non_200_response_yields_unknown() {
        let base_url = serve_once("HTTP/1.1 429 Too Many Requests", r#"{"country":"US","region":"NY"}"#).await;

        let location = locator(&base_url, None).lookup("1.2.3.4").await;

        assert_eq!(location, Location::unknown());
    }

    #[tokio::test]
    async fn test_ok_response_is_parsed() {
        let base_url = serve_once("HTTP/1.1 200 OK", r#"{"country":"US","region":"NY"}"#).await;

        let location = locator(&base_url, Some("abc123")).lookup("1.2.3.4").await;

        assert_eq!(location, Location::new("US", "NY"));
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_unknown() {
        let location = locator("http://127.0.0.1:1", None).lookup("203.0.113.7").await;
        assert_eq!(location, Location::unknown());
    }
}
