//! HTTP fetcher implementation
//!
//! This module is the network layer of the collector:
//! - Building the HTTP client with the browser-like user agent
//! - GET requests carrying the `Origin` header
//! - Capping response bodies at the configured size
//! - Error classification into status and transport failures

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ORIGIN};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use url::Url;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// A single request for an icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    pub url: Url,

    /// Value of the `Origin` header
    pub origin: String,
}

/// A response that completed with a 2xx status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedIcon {
    pub status: u16,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Body, truncated to the configured maximum
    pub body: Vec<u8>,
}

/// Why an attempt did not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server answered with a non-2xx status
    Status { status: u16 },

    /// No response: DNS, connect, TLS, timeout, or body read errors
    Transport { error: String },
}

impl FetchFailure {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status } => write!(f, "HTTP {}", status),
            Self::Transport { error } => f.write_str(error),
        }
    }
}

/// Outcome of one request
pub type FetchResult = Result<FetchedIcon, FetchFailure>;

/// Network layer used by the orchestrator
#[async_trait]
pub trait IconFetcher: Send + Sync {
    /// Performs one request; never retries on its own
    async fn fetch(&self, request: &IconRequest) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// Cookies are not stored, redirects are followed up to a fixed limit, and
/// every request is bounded by the configured timeout.
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_size: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_body_size: config.max_body_size,
        })
    }

    /// Reads the body, keeping at most `max_body_size` bytes
    async fn read_capped(&self, mut response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_size - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl IconFetcher for HttpFetcher {
    async fn fetch(&self, request: &IconRequest) -> FetchResult {
        let response = self
            .client
            .get(request.url.clone())
            .header(ORIGIN, request.origin.as_str())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = self.read_capped(response).await.map_err(classify_error)?;

        Ok(FetchedIcon {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Maps a reqwest error onto a transport failure
fn classify_error(e: reqwest::Error) -> FetchFailure {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchFailure::Transport { error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> FetchConfig {
        FetchConfig {
            user_agent: "TestAgent/1.0".to_string(),
            request_timeout: 5,
            ..FetchConfig::default()
        }
    }

    fn request(server: &MockServer, icon_path: &str) -> IconRequest {
        IconRequest {
            url: Url::parse(&format!("{}{}", server.uri(), icon_path)).unwrap(),
            origin: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_not_found_detection() {
        assert!(FetchFailure::Status { status: 404 }.is_not_found());
        assert!(!FetchFailure::Status { status: 500 }.is_not_found());
        assert!(!FetchFailure::Transport {
            error: "boom".to_string()
        }
        .is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_image_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/favicon.ico"))
            .and(header("origin", "https://example.com"))
            .and(header("user-agent", "TestAgent/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/x-icon")
                    .set_body_bytes(vec![0u8, 0, 1, 0, 1, 0]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let icon = fetcher.fetch(&request(&server, "/favicon.ico")).await.unwrap();

        assert_eq!(icon.status, 200);
        assert_eq!(icon.content_type.as_deref(), Some("image/x-icon"));
        assert_eq!(icon.body, vec![0u8, 0, 1, 0, 1, 0]);
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/favicon.ico"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let result = fetcher.fetch(&request(&server, "/favicon.ico")).await;

        assert_eq!(result, Err(FetchFailure::Status { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_truncates_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/favicon.ico"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![7u8; 4096]),
            )
            .mount(&server)
            .await;

        let config = FetchConfig {
            max_body_size: 1000,
            ..create_test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let icon = fetcher.fetch(&request(&server, "/favicon.ico")).await.unwrap();

        assert_eq!(icon.body.len(), 1000);
        assert!(icon.body.iter().all(|b| *b == 7));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let server = MockServer::start().await;
        let location = format!("{}/static/icon.ico", server.uri());
        Mock::given(method("GET"))
            .and(path("/favicon.ico"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/static/icon.ico"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/vnd.microsoft.icon")
                    .set_body_bytes(b"icon".to_vec()),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let icon = fetcher.fetch(&request(&server, "/favicon.ico")).await.unwrap();
        assert_eq!(icon.body, b"icon".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        // Bind and drop a listener to get a port nobody serves
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::new(&create_test_config()).unwrap();
        let result = fetcher
            .fetch(&IconRequest {
                url: Url::parse(&format!("http://127.0.0.1:{}/favicon.ico", port)).unwrap(),
                origin: "https://127.0.0.1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(FetchFailure::Transport { .. })));
    }
}
