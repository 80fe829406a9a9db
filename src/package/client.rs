//! HTTP client shared by the package fetchers
//!
//! Redirects are followed transparently and the resolved URL is kept on the
//! response. There is no retry and no request timeout: a download either
//! completes or fails the run.

use crate::domain::ProxyCredentials;
use crate::error::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use tracing::debug;

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("netlib-regress/", env!("CARGO_PKG_VERSION"));

/// A single GET request for a package
#[derive(Debug, Clone)]
pub struct DownloadRequest<'a> {
    url: Url,
    content_type: Option<&'a str>,
    credentials: Option<&'a ProxyCredentials>,
}

impl<'a> DownloadRequest<'a> {
    /// Create a plain GET request
    pub fn new(url: Url) -> Self {
        Self {
            url,
            content_type: None,
            credentials: None,
        }
    }

    /// Set the Content-Type request header
    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Authenticate with HTTP Basic credentials
    pub fn with_credentials(mut self, credentials: Option<&'a ProxyCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Get the request URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// HTTP client wrapper for package downloads
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom User-Agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FetchError::network("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Send a request and return the successful response
    pub async fn get(&self, request: DownloadRequest<'_>) -> Result<Response, FetchError> {
        let url = request.url().to_string();
        let mut builder = self.client.get(request.url);

        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        // Dropped by reqwest on redirects to another host.
        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        debug!(%url, "sending package request");
        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::network(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(&url, status.as_u16()));
        }

        debug!(%url, resolved = %response.url(), "package request succeeded");
        Ok(response)
    }
}
