//! Where the sitemap document comes from.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Sitemap fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("request to `{0}` failed")]
    Http(Url, #[source] reqwest::Error),

    #[error("`{0}` responded with status {1}")]
    Status(Url, u16),

    #[error("sitemap document is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// Capability to fetch the raw sitemap document.
#[async_trait]
pub trait SitemapSource: Send + Sync {
    async fn fetch_document(&self) -> Result<Value, FetchError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Sitemap read from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SitemapSource for FileSource {
    async fn fetch_document(&self) -> Result<Value, FetchError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Io(self.path.clone(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Sitemap fetched over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SitemapSource for HttpSource {
    async fn fetch_document(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Http(self.url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(self.url.clone(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(self.url.clone(), e))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
