use async_trait::async_trait;
use log::debug;
use reqwest::ClientBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::domain::{ProxyError, Result};
use crate::ports::PacSourcePort;

/// PAC script served over HTTP(S); fetched without going through any proxy
pub struct HttpPacSource {
    url: String,
}

impl HttpPacSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl PacSourcePort for HttpPacSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String> {
        debug!("Attempting to download PAC file at {}", self.url);

        let response = ClientBuilder::new()
            .no_proxy()
            .build()
            .map_err(|e| ProxyError::PacLoadFailed(format!("HTTP client error: {}", e)))?
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProxyError::PacLoadFailed(format!("PAC download error: {}", e)))?
            .error_for_status()
            .map_err(|e| ProxyError::PacLoadFailed(format!("PAC download error: {}", e)))?;

        let pac_file = response
            .text()
            .await
            .map_err(|e| ProxyError::PacLoadFailed(format!("PAC read error: {}", e)))?;

        info!("Loaded PAC file from {} ({} bytes)", self.url, pac_file.len());
        Ok(pac_file)
    }
}

/// PAC script on the local filesystem
pub struct FilePacSource {
    location: String,
    path: PathBuf,
}

impl FilePacSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl PacSourcePort for FilePacSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<String> {
        let pac_file = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProxyError::PacLoadFailed(format!("{}: {}", self.location, e)))?;

        info!("Loaded PAC file from {} ({} bytes)", self.location, pac_file.len());
        Ok(pac_file)
    }
}

/// Pick a source for `location`: `http(s)://` and `file://` URLs, or a plain path.
pub fn pac_source_for(location: &str) -> Result<Arc<dyn PacSourcePort>> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Arc::new(HttpPacSource::new(location))),
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| ProxyError::ConfigError(format!("Invalid PAC file URL: {}", location)))?;
                Ok(Arc::new(FilePacSource::new(path)))
            }
            // Windows drive letters parse as a one-letter scheme
            scheme if scheme.len() == 1 => Ok(Arc::new(FilePacSource::new(location))),
            scheme => Err(ProxyError::ConfigError(format!("Unsupported PAC URL scheme: {}", scheme))),
        },
        Err(_) => Ok(Arc::new(FilePacSource::new(location))),
    }
}
