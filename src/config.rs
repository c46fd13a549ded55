use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{pac_source_for, EnvProxySelector, ManualProxySelector, NoProxy, PacProxySelector, SystemProxySelector};
use crate::domain::{ProxyError, Result};

pub const APP_NAME: &str = "proxyselect";

/// Proxy settings, stored as TOML in the user's configuration directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Honour `http_proxy`, `https_proxy`, `all_proxy` and `no_proxy`
    pub use_environment: bool,
    /// Proxy used for every URL, e.g. `http://proxy.example.net:8080`
    pub proxy: Option<String>,
    /// PAC script location: `http(s)://`, `file://` or a path
    pub pac_url: Option<String>,
    /// Hosts always reached directly
    pub no_proxy: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_environment: true,
            proxy: None,
            pac_url: None,
            no_proxy: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; nothing is written to disk.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ProxyError::ConfigError(format!("{} does not exist", path.display())));
                }
                confy::load_path(path).map_err(|e| ProxyError::ConfigError(format!("{}: {}", path.display(), e)))
            }
            None => {
                let default_path = confy::get_configuration_file_path(APP_NAME, None)
                    .map_err(|e| ProxyError::ConfigError(e.to_string()))?;
                if default_path.exists() {
                    Self::load(Some(default_path.as_path()))
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Replace file values with those given on the command line.
    pub fn apply_overrides(&mut self, pac_url: Option<String>, proxy: Option<String>, no_env: bool) {
        if pac_url.is_some() {
            self.pac_url = pac_url;
        }
        if proxy.is_some() {
            self.proxy = proxy;
        }
        if no_env {
            self.use_environment = false;
        }
    }

    /// Wire the configured sources: manual proxy, environment, then PAC.
    ///
    /// A PAC script that cannot be loaded is skipped and the selector is
    /// marked incomplete.
    pub async fn build_selector(&self) -> Result<SystemProxySelector> {
        let mut selector = SystemProxySelector::new().with_no_proxy(NoProxy::from_entries(&self.no_proxy));

        if let Some(proxy) = &self.proxy {
            selector = selector.with_source("manual", Arc::new(ManualProxySelector::parse(proxy)?));
        }

        if self.use_environment {
            selector = selector.with_source("environment", Arc::new(EnvProxySelector::from_env()));
        }

        if let Some(pac_url) = &self.pac_url {
            selector = match pac_source_for(pac_url) {
                Ok(source) => match PacProxySelector::load(source.as_ref()).await {
                    Ok(pac) => selector.with_source("pac", Arc::new(pac)),
                    Err(e) => {
                        warn!("Skipping PAC source {}: {}", pac_url, e);
                        selector.with_missing_source("pac")
                    }
                },
                // a bad location stays bad, no point in building again
                Err(e) => {
                    warn!("Ignoring PAC location {}: {}", pac_url, e);
                    selector
                }
            };
        }

        info!("Proxy sources: {:?}", selector.source_names());
        Ok(selector)
    }
}
