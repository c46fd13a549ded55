use std::sync::Arc;

use log::{debug, warn};
use url::Url;

use super::env::NoProxy;
use crate::domain::{ProxyCandidate, ProxyError, Result};
use crate::platform;
use crate::ports::ProxySelectorPort;

/// The platform proxy facility: a chain of configured sources.
///
/// The first source answering with a non-empty list wins. Nothing configured,
/// detection disabled, or a `no_proxy` match all answer `[DIRECT]`.
pub struct SystemProxySelector {
    sources: Vec<(String, Arc<dyn ProxySelectorPort>)>,
    missing_sources: Vec<String>,
    no_proxy: NoProxy,
}

impl SystemProxySelector {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            missing_sources: Vec::new(),
            no_proxy: NoProxy::default(),
        }
    }

    pub fn with_source(mut self, name: impl Into<String>, source: Arc<dyn ProxySelectorPort>) -> Self {
        self.sources.push((name.into(), source));
        self
    }

    /// Record a configured source that could not be set up
    pub fn with_missing_source(mut self, name: impl Into<String>) -> Self {
        self.missing_sources.push(name.into());
        self
    }

    /// False when a configured source is missing and building again may help
    pub fn is_complete(&self) -> bool {
        self.missing_sources.is_empty()
    }

    pub fn with_no_proxy(mut self, no_proxy: NoProxy) -> Self {
        self.no_proxy = no_proxy;
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for SystemProxySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxySelectorPort for SystemProxySelector {
    fn select(&self, target_url: &Url) -> Result<Vec<ProxyCandidate>> {
        if !platform::system_proxies_enabled() {
            debug!("System proxy detection disabled, going direct for {}", target_url);
            return Ok(vec![ProxyCandidate::direct()]);
        }

        if self.no_proxy.matches(target_url) {
            debug!("{} matches configured no_proxy, going direct", target_url);
            return Ok(vec![ProxyCandidate::direct()]);
        }

        let mut first_error: Option<ProxyError> = None;
        let mut any_succeeded = false;

        for (name, source) in &self.sources {
            match source.select(target_url) {
                Ok(candidates) if !candidates.is_empty() => {
                    debug!("Proxy source {} answered for {}", name, target_url);
                    return Ok(candidates);
                }
                Ok(_) => any_succeeded = true,
                Err(e) => {
                    warn!("Proxy source {} failed for {}: {}", name, target_url, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !any_succeeded => Err(e),
            _ => Ok(vec![ProxyCandidate::direct()]),
        }
    }
}
