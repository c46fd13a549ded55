use log::debug;
use url::Url;

use super::evaluate_pac;
use crate::domain::{ProxyCandidate, Result};
use crate::ports::{PacSourcePort, ProxySelectorPort};

/// Selects proxies by running a PAC script for every URL
pub struct PacProxySelector {
    script: String,
    location: String,
}

impl PacProxySelector {
    pub fn new(script: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            location: location.into(),
        }
    }

    /// Fetch the script once from `source`
    pub async fn load(source: &dyn PacSourcePort) -> Result<Self> {
        let script = source.fetch().await?;
        Ok(Self::new(script, source.location()))
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl ProxySelectorPort for PacProxySelector {
    fn select(&self, target_url: &Url) -> Result<Vec<ProxyCandidate>> {
        let candidates = evaluate_pac(&self.script, target_url)?;
        debug!("PAC {} returned {} candidate(s) for {}", self.location, candidates.len(), target_url);
        Ok(candidates)
    }
}
