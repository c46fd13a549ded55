use url::Url;

use super::env::parse_proxy_url;
use crate::domain::{ProxyCandidate, Result};
use crate::ports::ProxySelectorPort;

/// A single proxy configured by hand, used for every URL
pub struct ManualProxySelector {
    candidate: ProxyCandidate,
}

impl ManualProxySelector {
    pub fn new(candidate: ProxyCandidate) -> Self {
        Self { candidate }
    }

    pub fn parse(proxy: &str) -> Result<Self> {
        Ok(Self::new(parse_proxy_url(proxy)?))
    }
}

impl ProxySelectorPort for ManualProxySelector {
    fn select(&self, _target_url: &Url) -> Result<Vec<ProxyCandidate>> {
        Ok(vec![self.candidate.clone()])
    }
}
