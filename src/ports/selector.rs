use crate::domain::{ProxyCandidate, Result};
use url::Url;

/// Port for asking the platform which proxies may be used to reach a URL
pub trait ProxySelectorPort: Send + Sync {
    /// Ordered candidate list for `target_url`, most preferred first.
    ///
    /// A candidate without an address stands for a direct connection.
    fn select(&self, target_url: &Url) -> Result<Vec<ProxyCandidate>>;
}
