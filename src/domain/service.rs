use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use super::{ProxyCandidate, ProxyError, Resolution};
use crate::platform;
use crate::ports::ProxySelectorPort;

/// Resolves the proxy to use for a URI into a `TYPE://host:port` string.
///
/// Resolution is best effort: every failure is logged and reported as an
/// absent proxy by [`ProxyResolver::resolve`].
#[derive(Clone)]
pub struct ProxyResolver {
    selector: Arc<dyn ProxySelectorPort>,
}

impl ProxyResolver {
    /// Creating a resolver enables system proxy detection for the process.
    pub fn new(selector: Arc<dyn ProxySelectorPort>) -> Self {
        platform::enable_system_proxies();
        Self { selector }
    }

    pub fn resolve(&self, uri: &str) -> Option<String> {
        self.resolve_detailed(uri).into_option()
    }

    pub fn resolve_detailed(&self, uri: &str) -> Resolution {
        match self.try_resolve(uri) {
            Ok(proxy) => {
                debug!("Resolved proxy for {}: {}", uri, proxy);
                Resolution::Resolved(proxy)
            }
            Err(err @ (ProxyError::NoCandidates | ProxyError::NoAddressedCandidate)) => {
                debug!("No proxy for {}: {}", uri, err);
                Resolution::Unavailable(err)
            }
            Err(err) => {
                warn!("Proxy resolution for {} failed: {}", uri, err);
                Resolution::Unavailable(err)
            }
        }
    }

    fn try_resolve(&self, uri: &str) -> super::Result<String> {
        let target_url = Url::parse(uri).map_err(|e| ProxyError::InvalidUri(format!("{}: {}", uri, e)))?;
        let candidates = self.selector.select(&target_url)?;

        if candidates.is_empty() {
            return Err(ProxyError::NoCandidates);
        }

        first_usable(candidates).ok_or(ProxyError::NoAddressedCandidate)
    }
}

/// Format the first candidate that carries an address; later ones are not inspected.
pub fn first_usable<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = ProxyCandidate>,
{
    candidates.into_iter().find_map(|candidate| candidate.to_proxy_string())
}
