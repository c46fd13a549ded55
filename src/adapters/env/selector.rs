use std::collections::HashMap;
use std::env;

use log::debug;
use url::Url;

use super::NoProxy;
use crate::domain::{ProxyCandidate, ProxyError, ProxyType, Result, SocketAddress};
use crate::ports::ProxySelectorPort;

/// Where proxy variables are read from
#[derive(Debug, Clone)]
pub enum VarSource {
    /// Live process environment, read on every selection
    Process,
    Fixed(HashMap<String, String>),
}

impl VarSource {
    fn get(&self, name: &str) -> Option<String> {
        let value = match self {
            VarSource::Process => env::var(name).ok(),
            VarSource::Fixed(vars) => vars.get(name).cloned(),
        };
        value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

/// Proxy selection from curl-style environment variables
/// (`http_proxy`, `https_proxy`, `all_proxy`, `no_proxy`, ...).
pub struct EnvProxySelector {
    vars: VarSource,
}

impl EnvProxySelector {
    pub fn from_env() -> Self {
        Self {
            vars: VarSource::Process,
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: VarSource::Fixed(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let lower = name.to_ascii_lowercase();
        self.vars.get(&lower).or_else(|| {
            // HTTP_PROXY can be injected by CGI through the Proxy request header
            if lower == "http_proxy" {
                None
            } else {
                self.vars.get(&name.to_ascii_uppercase())
            }
        })
    }

    fn proxy_for_scheme(&self, scheme: &str) -> Option<String> {
        self.lookup(&format!("{}_proxy", scheme))
            .or_else(|| self.lookup("all_proxy"))
    }
}

impl ProxySelectorPort for EnvProxySelector {
    fn select(&self, target_url: &Url) -> Result<Vec<ProxyCandidate>> {
        if let Some(no_proxy) = self.lookup("no_proxy") {
            if NoProxy::parse(&no_proxy).matches(target_url) {
                debug!("{} matches no_proxy, going direct", target_url);
                return Ok(vec![ProxyCandidate::direct()]);
            }
        }

        match self.proxy_for_scheme(target_url.scheme()) {
            Some(proxy) => {
                debug!("Environment proxy for {}: {}", target_url, proxy);
                Ok(vec![parse_proxy_url(&proxy)?])
            }
            None => Ok(vec![]),
        }
    }
}

/// Parse a proxy given as a URL (`socks5://host:1080`) or bare `host:port`.
pub fn parse_proxy_url(value: &str) -> Result<ProxyCandidate> {
    let value = value.trim();
    let with_scheme = if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    };

    let url = Url::parse(&with_scheme).map_err(|e| ProxyError::InvalidProxy(format!("{}: {}", value, e)))?;

    let kind = match url.scheme() {
        "http" | "https" => ProxyType::Http,
        "socks" | "socks4" | "socks4a" | "socks5" | "socks5h" => ProxyType::Socks,
        "direct" => return Ok(ProxyCandidate::direct()),
        scheme => return Err(ProxyError::InvalidProxy(format!("Unsupported proxy scheme: {}", scheme))),
    };

    let hostname = match url.host() {
        Some(url::Host::Ipv6(ip)) => ip.to_string(),
        Some(host) => host.to_string(),
        None => return Err(ProxyError::InvalidProxy(format!("Missing host in {}", value))),
    };
    let port = url.port_or_known_default().unwrap_or_else(|| kind.default_port());

    Ok(ProxyCandidate::with_address(kind, SocketAddress::new(hostname, port)))
}
