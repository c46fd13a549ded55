use std::fmt;

use super::{ProxyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Http,
    Socks,
    Direct,
}

impl ProxyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyType::Http => "HTTP",
            ProxyType::Socks => "SOCKS",
            ProxyType::Direct => "DIRECT",
        }
    }

    /// Port assumed when a proxy of this type is given without one.
    pub fn default_port(&self) -> u16 {
        match self {
            ProxyType::Http => 80,
            ProxyType::Socks => 1080,
            ProxyType::Direct => 0,
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unresolved proxy endpoint: the host name is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketAddress {
    pub hostname: String,
    pub port: u16,
}

impl SocketAddress {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`.
    pub fn parse(authority: &str, default_port: u16) -> Result<Self> {
        let authority = authority.trim();
        if authority.is_empty() {
            return Err(ProxyError::InvalidProxy("empty proxy address".into()));
        }

        let (host, port) = if let Some(rest) = authority.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| ProxyError::InvalidProxy(format!("unterminated IPv6 literal in {}", authority)))?;
            match tail {
                "" => (host, None),
                _ => match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(ProxyError::InvalidProxy(format!("unexpected data after host in {}", authority))),
                },
            }
        } else {
            match authority.matches(':').count() {
                0 => (authority, None),
                1 => {
                    let (host, port) = authority.split_once(':').unwrap_or((authority, ""));
                    (host, Some(port))
                }
                // bare IPv6 literal without a port
                _ => (authority, None),
            }
        };

        if host.is_empty() {
            return Err(ProxyError::InvalidProxy(format!("missing host in {}", authority)));
        }

        let port = match port {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| ProxyError::InvalidProxy(format!("invalid port in {}: {}", authority, e)))?,
            None => default_port,
        };

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCandidate {
    pub kind: ProxyType,
    pub address: Option<SocketAddress>,
}

impl ProxyCandidate {
    pub fn direct() -> Self {
        Self {
            kind: ProxyType::Direct,
            address: None,
        }
    }

    pub fn http(hostname: impl Into<String>, port: u16) -> Self {
        Self::with_address(ProxyType::Http, SocketAddress::new(hostname, port))
    }

    pub fn socks(hostname: impl Into<String>, port: u16) -> Self {
        Self::with_address(ProxyType::Socks, SocketAddress::new(hostname, port))
    }

    pub fn with_address(kind: ProxyType, address: SocketAddress) -> Self {
        Self {
            kind,
            address: Some(address),
        }
    }

    /// `TYPE://host:port`, or `None` when the candidate has no address.
    pub fn to_proxy_string(&self) -> Option<String> {
        self.address
            .as_ref()
            .map(|addr| format!("{}://{}:{}", self.kind, addr.hostname, addr.port))
    }
}

impl fmt::Display for ProxyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(addr) => write!(f, "{} {}", self.kind, addr),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Outcome of a single resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unavailable(ProxyError),
}

impl Resolution {
    pub fn into_option(self) -> Option<String> {
        match self {
            Resolution::Resolved(proxy) => Some(proxy),
            Resolution::Unavailable(_) => None,
        }
    }
}
