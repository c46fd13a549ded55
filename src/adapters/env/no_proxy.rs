use ipnet::IpNet;
use std::net::IpAddr;
use url::{Host, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NoProxyEntry {
    Wildcard,
    Network(IpNet),
    Ip(IpAddr),
    Domain { name: String, port: Option<u16> },
}

/// Hosts that must be reached without a proxy, in `no_proxy` syntax.
///
/// Entries are separated by commas or whitespace. `*` matches everything,
/// `example.com` and `.example.com` match the domain and its subdomains, an
/// optional `:port` restricts the match, and IP or CIDR entries match IP hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoProxy {
    entries: Vec<NoProxyEntry>,
}

impl NoProxy {
    pub fn parse(value: &str) -> Self {
        Self::from_entries(value.split(|c: char| c == ',' || c.is_whitespace()))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|entry| parse_entry(entry.as_ref()))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matches(&self, url: &Url) -> bool {
        let host = match url.host() {
            Some(host) => host,
            None => return false,
        };
        let port = url.port_or_known_default();

        self.entries.iter().any(|entry| match (entry, &host) {
            (NoProxyEntry::Wildcard, _) => true,
            (NoProxyEntry::Network(net), Host::Ipv4(ip)) => net.contains(&IpAddr::V4(*ip)),
            (NoProxyEntry::Network(net), Host::Ipv6(ip)) => net.contains(&IpAddr::V6(*ip)),
            (NoProxyEntry::Ip(expected), Host::Ipv4(ip)) => *expected == IpAddr::V4(*ip),
            (NoProxyEntry::Ip(expected), Host::Ipv6(ip)) => *expected == IpAddr::V6(*ip),
            (NoProxyEntry::Domain { name, port: wanted }, Host::Domain(domain)) => {
                domain_matches(domain, name) && wanted.map_or(true, |wanted| Some(wanted) == port)
            }
            _ => false,
        })
    }
}

fn domain_matches(host: &str, name: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == name || host.strip_suffix(name).map_or(false, |prefix| prefix.ends_with('.'))
}

fn parse_entry(raw: &str) -> Option<NoProxyEntry> {
    let entry = raw.trim().to_ascii_lowercase();
    if entry.is_empty() {
        return None;
    }
    if entry == "*" {
        return Some(NoProxyEntry::Wildcard);
    }
    if let Ok(net) = entry.parse::<IpNet>() {
        return Some(NoProxyEntry::Network(net));
    }
    if let Ok(ip) = entry.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        return Some(NoProxyEntry::Ip(ip));
    }

    let (name, port) = match entry.rsplit_once(':') {
        Some((name, port)) => match port.parse::<u16>() {
            Ok(port) => (name, Some(port)),
            Err(_) => {
                log::warn!("Ignoring no_proxy entry with invalid port: {}", raw);
                return None;
            }
        },
        None => (entry.as_str(), None),
    };

    let name = name.trim_start_matches("*.").trim_start_matches('.').trim_end_matches('.');
    if name.is_empty() {
        return None;
    }

    Some(NoProxyEntry::Domain {
        name: name.to_string(),
        port,
    })
}
