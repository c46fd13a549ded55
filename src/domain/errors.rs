use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    InvalidUri(String),
    InvalidProxy(String),
    SelectorFailed(String),
    PacLoadFailed(String),
    PacEvaluationFailed(String),
    ConfigError(String),
    NoCandidates,
    NoAddressedCandidate,
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::InvalidUri(msg) => write!(f, "Invalid URI: {}", msg),
            ProxyError::InvalidProxy(msg) => write!(f, "Invalid proxy: {}", msg),
            ProxyError::SelectorFailed(msg) => write!(f, "Proxy selection failed: {}", msg),
            ProxyError::PacLoadFailed(msg) => write!(f, "PAC load failed: {}", msg),
            ProxyError::PacEvaluationFailed(msg) => write!(f, "PAC evaluation failed: {}", msg),
            ProxyError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ProxyError::NoCandidates => write!(f, "No proxy candidates returned"),
            ProxyError::NoAddressedCandidate => write!(f, "No proxy candidate with an address"),
        }
    }
}

impl std::error::Error for ProxyError {}

pub type Result<T> = std::result::Result<T, ProxyError>;
