//! Resolve the system proxy to use for a URI.
//!
//! [`ProxyResolver`] asks a [`ports::ProxySelectorPort`] for the ordered proxy
//! candidates of a URI and answers with the first one that has an address,
//! formatted as `TYPE://host:port`. Native callers go through [`ffi`].

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ffi;
pub mod logging;
pub mod platform;
pub mod ports;

pub use config::Config;
pub use domain::{ProxyResolver, Resolution};
