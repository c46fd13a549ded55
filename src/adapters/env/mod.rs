mod no_proxy;
mod selector;

pub use no_proxy::NoProxy;
pub use selector::{parse_proxy_url, EnvProxySelector, VarSource};
