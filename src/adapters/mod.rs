pub mod env;
pub mod manual;
pub mod pac;
pub mod system;

pub use env::{EnvProxySelector, NoProxy};
pub use manual::ManualProxySelector;
pub use pac::*;
pub use system::SystemProxySelector;
