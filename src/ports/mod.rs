pub mod pac_source;
pub mod selector;

pub use pac_source::PacSourcePort;
pub use selector::ProxySelectorPort;
