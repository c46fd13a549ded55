mod evaluator;
mod selector;
mod source;

pub use evaluator::{evaluate_pac, parse_pac_result};
pub use selector::PacProxySelector;
pub use source::{pac_source_for, FilePacSource, HttpPacSource};
