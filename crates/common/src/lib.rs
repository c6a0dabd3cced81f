//! Shared helpers used by every crate in the workspace.
//!
//! Currently this is the tracing setup and the small enums that the
//! configuration layer and the binary both need to agree on.

pub mod types;
pub mod utils;

pub use types::LogFormat;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_defaults_to_compact() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
