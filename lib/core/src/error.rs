//! Error handling foundation for roomchat.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific error types in its own
//! error module and returns them wrapped in a [`Report`].

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    fn fails() -> Result<i32, Boom> {
        Err(Boom.into())
    }

    #[test]
    fn result_type_works() {
        let ok: Result<i32, Boom> = Ok(42);
        assert_eq!(ok.expect("should be ok"), 42);
    }

    #[test]
    fn report_carries_context_message() {
        let err = fails().expect_err("should fail");
        assert!(err.to_string().contains("boom"));
    }
}
