//! Error types for the conversation crate.
//!
//! Errors are designed for layered context using rootcause. Handlers never
//! fail: anomalies in dispatched actions are skipped and logged. The only
//! error is a store that cannot be built.

use std::fmt;

/// Errors from assembling a conversation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No data driver was supplied, so messages could never be sent.
    MissingDataDriver,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDataDriver => write!(f, "missing option dataDriver"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_driver_display() {
        let err = ConfigurationError::MissingDataDriver;
        assert!(err.to_string().contains("dataDriver"));
    }
}
