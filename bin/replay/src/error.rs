//! Error types for the replay binary.

use std::fmt;
use std::path::PathBuf;

/// Replay failures. Invalid action lines are not errors; they are logged
/// and skipped.
#[derive(Debug)]
pub enum ReplayError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// The conversation store could not be built.
    Store { details: String },
    /// The input file could not be opened.
    OpenInput { path: PathBuf, details: String },
    /// Reading a line of input failed.
    ReadInput { line: usize, details: String },
    /// Writing output failed.
    WriteOutput { details: String },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {}", details),
            Self::Store { details } => write!(f, "failed to build conversation store: {}", details),
            Self::OpenInput { path, details } => {
                write!(f, "failed to open '{}': {}", path.display(), details)
            }
            Self::ReadInput { line, details } => {
                write!(f, "failed to read input line {}: {}", line, details)
            }
            Self::WriteOutput { details } => write!(f, "failed to write output: {}", details),
        }
    }
}

impl std::error::Error for ReplayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_input_display_names_path() {
        let err = ReplayError::OpenInput {
            path: PathBuf::from("/nope/actions.jsonl"),
            details: "not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/actions.jsonl"));
        assert!(msg.contains("not found"));
    }
}
