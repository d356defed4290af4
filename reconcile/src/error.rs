//! Error taxonomy for loading inputs and writing reports.
//!
//! Every variant names the file it concerns. None of these are recovered
//! from; they abort the run. A reconciliation mismatch is not an error.

use std::path::PathBuf;

/// Errors raised while loading snapshots or delta logs, or writing output.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// A file could not be opened, read, or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A graph serialization is malformed.
    #[error("failed to parse {} as {format}: {message}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Format the file was parsed as.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },

    /// A snapshot contains a term that has no plain string value
    /// (an RDF-star quoted triple or a variable).
    #[error("unsupported {kind} term in {}", path.display())]
    UnsupportedTerm {
        /// Offending file.
        path: PathBuf,
        /// Term kind as reported by the parser.
        kind: String,
    },

    /// No format was given and the file extension is not a known one.
    #[error("cannot determine graph format of {} (use --format)", path.display())]
    UnknownFormat {
        /// Offending file.
        path: PathBuf,
    },

    /// The delta log is not valid JSON or lacks an expected field.
    #[error("malformed delta log {}: {source}", path.display())]
    Delta {
        /// Offending file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ReconcileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReconcileError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReconcileError>;
