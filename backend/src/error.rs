//! Error types for the roster provisioning pipeline.
//!
//! The hierarchy mirrors the failure taxonomy of a run:
//!
//! - [`ConfigError`] - bad paths, missing API key, unreadable name tables
//! - [`NameError`] - a name that does not split into 2 or 3 words
//! - [`RemoteError`] - a remote dependency failed (transliteration, passwords)
//! - [`CredentialError`] - unsatisfiable password policy
//! - [`OutputError`] - output sinks could not be created, written or removed
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Input CSV errors live next to the reader in [`crate::parser::CsvError`].
//! Every lower-level error converts into [`PipelineError`] so `?` works
//! across module boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::CsvError;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors detected before any output is produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No input file given.
    #[error("No input file given. Usage: rosterload generate -i <input.csv> [-o <output.csv>] [-l]")]
    MissingInput,

    /// Input and output point at the same file.
    #[error("Input and output files must be different: {0}")]
    SamePaths(PathBuf),

    /// A path without the `.csv` extension.
    #[error("Input and output files must be .csv format: {0}")]
    NotCsv(PathBuf),

    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// API key file was missing; a placeholder has been created.
    #[error("'{0}' file not found. File has been created. Please place your API key inside it.")]
    MissingApiKey(PathBuf),

    /// API key file still holds the placeholder text.
    #[error("'{0}' still contains the placeholder. Please place your API key inside it.")]
    PlaceholderApiKey(PathBuf),

    /// API key file could not be read or created.
    #[error("Error reading API key from '{path}': {source}")]
    ApiKeyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Name lists for salutations could not be loaded.
    #[error("Invalid name lists: {0}")]
    NameLists(String),

    /// Password policy cannot be satisfied.
    #[error("Invalid password policy: {0}")]
    Policy(#[from] CredentialError),
}

// =============================================================================
// Name Errors
// =============================================================================

/// A full name that cannot be split into last/first[/patronymic].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    /// Fewer than two words.
    #[error("name '{0}' has fewer than 2 words")]
    TooFewParts(String),

    /// More than three words.
    #[error("name '{0}' has more than 3 words")]
    TooManyParts(String),
}

// =============================================================================
// Remote Dependency Errors
// =============================================================================

/// A remote service the run depends on failed. Always fatal to the run.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Could not reach the service.
    #[error("{service} request failed: {message}")]
    Transport { service: &'static str, message: String },

    /// Service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Response body could not be interpreted.
    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: &'static str, message: String },

    /// Response did not contain the expected field.
    #[error("{service} response has no '{field}' field")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },
}

// =============================================================================
// Credential Errors
// =============================================================================

/// Errors from the local password generator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// No password can satisfy the configured policy.
    #[error("{0}")]
    Unsatisfiable(String),

    /// Rejection sampling gave up.
    #[error("no compliant password after {0} attempts")]
    Exhausted(usize),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors on the four output sinks.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create an output file.
    #[error("Cannot create '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a record.
    #[error("Cannot write to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to flush a sink to disk.
    #[error("Cannot flush '{path}': {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove the empty duplicates file.
    #[error("Error removing duplicates file '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::RowPipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Remote dependency error.
    #[error("Remote dependency error: {0}")]
    Remote(#[from] RemoteError),

    /// Password generation error.
    #[error("Password error: {0}")]
    Credential(#[from] CredentialError),

    /// Output sink error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// A row whose name (native or romanized) is malformed.
    #[error("Row {row}: malformed {form}: {source}")]
    MalformedName {
        row: usize,
        form: &'static str,
        #[source]
        source: NameError,
    },
}

impl PipelineError {
    /// True when the run stopped because a remote service failed.
    pub fn is_remote(&self) -> bool {
        matches!(self, PipelineError::Remote(_))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Result type for output sinks.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let remote = RemoteError::Status {
            service: "Transliteration",
            status: 503,
            body: "down".into(),
        };
        let pipeline_err: PipelineError = remote.into();
        assert!(pipeline_err.is_remote());
        assert!(pipeline_err.to_string().contains("503"));

        let cred = CredentialError::Unsatisfiable("length 4 is too short".into());
        let config: ConfigError = cred.into();
        let pipeline_err: PipelineError = config.into();
        assert!(!pipeline_err.is_remote());
        assert!(pipeline_err.to_string().contains("too short"));
    }

    #[test]
    fn test_malformed_name_format() {
        let err = PipelineError::MalformedName {
            row: 7,
            form: "native name",
            source: NameError::TooFewParts("Шевченко".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 7"));
        assert!(msg.contains("Шевченко"));
    }
}
