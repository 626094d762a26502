//! # Rosterload - Moodle accounts from a roster CSV
//!
//! Rosterload turns a roster of people (native-script full names, emails,
//! cohort labels) into the files needed to provision Moodle accounts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │ Roster CSV  │────▶│   Parser    │────▶│ RowPipeline │────▶│ accounts.csv     │
//! │ (auto-enc)  │     │             │     │ (per row)   │     │ accounts_email   │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     │ accounts_cohorts │
//!                                                │            │ accounts_dupl... │
//!                          transliteration API ◀─┤            └──────────────────┘
//!                          password API / local ◀┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (InputRecord, NameParts, output rows)
//! - [`parser`] - Roster CSV reading with auto-detection
//! - [`identity`] - Name splitting and username derivation
//! - [`transliterate`] - Remote name romanization
//! - [`credential`] - Remote and local password generation
//! - [`dedupe`] - Username/email uniqueness tracking
//! - [`addressing`] - Salutation lookup
//! - [`remote`] - Shared HTTP plumbing and service probes
//! - [`output`] - The four output sinks
//! - [`pipeline`] - Per-row orchestration
//! - [`config`] - Run configuration
//! - [`logs`] - Progress log

// Core modules
pub mod error;
pub mod models;
pub mod config;
pub mod logs;

// Input
pub mod parser;

// Row processing
pub mod identity;
pub mod transliterate;
pub mod credential;
pub mod dedupe;
pub mod addressing;
pub mod remote;

// Output
pub mod output;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError,
    CredentialError,
    NameError,
    OutputError,
    PipelineError,
    RemoteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    InputRecord,
    NameParts,
    DerivedIdentity,
    Credential,
    Salutation,
    CohortSet,
};

// =============================================================================
// Re-exports - Row processing
// =============================================================================

pub use identity::{derive_username, normalize_apostrophes, split_name};
pub use transliterate::{SlovnykClient, Transliterator};
pub use credential::{
    CredentialGenerator,
    LocalPasswordGenerator,
    PasswordPolicy,
    RemotePasswordClient,
};
pub use dedupe::{DuplicateTracker, Uniqueness};
pub use addressing::{AddressingClassifier, NameLists};

// =============================================================================
// Re-exports - Input / Output
// =============================================================================

pub use parser::{read_roster, parse_roster_bytes, CsvError, Roster};
pub use output::{OutputPaths, OutputReport, OutputRouter};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use config::{GenerateOptions, PasswordStrategy, RunConfig, Endpoints};
pub use pipeline::{generate, RowOutcome, RowPipeline, RunSummary};
