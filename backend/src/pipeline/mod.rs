//! Per-row pipeline: roster row in, account + email rows (or a duplicate row) out.
//!
//! ```text
//! name ──split──▶ native parts ──transliterate──▶ romanized parts ──derive──▶ username
//!                                                                              │
//!                              duplicate? ◀── (username, email) ──────────────┘
//!                 yes: duplicates sink
//!                 no:  password + salutation ──▶ accounts + email sinks, cohort recorded
//! ```
//!
//! Rows are handled strictly one after another. A remote failure stops the
//! whole run; outputs written so far stay on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use rosterload::{generate, GenerateOptions, RunConfig};
//!
//! let config = RunConfig::from_options(&GenerateOptions {
//!     input: Some("roster.csv".into()),
//!     local_passwords: true,
//!     ..GenerateOptions::default()
//! })?;
//! let summary = generate(&config).await?;
//! println!("{} accounts", summary.accepted);
//! ```

use crate::addressing::AddressingClassifier;
use crate::config::{PasswordStrategy, RunConfig};
use crate::credential::{CredentialGenerator, LocalPasswordGenerator, RemotePasswordClient};
use crate::dedupe::{DuplicateTracker, Uniqueness};
use crate::error::{PipelineError, PipelineResult};
use crate::identity::{derive_username, split_name};
use crate::logs::{log_info, log_info_indent, log_separator, log_success, log_warning};
use crate::models::{AccountRow, DerivedIdentity, DuplicateRow, EmailRow, InputRecord};
use crate::output::{OutputReport, OutputRouter};
use crate::parser::read_roster;
use crate::transliterate::{SlovnykClient, Transliterator};

/// Value of the `lang` column for every account.
pub const ACCOUNT_LANGUAGE: &str = "UK";

/// How a single row ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Account and email rows written, cohort recorded.
    Accepted { username: String },
    /// Row diverted to the duplicates report.
    Duplicate { username: String },
}

/// Totals of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub processed: usize,
    pub accepted: usize,
    pub duplicates: usize,
    pub outputs: OutputReport,
}

/// Composes name handling, transliteration, dedup and credentials per row.
pub struct RowPipeline<T: Transliterator> {
    transliterator: T,
    credentials: CredentialGenerator,
    addressing: AddressingClassifier,
    tracker: DuplicateTracker,
}

impl<T: Transliterator> RowPipeline<T> {
    pub fn new(
        transliterator: T,
        credentials: CredentialGenerator,
        addressing: AddressingClassifier,
    ) -> Self {
        Self {
            transliterator,
            credentials,
            addressing,
            tracker: DuplicateTracker::new(),
        }
    }

    /// Process one row. `row` is 1-based and only used for messages.
    pub async fn process_row(
        &mut self,
        row: usize,
        record: &InputRecord,
        router: &mut OutputRouter,
    ) -> PipelineResult<RowOutcome> {
        let native = split_name(&record.name).map_err(|source| PipelineError::MalformedName {
            row,
            form: "native name",
            source,
        })?;

        let romanized_text = self.transliterator.transliterate(&native.joined()).await?;
        let romanized = split_name(&romanized_text).map_err(|source| PipelineError::MalformedName {
            row,
            form: "romanized name",
            source,
        })?;

        let username = derive_username(&romanized);
        let email = record.email.trim();
        let identity = DerivedIdentity::new(username.clone(), email);

        if self.tracker.check_and_record(&identity) == Uniqueness::Duplicate {
            router.write_duplicate(&DuplicateRow {
                lastname: native.last_name.clone(),
                firstname: native.given_names(),
                username: username.clone(),
                email: email.to_string(),
                cohort1: record.cohort.clone(),
            })?;
            log_warning(format!("{} - {} - duplicate user found!", row, username));
            return Ok(RowOutcome::Duplicate { username });
        }

        let credential = self.credentials.generate().await?;

        router.write_account(&AccountRow {
            username: username.clone(),
            password: credential.password.clone(),
            lastname: native.last_name.clone(),
            firstname: native.given_names(),
            email: email.to_string(),
            lang: ACCOUNT_LANGUAGE,
            cohort1: record.cohort.clone(),
        })?;
        log_success(format!("{} - {} - user account info generated", row, username));

        let salutation = self.addressing.classify(&native.first_name);
        router.write_email(&EmailRow {
            email: email.to_string(),
            addressing: salutation.as_str(),
            lastname: native.last_name.clone(),
            firstname: native.given_names(),
            username: username.clone(),
            password: credential.password,
        })?;
        log_info_indent(format!("{} - email info generated", username), 1);

        router.record_cohort(&record.cohort);

        Ok(RowOutcome::Accepted { username })
    }

    /// Process every record in order, then flush cohorts and close the sinks.
    pub async fn run(
        mut self,
        records: &[InputRecord],
        mut router: OutputRouter,
    ) -> PipelineResult<RunSummary> {
        let mut accepted = 0;
        let mut duplicates = 0;

        for (idx, record) in records.iter().enumerate() {
            match self.process_row(idx + 1, record, &mut router).await? {
                RowOutcome::Accepted { .. } => accepted += 1,
                RowOutcome::Duplicate { .. } => duplicates += 1,
            }
        }

        log_separator();
        let outputs = router.finish()?;

        Ok(RunSummary {
            processed: records.len(),
            accepted,
            duplicates,
            outputs,
        })
    }
}

/// Build the credential source a configuration asks for.
pub fn credential_generator(config: &RunConfig) -> PipelineResult<CredentialGenerator> {
    Ok(match &config.password {
        PasswordStrategy::Remote { api_key } => CredentialGenerator::Remote(RemotePasswordClient::with_urls(
            api_key,
            &config.endpoints.password_url,
            &config.endpoints.password_status_url,
        )),
        PasswordStrategy::Local(policy) => {
            CredentialGenerator::Local(LocalPasswordGenerator::new(policy.clone())?)
        }
    })
}

/// Run the whole job described by `config`.
///
/// Order: read the roster, probe the services, open the sinks, process rows.
/// Nothing is written before the roster has been read and the services answered.
pub async fn generate(config: &RunConfig) -> PipelineResult<RunSummary> {
    log_info(format!("📖 Reading roster: {}", config.input.display()));
    let roster = read_roster(&config.input)?;
    log_success(format!(
        "{} rows (encoding {}, delimiter '{}')",
        roster.records.len(),
        roster.encoding,
        format_delimiter(roster.delimiter)
    ));

    let transliterator = SlovnykClient::new(&config.endpoints.translit_url)?;
    let credentials = credential_generator(config)?;

    if config.check_services {
        log_separator();
        transliterator.probe().await?;
        credentials.probe().await?;
    }
    log_separator();

    let router = OutputRouter::create(config.outputs.clone())?;
    let pipeline = RowPipeline::new(
        transliterator,
        credentials,
        AddressingClassifier::new(config.names.clone()),
    );

    pipeline.run(&roster.records, router).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
