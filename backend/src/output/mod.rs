//! The four output sinks of a run.
//!
//! ```text
//! output.csv             accounts (Moodle bulk upload)
//! output_email.csv       email merge list
//! output_cohorts.csv     distinct cohorts, written once at the end
//! output_duplicates.csv  rejected rows, removed when empty
//! ```
//!
//! Every sink writes its header as soon as it is opened and is append-only
//! afterwards. If the run aborts, whatever was written stays on disk.

use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, OutputResult};
use crate::logs::log_info;
use crate::models::{AccountRow, CohortRow, CohortSet, DuplicateRow, EmailRow};

pub const ACCOUNT_HEADERS: [&str; 7] = [
    "username", "password", "lastname", "firstname", "email", "lang", "cohort1",
];
pub const EMAIL_HEADERS: [&str; 6] = [
    "email", "addressing", "lastname", "firstname", "username", "password",
];
pub const COHORT_HEADERS: [&str; 3] = ["name", "idnumber", "description"];
pub const DUPLICATE_HEADERS: [&str; 5] = ["lastname", "firstname", "username", "email", "cohort1"];

/// Paths of the four sinks, derived from the accounts path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub accounts: PathBuf,
    pub email: PathBuf,
    pub cohorts: PathBuf,
    pub duplicates: PathBuf,
}

impl OutputPaths {
    /// `dir/name.csv` gives `dir/name_email.csv`, `dir/name_cohorts.csv`, `dir/name_duplicates.csv`.
    pub fn from_accounts(accounts: &Path) -> Self {
        let stem = accounts
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let sibling = |suffix: &str| accounts.with_file_name(format!("{}_{}.csv", stem, suffix));

        Self {
            accounts: accounts.to_path_buf(),
            email: sibling("email"),
            cohorts: sibling("cohorts"),
            duplicates: sibling("duplicates"),
        }
    }
}

/// One append-only CSV file.
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl CsvSink {
    /// Create (truncate) the file and write the header row.
    pub fn create(path: &Path, headers: &[&str]) -> OutputResult<Self> {
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(headers)
            .map_err(|source| OutputError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn append<T: Serialize>(&mut self, row: &T) -> OutputResult<()> {
        self.writer
            .serialize(row)
            .map_err(|source| OutputError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;
        Ok(())
    }

    fn close(mut self) -> OutputResult<usize> {
        self.writer.flush().map_err(|source| OutputError::Flush {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.rows)
    }
}

/// What the sinks hold once the run is over.
#[derive(Debug, Clone)]
pub struct OutputReport {
    pub paths: OutputPaths,
    pub account_rows: usize,
    pub email_rows: usize,
    pub cohorts: Vec<String>,
    pub duplicate_rows: usize,
    /// False when the empty duplicates file was removed.
    pub duplicates_kept: bool,
}

/// Routes pipeline results to the sinks and accumulates cohort labels.
pub struct OutputRouter {
    paths: OutputPaths,
    accounts: CsvSink,
    email: CsvSink,
    cohorts: CsvSink,
    duplicates: CsvSink,
    cohort_set: CohortSet,
}

impl OutputRouter {
    /// Open all four sinks and write their headers.
    pub fn create(paths: OutputPaths) -> OutputResult<Self> {
        Ok(Self {
            accounts: CsvSink::create(&paths.accounts, &ACCOUNT_HEADERS)?,
            email: CsvSink::create(&paths.email, &EMAIL_HEADERS)?,
            cohorts: CsvSink::create(&paths.cohorts, &COHORT_HEADERS)?,
            duplicates: CsvSink::create(&paths.duplicates, &DUPLICATE_HEADERS)?,
            cohort_set: CohortSet::new(),
            paths,
        })
    }

    pub fn write_account(&mut self, row: &AccountRow) -> OutputResult<()> {
        self.accounts.append(row)
    }

    pub fn write_email(&mut self, row: &EmailRow) -> OutputResult<()> {
        self.email.append(row)
    }

    pub fn write_duplicate(&mut self, row: &DuplicateRow) -> OutputResult<()> {
        self.duplicates.append(row)
    }

    /// Remember a cohort label; written once by [`finish`](Self::finish).
    pub fn record_cohort(&mut self, label: &str) {
        self.cohort_set.insert(label);
    }

    /// Flush the cohort list, close every sink and drop an empty duplicates file.
    pub fn finish(mut self) -> OutputResult<OutputReport> {
        for label in self.cohort_set.iter() {
            self.cohorts.append(&CohortRow::from_label(label))?;
            log_info(format!("{} - cohort record added", label));
        }
        let cohorts: Vec<String> = self.cohort_set.iter().map(str::to_string).collect();

        let account_rows = self.accounts.close()?;
        let email_rows = self.email.close()?;
        self.cohorts.close()?;
        let duplicate_rows = self.duplicates.close()?;

        let duplicates_kept = duplicate_rows > 0;
        if !duplicates_kept {
            std::fs::remove_file(&self.paths.duplicates).map_err(|source| OutputError::Remove {
                path: self.paths.duplicates.clone(),
                source,
            })?;
        }

        Ok(OutputReport {
            paths: self.paths,
            account_rows,
            email_rows,
            cohorts,
            duplicate_rows,
            duplicates_kept,
        })
    }
}
