//! Domain models for the roster provisioning pipeline.
//!
//! - [`InputRecord`] - one roster row as read from the input CSV
//! - [`NameParts`] - last name, first name and optional patronymic
//! - [`DerivedIdentity`] - username + normalized email, the uniqueness key
//! - [`Credential`] - a generated password
//! - [`Salutation`] - addressing category for the email merge
//! - [`CohortSet`] - distinct cohort labels in first-seen order
//! - Output rows: [`AccountRow`], [`EmailRow`], [`CohortRow`], [`DuplicateRow`]

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Input
// =============================================================================

/// One roster row. Column names match the input CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRecord {
    /// Native-script full name, "last first [patronymic]".
    pub name: String,
    /// Email address as provided.
    pub email: String,
    /// Cohort (group) label.
    pub cohort: String,
}

// =============================================================================
// Names
// =============================================================================

/// A full name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub last_name: String,
    pub first_name: String,
    pub patronymic: Option<String>,
}

impl NameParts {
    /// First name followed by the patronymic, as Moodle's `firstname` column expects.
    pub fn given_names(&self) -> String {
        match &self.patronymic {
            Some(p) => format!("{} {}", self.first_name, p),
            None => self.first_name.clone(),
        }
    }

    /// All parts joined by single spaces, in "last first [patronymic]" order.
    pub fn joined(&self) -> String {
        format!("{} {}", self.last_name, self.given_names())
    }
}

// =============================================================================
// Identity & Credential
// =============================================================================

/// The per-row uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedIdentity {
    pub username: String,
    pub normalized_email: String,
}

impl DerivedIdentity {
    pub fn new(username: impl Into<String>, email: &str) -> Self {
        Self {
            username: username.into(),
            normalized_email: normalize_email(email),
        }
    }
}

/// Emails compare trimmed and case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A generated password. Never reused across rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub password: String,
}

// =============================================================================
// Salutation
// =============================================================================

/// Addressing category used in the email merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Salutation {
    Male,
    Female,
    Neutral,
}

impl Salutation {
    /// The salutation text written to the email merge list.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Шановний",
            Self::Female => "Шановна",
            Self::Neutral => "Шановний/Шановна",
        }
    }
}

// =============================================================================
// Cohorts
// =============================================================================

/// Distinct cohort labels, kept in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct CohortSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl CohortSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label. Returns `true` if it had not been seen before.
    pub fn insert(&mut self, label: &str) -> bool {
        if self.seen.contains(label) {
            return false;
        }
        self.seen.insert(label.to_string());
        self.order.push(label.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

// =============================================================================
// Output rows
// =============================================================================

/// Moodle bulk-upload row.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRow {
    pub username: String,
    pub password: String,
    pub lastname: String,
    pub firstname: String,
    pub email: String,
    pub lang: &'static str,
    pub cohort1: String,
}

/// Email merge row.
#[derive(Debug, Clone, Serialize)]
pub struct EmailRow {
    pub email: String,
    pub addressing: &'static str,
    pub lastname: String,
    pub firstname: String,
    pub username: String,
    pub password: String,
}

/// Moodle cohort upload row.
#[derive(Debug, Clone, Serialize)]
pub struct CohortRow {
    pub name: String,
    pub idnumber: String,
    pub description: String,
}

impl CohortRow {
    pub fn from_label(label: &str) -> Self {
        Self {
            name: label.to_string(),
            idnumber: label.to_string(),
            description: String::new(),
        }
    }
}

/// A rejected duplicate.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRow {
    pub lastname: String,
    pub firstname: String,
    pub username: String,
    pub email: String,
    pub cohort1: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_given_names() {
        let full = NameParts {
            last_name: "Шевченко".into(),
            first_name: "Тарас".into(),
            patronymic: Some("Григорович".into()),
        };
        assert_eq!(full.given_names(), "Тарас Григорович");
        assert_eq!(full.joined(), "Шевченко Тарас Григорович");

        let short = NameParts {
            last_name: "Українка".into(),
            first_name: "Леся".into(),
            patronymic: None,
        };
        assert_eq!(short.given_names(), "Леся");
        assert_eq!(short.joined(), "Українка Леся");
    }

    #[test]
    fn test_cohort_set_keeps_first_seen_order() {
        let mut set = CohortSet::new();
        assert!(set.insert("B2"));
        assert!(set.insert("A1"));
        assert!(!set.insert("B2"));
        assert!(set.insert("C3"));
        assert!(!set.insert("A1"));

        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["B2", "A1", "C3"]);
    }

    #[test]
    fn test_email_normalization() {
        let a = DerivedIdentity::new("t.h.shevchenko", " T.Shevchenko@Example.com ");
        assert_eq!(a.normalized_email, "t.shevchenko@example.com");
    }
}
