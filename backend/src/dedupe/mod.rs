//! Cross-row uniqueness of usernames and emails.
//!
//! A row is a duplicate when its username OR its email was already
//! accepted earlier in the run. The registry only grows.

use std::collections::HashSet;

use crate::models::DerivedIdentity;

/// Outcome of checking one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    Duplicate,
}

/// In-memory registry of accepted identities for one run.
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    accepted: Vec<DerivedIdentity>,
    usernames: HashSet<String>,
    emails: HashSet<String>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `identity`; record it when unique.
    pub fn check_and_record(&mut self, identity: &DerivedIdentity) -> Uniqueness {
        if self.is_duplicate(identity) {
            return Uniqueness::Duplicate;
        }

        self.usernames.insert(identity.username.clone());
        self.emails.insert(identity.normalized_email.clone());
        self.accepted.push(identity.clone());
        Uniqueness::Unique
    }

    /// True if either field collides with an accepted identity.
    pub fn is_duplicate(&self, identity: &DerivedIdentity) -> bool {
        self.usernames.contains(&identity.username)
            || self.emails.contains(&identity.normalized_email)
    }

    /// Accepted identities in acceptance order.
    pub fn accepted(&self) -> &[DerivedIdentity] {
        &self.accepted
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}
