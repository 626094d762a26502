//! Local password generation by rejection sampling.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::CredentialError;
use crate::models::Credential;

/// Characters counted as "special".
pub const SPECIAL_CHARACTERS: &str = "!@#$%&*()_";

pub const MIN_LOWERCASE: usize = 4;
pub const MIN_UPPERCASE: usize = 2;
pub const MIN_DIGITS: usize = 2;

/// Upper bound on redraws. A satisfiable policy at the default length
/// accepts roughly one candidate in ten.
pub const MAX_ATTEMPTS: usize = 100_000;

/// Composition rules for locally generated passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Exact password length.
    pub length: usize,
    /// Exact number of characters from [`SPECIAL_CHARACTERS`].
    pub special_count: usize,
    /// Characters that must never appear.
    pub exclude: String,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 12,
            special_count: 2,
            exclude: "lI".to_string(),
        }
    }
}

impl PasswordPolicy {
    /// Reject policies no password can satisfy.
    pub fn validate(&self) -> Result<(), CredentialError> {
        let required = (MIN_LOWERCASE + MIN_UPPERCASE + MIN_DIGITS)
            .checked_add(self.special_count)
            .ok_or_else(|| {
                CredentialError::Unsatisfiable(format!(
                    "special character count {} exceeds any password length",
                    self.special_count
                ))
            })?;
        if self.length < required {
            return Err(CredentialError::Unsatisfiable(format!(
                "length {} is shorter than the {} characters the composition rules require",
                self.length, required
            )));
        }

        let alphabet = self.alphabet();
        let classes: [(&str, fn(&char) -> bool, bool); 4] = [
            ("lowercase letters", char::is_ascii_lowercase, true),
            ("uppercase letters", char::is_ascii_uppercase, true),
            ("digits", char::is_ascii_digit, true),
            ("special characters", is_special, self.special_count > 0),
        ];

        for (name, belongs, needed) in classes {
            if needed && !alphabet.iter().any(belongs) {
                return Err(CredentialError::Unsatisfiable(format!(
                    "exclusion set '{}' removes all {}",
                    self.exclude, name
                )));
            }
        }

        Ok(())
    }

    /// True when `candidate` meets every rule.
    pub fn is_satisfied_by(&self, candidate: &str) -> bool {
        let mut lower = 0;
        let mut upper = 0;
        let mut digits = 0;
        let mut specials = 0;
        let mut length = 0;

        for c in candidate.chars() {
            if self.exclude.contains(c) {
                return false;
            }
            length += 1;
            if c.is_ascii_lowercase() {
                lower += 1;
            } else if c.is_ascii_uppercase() {
                upper += 1;
            } else if c.is_ascii_digit() {
                digits += 1;
            } else if is_special(&c) {
                specials += 1;
            }
        }

        length == self.length
            && lower >= MIN_LOWERCASE
            && upper >= MIN_UPPERCASE
            && digits >= MIN_DIGITS
            && specials == self.special_count
    }

    /// Letters, digits and specials minus the exclusion set.
    fn alphabet(&self) -> Vec<char> {
        ('a'..='z')
            .chain('A'..='Z')
            .chain('0'..='9')
            .chain(SPECIAL_CHARACTERS.chars())
            .filter(|c| !self.exclude.contains(*c))
            .collect()
    }
}

fn is_special(c: &char) -> bool {
    SPECIAL_CHARACTERS.contains(*c)
}

/// Lowercase, uppercase and digit minimums every password must meet,
/// whichever generator produced it.
pub fn meets_minimums(password: &str) -> bool {
    let count = |belongs: fn(&char) -> bool| password.chars().filter(belongs).count();

    count(char::is_ascii_lowercase) >= MIN_LOWERCASE
        && count(char::is_ascii_uppercase) >= MIN_UPPERCASE
        && count(char::is_ascii_digit) >= MIN_DIGITS
}

/// Draws passwords from the OS random source until one meets the policy.
#[derive(Debug, Clone)]
pub struct LocalPasswordGenerator {
    policy: PasswordPolicy,
    alphabet: Vec<char>,
}

impl LocalPasswordGenerator {
    /// Validates the policy up front so [`generate`](Self::generate) cannot spin forever.
    pub fn new(policy: PasswordPolicy) -> Result<Self, CredentialError> {
        policy.validate()?;
        let alphabet = policy.alphabet();
        Ok(Self { policy, alphabet })
    }

    pub fn generate(&self) -> Result<Credential, CredentialError> {
        let mut rng = OsRng;

        for _ in 0..MAX_ATTEMPTS {
            let candidate: String = (0..self.policy.length)
                .filter_map(|_| self.alphabet.choose(&mut rng).copied())
                .collect();

            if self.policy.is_satisfied_by(&candidate) {
                return Ok(Credential { password: candidate });
            }
        }

        Err(CredentialError::Exhausted(MAX_ATTEMPTS))
    }
}
