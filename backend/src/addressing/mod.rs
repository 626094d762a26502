//! Salutation lookup for the email merge.
//!
//! The male/female name lists are injected; a default table is embedded
//! from `data/names.json` and can be swapped for another file of the same
//! shape.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::Salutation;

const DEFAULT_NAMES: &str = include_str!("../../data/names.json");

/// First-name lists, keyed by native-script spelling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameLists {
    #[serde(default)]
    pub male: HashSet<String>,
    #[serde(default)]
    pub female: HashSet<String>,
}

impl NameLists {
    /// The embedded default table.
    pub fn embedded() -> ConfigResult<Self> {
        Self::from_json(DEFAULT_NAMES)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::NameLists(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NameLists(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

/// Maps a native first name to a [`Salutation`].
#[derive(Debug, Clone)]
pub struct AddressingClassifier {
    names: NameLists,
}

impl AddressingClassifier {
    pub fn new(names: NameLists) -> Self {
        Self { names }
    }

    /// Male list wins over the female list; unknown names get the neutral form.
    pub fn classify(&self, first_name: &str) -> Salutation {
        if self.names.male.contains(first_name) {
            Salutation::Male
        } else if self.names.female.contains(first_name) {
            Salutation::Female
        } else {
            Salutation::Neutral
        }
    }
}
