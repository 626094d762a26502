//! Run configuration.
//!
//! Everything a run needs is resolved once, up front, into a [`RunConfig`]
//! that is handed to the pipeline. Nothing here touches the network.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::addressing::NameLists;
use crate::credential::{PasswordPolicy, DEFAULT_PASSWORD_API_URL, PASSWORD_API_STATUS_URL};
use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputPaths;
use crate::transliterate::DEFAULT_TRANSLIT_URL;

/// Default accounts file.
pub const DEFAULT_OUTPUT: &str = "output.csv";

/// Default API key file, relative to the working directory.
pub const DEFAULT_API_KEY_FILE: &str = "password_api_key.txt";

/// Text written into a freshly created API key file.
pub const API_KEY_PLACEHOLDER: &str = "Place your API key here...";

/// Environment variable checked before the API key file.
pub const API_KEY_ENV: &str = "PASSWORD_API_KEY";

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    /// Use the local generator instead of the web API.
    pub local_passwords: bool,
    pub policy: PasswordPolicy,
    pub names_file: Option<PathBuf>,
    pub api_key_file: PathBuf,
    pub skip_checks: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            local_passwords: false,
            policy: PasswordPolicy::default(),
            names_file: None,
            api_key_file: PathBuf::from(DEFAULT_API_KEY_FILE),
            skip_checks: false,
        }
    }
}

/// Where passwords come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordStrategy {
    Remote { api_key: String },
    Local(PasswordPolicy),
}

/// Remote service URLs. Overridable through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub translit_url: String,
    pub password_url: String,
    pub password_status_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            translit_url: DEFAULT_TRANSLIT_URL.to_string(),
            password_url: DEFAULT_PASSWORD_API_URL.to_string(),
            password_status_url: PASSWORD_API_STATUS_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Defaults, overridden by `TRANSLIT_URL`, `PASSWORD_API_URL` and `PASSWORD_API_STATUS_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            translit_url: env::var("TRANSLIT_URL").unwrap_or(defaults.translit_url),
            password_url: env::var("PASSWORD_API_URL").unwrap_or(defaults.password_url),
            password_status_url: env::var("PASSWORD_API_STATUS_URL")
                .unwrap_or(defaults.password_status_url),
        }
    }
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub outputs: OutputPaths,
    pub password: PasswordStrategy,
    pub names: NameLists,
    pub endpoints: Endpoints,
    /// Probe the remote services before processing rows.
    pub check_services: bool,
}

impl RunConfig {
    /// Validate options and resolve the API key, name lists and endpoints.
    pub fn from_options(options: &GenerateOptions) -> ConfigResult<Self> {
        let (input, output) = validate_paths(options.input.as_deref(), &options.output)?;

        let password = if options.local_passwords {
            options.policy.validate()?;
            PasswordStrategy::Local(options.policy.clone())
        } else {
            PasswordStrategy::Remote {
                api_key: resolve_api_key(&options.api_key_file)?,
            }
        };

        let names = match &options.names_file {
            Some(path) => NameLists::from_file(path)?,
            None => NameLists::embedded()?,
        };

        Ok(Self {
            input,
            outputs: OutputPaths::from_accounts(&output),
            password,
            names,
            endpoints: Endpoints::from_env(),
            check_services: !options.skip_checks,
        })
    }
}

/// Check input/output paths before anything is opened.
pub fn validate_paths(input: Option<&Path>, output: &Path) -> ConfigResult<(PathBuf, PathBuf)> {
    let input = input.ok_or(ConfigError::MissingInput)?;

    if input == output || same_file(input, output) {
        return Err(ConfigError::SamePaths(input.to_path_buf()));
    }
    for path in [input, output] {
        if !has_csv_extension(path) {
            return Err(ConfigError::NotCsv(path.to_path_buf()));
        }
    }
    if !input.is_file() {
        return Err(ConfigError::InputNotFound(input.to_path_buf()));
    }

    Ok((input.to_path_buf(), output.to_path_buf()))
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// API key from `PASSWORD_API_KEY`, falling back to the key file.
pub fn resolve_api_key(key_file: &Path) -> ConfigResult<String> {
    match env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => read_api_key_file(key_file),
    }
}

/// Read the key file. A missing file is created with a placeholder and reported as an error.
pub fn read_api_key_file(path: &Path) -> ConfigResult<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let key = content.trim();
            if key.is_empty() || key == API_KEY_PLACEHOLDER {
                Err(ConfigError::PlaceholderApiKey(path.to_path_buf()))
            } else {
                Ok(key.to_string())
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::write(path, API_KEY_PLACEHOLDER).map_err(|source| ConfigError::ApiKeyIo {
                path: path.to_path_buf(),
                source,
            })?;
            Err(ConfigError::MissingApiKey(path.to_path_buf()))
        }
        Err(source) => Err(ConfigError::ApiKeyIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_input() {
        let err = validate_paths(None, Path::new("output.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput));
    }

    #[test]
    fn test_same_paths_rejected() {
        let err = validate_paths(Some(Path::new("roster.csv")), Path::new("roster.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::SamePaths(_)));
    }

    #[test]
    fn test_extension_checked() {
        let err = validate_paths(Some(Path::new("roster.txt")), Path::new("out.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::NotCsv(_)));

        let err = validate_paths(Some(Path::new("roster.csv")), Path::new("out.xlsx")).unwrap_err();
        assert!(matches!(err, ConfigError::NotCsv(_)));
    }

    #[test]
    fn test_input_must_exist() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing.csv");
        let err = validate_paths(Some(&input), &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::InputNotFound(_)));
    }

    #[test]
    fn test_valid_paths() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("roster.CSV");
        fs::write(&input, "name,email,cohort\n").unwrap();
        let output = dir.path().join("out.csv");

        let (i, o) = validate_paths(Some(&input), &output).unwrap();
        assert_eq!(i, input);
        assert_eq!(o, output);
    }

    #[test]
    fn test_missing_key_file_is_bootstrapped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_API_KEY_FILE);

        let err = read_api_key_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), API_KEY_PLACEHOLDER);

        // placeholder left untouched is still an error
        let err = read_api_key_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::PlaceholderApiKey(_)));
    }

    #[test]
    fn test_key_file_read_and_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_API_KEY_FILE);
        fs::write(&path, "  abc123\n").unwrap();
        assert_eq!(read_api_key_file(&path).unwrap(), "abc123");
    }

    #[test]
    fn test_local_options_skip_api_key() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("roster.csv");
        fs::write(&input, "name,email,cohort\n").unwrap();

        let options = GenerateOptions {
            input: Some(input),
            output: dir.path().join("out.csv"),
            local_passwords: true,
            api_key_file: dir.path().join("never_created.txt"),
            ..GenerateOptions::default()
        };
        let config = RunConfig::from_options(&options).unwrap();

        assert_eq!(config.password, PasswordStrategy::Local(PasswordPolicy::default()));
        assert!(config.check_services);
        assert!(!dir.path().join("never_created.txt").exists());
        assert_eq!(config.outputs.email, dir.path().join("out_email.csv"));
    }

    #[test]
    fn test_unsatisfiable_policy_is_config_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("roster.csv");
        fs::write(&input, "name,email,cohort\n").unwrap();

        let options = GenerateOptions {
            input: Some(input),
            output: dir.path().join("out.csv"),
            local_passwords: true,
            policy: PasswordPolicy {
                length: 6,
                special_count: 2,
                exclude: String::new(),
            },
            ..GenerateOptions::default()
        };
        let err = RunConfig::from_options(&options).unwrap_err();
        assert!(matches!(err, ConfigError::Policy(_)));
    }
}
