//! Run configuration
//!
//! Settings resolve in order: CLI flag, environment variable, YAML config
//! file, built-in default. A missing config file is not an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the database path
pub const ENV_DB: &str = "BABBLE_DB";
/// Environment variable overriding the output separator
pub const ENV_SEPARATOR: &str = "BABBLE_SEPARATOR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Settings loadable from a YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database file
    pub db: Option<PathBuf>,
    /// Separator placed between generated surface forms
    pub separator: Option<String>,
}

impl Config {
    /// Load from an explicit file path, or from `babble.yml` in the current
    /// directory when no path is given. An absent default file yields the
    /// empty config; an absent explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from("babble.yml"), false),
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Resolve the database path: flag > env > config file > platform
    /// data directory.
    pub fn resolve_db(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| std::env::var_os(ENV_DB).map(PathBuf::from))
            .or_else(|| self.db.clone())
            .unwrap_or_else(default_db_path)
    }

    /// Resolve the output separator: flag > env > config file > `""`.
    ///
    /// The default suits languages that do not delimit words with spaces;
    /// space-delimited corpora should configure `" "`.
    pub fn resolve_separator(&self, flag: Option<String>) -> String {
        flag.or_else(|| std::env::var(ENV_SEPARATOR).ok())
            .or_else(|| self.separator.clone())
            .unwrap_or_default()
    }
}

/// Default database path (`<data dir>/babble/babble.db`)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("babble").join("babble.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_yaml_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "db: /tmp/corpus.db\nseparator: \" \"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.db.as_deref(), Some(Path::new("/tmp/corpus.db")));
        assert_eq!(config.separator.as_deref(), Some(" "));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/babble.yml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "databse: /tmp/x.db").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn flag_wins_over_file() {
        let config = Config {
            db: Some(PathBuf::from("/from/file.db")),
            separator: Some("|".to_string()),
        };
        assert_eq!(
            config.resolve_db(Some(PathBuf::from("/from/flag.db"))),
            PathBuf::from("/from/flag.db")
        );
        assert_eq!(config.resolve_separator(Some("-".to_string())), "-");
        assert_eq!(config.resolve_separator(None), "|");
    }

    #[test]
    fn separator_defaults_to_empty() {
        let config = Config::default();
        assert_eq!(config.resolve_separator(None), "");
    }
}
