//! Core configuration loaded from an optional JSON file.
//!
//! # Invariants
//! - Every field has a default; an empty object is a valid config.
//! - Unknown fields are rejected so typos surface instead of being ignored.

use crate::model::note::{NoteLimits, DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MAX_TITLE_CHARS};
use crate::repo::note_store::DEFAULT_STORAGE_QUOTA_BYTES;
use crate::search::engine::{QueryOptions, DEFAULT_PREVIEW_CHARS};
use crate::session::{SearchDebouncer, DEFAULT_DEBOUNCE_MS};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A field holds a value that can never work.
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::Invalid(details) => write!(f, "invalid config value: {details}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Tunables shared by the store, service, engine and session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub max_title_chars: usize,
    pub max_content_chars: usize,
    pub preview_chars: usize,
    pub storage_quota_bytes: usize,
    pub debounce_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl CoreConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates config from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_title_chars == 0 {
            return Err(ConfigError::Invalid("max_title_chars must be positive"));
        }
        if self.max_content_chars == 0 {
            return Err(ConfigError::Invalid("max_content_chars must be positive"));
        }
        if self.storage_quota_bytes == 0 {
            return Err(ConfigError::Invalid("storage_quota_bytes must be positive"));
        }
        Ok(())
    }

    pub fn note_limits(&self) -> NoteLimits {
        NoteLimits {
            max_title_chars: self.max_title_chars,
            max_content_chars: self.max_content_chars,
        }
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            preview_chars: self.preview_chars,
        }
    }

    /// Search debouncer waiting `debounce_ms` of quiet input.
    pub fn debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(Duration::from_millis(self.debounce_ms))
    }
}
