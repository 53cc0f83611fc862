//! Settings for where records live and how many books a patron may hold.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_BOOKS_ALLOWED_OUT: u32 = 3;
pub const BOOK_FILE_NAME: &str = "books.txt";
pub const PATRON_FILE_NAME: &str = "patrons.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub book_file: PathBuf,
    pub patron_file: PathBuf,
    pub max_books_allowed_out: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            book_file: data_dir.join(BOOK_FILE_NAME),
            patron_file: data_dir.join(PATRON_FILE_NAME),
            max_books_allowed_out: DEFAULT_MAX_BOOKS_ALLOWED_OUT,
        }
    }
}

impl LibraryConfig {
    /// Config with both record files inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            book_file: dir.join(BOOK_FILE_NAME),
            patron_file: dir.join(PATRON_FILE_NAME),
            max_books_allowed_out: DEFAULT_MAX_BOOKS_ALLOWED_OUT,
        }
    }

    /// Reads a JSON settings file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_books_allowed_out == 0 {
            return Err(ConfigError::Invalid(
                "max_books_allowed_out must be at least 1".to_string(),
            ));
        }
        if self.book_file == self.patron_file {
            return Err(ConfigError::Invalid(format!(
                "book_file and patron_file both point at {}",
                self.book_file.display()
            )));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "circulation", "circulation")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
