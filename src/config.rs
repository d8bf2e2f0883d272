//! Resolves where the expense data lives.

use std::{
    env,
    path::{Path, PathBuf},
};

use crate::dataset::store_path;

/// The environment variable that overrides the CSV file path.
pub const DATA_FILE_ENV: &str = "EXPENSES_DATA_FILE";

/// The CSV file used when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "data/expenses.csv";

/// Where the expense data is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The CSV file naming the dataset. The database sits next to it.
    pub data_file: PathBuf,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Uses [DATA_FILE_ENV] if it is set and not empty, otherwise
    /// [DEFAULT_DATA_FILE].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_file = lookup(DATA_FILE_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Self { data_file }
    }

    /// Use `data_file` instead of the configured path, if given.
    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }

        self
    }

    /// The path of the CSV file.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// The path of the database that backs the CSV file.
    pub fn store_file(&self) -> PathBuf {
        store_path(&self.data_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}
