//! Configuration loading for Indigo.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/indigo/config.toml` (platform
//! equivalent via `directories`).

use std::collections::HashSet;
use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::IndigoError;
use crate::ids::is_valid_id;

/// Transaction limits applied by the storage backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSettings {
    /// Maximum number of distinct keys written per transaction attempt.
    /// `None` means unlimited. Hosted document stores typically cap this at 500.
    #[serde(default)]
    pub max_writes: Option<usize>,

    /// Reject reads of a key after it has been written in the same attempt.
    #[serde(default)]
    pub forbid_read_after_write: bool,

    /// How many times a conflicting transaction is re-executed before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_max_retries() -> usize {
    5
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            max_writes: None,
            forbid_read_after_write: false,
            max_retries: default_max_retries(),
        }
    }
}

impl TransactionSettings {
    /// Limits matching a hosted document database: 500 writes, no reads after writes.
    pub fn document_store() -> Self {
        Self {
            max_writes: Some(500),
            forbid_read_after_write: true,
            ..Default::default()
        }
    }

    pub fn with_max_writes(mut self, max_writes: usize) -> Self {
        self.max_writes = Some(max_writes);
        self
    }

    pub fn with_forbid_read_after_write(mut self, forbid: bool) -> Self {
        self.forbid_read_after_write = forbid;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// How stored terms are chosen for a search term.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// Look up the search term only
    #[default]
    Exact,
    /// Look up every stored term starting with the search term
    Prefix,
}

/// One configured index over a single record field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexSettings {
    /// Index id; also the prefix of every storage key the index owns
    pub id: String,

    /// Record field whose text is indexed
    pub field: String,

    #[serde(default)]
    pub selector: SelectorKind,

    /// Drop stop words when indexing
    #[serde(default)]
    pub stop_words: bool,

    /// Index every prefix (length >= 3) of each word
    #[serde(default)]
    pub ngrams: bool,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to RocksDB storage directory
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Namespace holding the records and their id counter
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Records per transaction when rebuilding indices
    #[serde(default = "default_reindex_batch_size")]
    pub reindex_batch_size: usize,

    #[serde(default)]
    pub transaction: TransactionSettings,

    #[serde(default)]
    pub indices: Vec<IndexSettings>,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "indigo")
        .map(|p| p.data_local_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_namespace() -> String {
    "entities".to_string()
}

fn default_reindex_batch_size() -> usize {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level(),
            namespace: default_namespace(),
            reindex_batch_size: default_reindex_batch_size(),
            transaction: TransactionSettings::default(),
            indices: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/indigo/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (INDIGO_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, IndigoError> {
        let config_dir = ProjectDirs::from("", "", "indigo")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| IndigoError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| IndigoError::Config(e.to_string()))?
            .set_default("namespace", default_namespace())
            .map_err(|e| IndigoError::Config(e.to_string()))?
            .set_default("reindex_batch_size", default_reindex_batch_size() as i64)
            .map_err(|e| IndigoError::Config(e.to_string()))?
            .set_default("transaction.max_retries", default_max_retries() as i64)
            .map_err(|e| IndigoError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // INDIGO_DB_PATH, INDIGO_TRANSACTION__MAX_WRITES, ...
        builder = builder.add_source(
            Environment::with_prefix("INDIGO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| IndigoError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| IndigoError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), IndigoError> {
        if !is_valid_id(&self.namespace) {
            return Err(IndigoError::Config(format!(
                "namespace {:?} is not a valid store id",
                self.namespace
            )));
        }
        if self.reindex_batch_size == 0 {
            return Err(IndigoError::Config("reindex_batch_size must be > 0".to_string()));
        }
        if self.transaction.max_writes == Some(0) {
            return Err(IndigoError::Config(
                "transaction.max_writes must be > 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for index in &self.indices {
            if !is_valid_id(&index.id) {
                return Err(IndigoError::Config(format!(
                    "index id {:?} is not a valid store id",
                    index.id
                )));
            }
            if !seen.insert(index.id.as_str()) {
                return Err(IndigoError::Config(format!(
                    "index {} is configured more than once",
                    index.id
                )));
            }
        }
        Ok(())
    }

    /// Expand ~ in db_path to actual home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(&self.db_path)
    }
}
