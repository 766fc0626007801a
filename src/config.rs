//! Settings for the `lineage` binary.
//!
//! Values come from an optional `lineage.toml` (or whatever file
//! `LINEAGE_CONFIG` points at), overridden by `LINEAGE_*` environment
//! variables such as `LINEAGE_DATABASE` or `LINEAGE_LOG_FILTER`.

use std::path::Path;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::persist::PersistenceMode;
use crate::person::FamilyId;

pub const DEFAULT_CONFIG_FILE: &str = "lineage.toml";
pub const CONFIG_PATH_VARIABLE: &str = "LINEAGE_CONFIG";
const ENVIRONMENT_PREFIX: &str = "LINEAGE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Path of the SQLite file. Absent means an in-memory store.
    #[serde(default)]
    pub database: Option<String>,
    /// Family scope to lay out. Absent means the shared example dataset.
    #[serde(default)]
    pub family: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            family: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Reads the file named by `LINEAGE_CONFIG`, or `lineage.toml`, then the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VARIABLE).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(path)
    }
    /// A missing file is fine; a malformed one is not.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENVIRONMENT_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
    pub fn persistence_mode(&self) -> PersistenceMode {
        match self.database.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => PersistenceMode::File(path.to_string()),
            _ => PersistenceMode::InMemory,
        }
    }
    pub fn family_scope(&self) -> Option<FamilyId> {
        self.family
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .map(|family| FamilyId::new(family))
    }
}
