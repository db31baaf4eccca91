//! # Configuration
//!
//! Catalog configuration is managed by [`confique`], which handles layered
//! loading from TOML files, environment variables, and programmatic
//! overrides.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding the JSON table files |
//! | `admin_key` | unset | Key exchanged for an admin token |
//!
//! With no `admin_key` configured, no admin token can be issued and the
//! catalog is effectively read-only through the API facade.

use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};

/// Configuration for the catalog, stored in `sumario.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory holding the JSON table files. When unset, the
    /// OS-appropriate data directory is used.
    pub data_dir: Option<PathBuf>,

    /// Key exchanged for an admin token. Unset means the admin surface
    /// stays closed.
    pub admin_key: Option<String>,
}

impl CatalogConfig {
    /// Resolve the data directory: the explicit override when set,
    /// otherwise the OS-appropriate project data directory.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Some(dir.clone());
        }
        directories::ProjectDirs::from("", "", "sumario")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }
}
