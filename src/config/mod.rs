// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Catalogue configuration.
//!
//! This module manages the configuration file describing where the catalogue
//! database lives and how its connection is tuned.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONFIG_NAME: &str = "trackdb";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub version: u32,
    pub database_path: PathBuf,
    /// Require write-ahead logging when opening the database.
    pub wal: bool,
    pub cache_size_kib: i64,
    pub statement_cache_capacity: usize,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Placeholder returned for tracks without a known album.
    pub unknown_label: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            version: 1,
            database_path: PathBuf::from("catalogue.db"),
            wal: true,
            cache_size_kib: 64000,
            statement_cache_capacity: 100,
            busy_timeout_ms: 5000,
            unknown_label: "Unknown".to_string(),
        }
    }
}

pub fn load_config() -> CatalogConfig {
    or_default(confy::load(CONFIG_NAME, None))
}

/// Loads the configuration from an explicit file, falling back to defaults
/// if it cannot be read or parsed.
pub fn load_config_path(path: &Path) -> CatalogConfig {
    or_default(confy::load_path(path))
}

fn or_default(loaded: std::result::Result<CatalogConfig, confy::ConfyError>) -> CatalogConfig {
    loaded.unwrap_or_else(|err| {
        log::warn!("Failed to load configuration, using defaults: {err}");
        CatalogConfig::default()
    })
}

pub fn save_config(cfg: &CatalogConfig) -> Result<()> {
    confy::store(CONFIG_NAME, None, cfg)?;
    Ok(())
}

pub fn save_config_path(path: &Path, cfg: &CatalogConfig) -> Result<()> {
    confy::store_path(path, cfg)?;
    Ok(())
}
