//! Global configuration at ~/.config/gcalsync/config.toml.
//!
//! Every field is optional; defaults put both databases under the
//! platform data directory. CLI flags override whatever is configured.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;

/// Default base URL of the remote calendar service.
const DEFAULT_SERVER_URL: &str = "https://gdata.googleapis.com/calendar/v1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GcalsyncConfig {
    /// Base URL of the remote calendar service.
    pub server_url: Option<String>,
    /// Path of the mapping database.
    pub mapping_db: Option<PathBuf>,
    /// Path of the local calendar database.
    pub calendar_db: Option<PathBuf>,
}

impl GcalsyncConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let cfg = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()?
            .try_deserialize()?;

        Ok(cfg)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine config directory")?
            .join("gcalsync");

        Ok(config_dir.join("config.toml"))
    }

    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn mapping_db(&self) -> Result<PathBuf> {
        match &self.mapping_db {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("gcalsync.db")),
        }
    }

    pub fn calendar_db(&self) -> Result<PathBuf> {
        match &self.calendar_db {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("calendars.db")),
        }
    }
}

fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("could not determine data directory")?
        .join("gcalsync");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create {}", dir.display()))?;
    Ok(dir)
}
