//! Configuration for figmentdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{FigmentError, Result};

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the log file. Compaction also uses a sibling temp file:
    ///   {path}
    ///   {path}.compact.tmp   (only while compacting)
    pub path: PathBuf,

    /// Create missing parent directories on initialize
    pub create_parent_dirs: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// How each append reaches stable storage
    pub sync_strategy: SyncStrategy,
}

/// Log file sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every append and replace (safest, slowest)
    EveryWrite,

    /// Hand every append to the OS synchronously but skip the fsync.
    /// `Store::sync` and `Store::close` are the durability barrier.
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db.json"),
            create_parent_dirs: true,
            sync_strategy: SyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(FigmentError::Config("log file path is empty".to_string()));
        }
        if self.path.file_name().is_none() {
            return Err(FigmentError::Config(format!(
                "log file path {} has no file name",
                self.path.display()
            )));
        }
        if self.path.is_dir() {
            return Err(FigmentError::Config(format!(
                "log file path {} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Path of the temporary file compaction writes before renaming
    pub fn compaction_tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".compact.tmp");
        PathBuf::from(name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Whether missing parent directories are created on initialize
    pub fn create_parent_dirs(mut self, create: bool) -> Self {
        self.config.create_parent_dirs = create;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
