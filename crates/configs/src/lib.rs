use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use docstore::StoreOptions;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub root: String,
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            dir_mode: default_dir_mode(),
            file_mode: default_file_mode(),
            sync_writes: default_sync_writes(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub const DEFAULT_ROOT: &str = "./data";

fn default_dir_mode() -> u32 { 0o755 }
fn default_file_mode() -> u32 { 0o644 }
fn default_sync_writes() -> bool { true }

/// `CONFIG_PATH`, or `docstore.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "docstore.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `docstore.toml`); a missing file falls back to defaults.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.store.normalize_from_env();
        self.store.validate()?;
        Ok(())
    }

    /// Store root plus the engine options derived from `[store]`.
    /// The log sink stays at its default (`tracing`).
    pub fn store_settings(&self) -> (PathBuf, StoreOptions) {
        let options = StoreOptions {
            dir_mode: self.store.dir_mode,
            file_mode: self.store.file_mode,
            sync_writes: self.store.sync_writes,
            ..StoreOptions::default()
        };
        (PathBuf::from(&self.store.root), options)
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.root.trim().is_empty() {
            self.root = std::env::var("DOCSTORE_ROOT")
                .ok()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROOT.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.root.trim().is_empty() {
            return Err(anyhow!("store.root is empty; set it in docstore.toml or DOCSTORE_ROOT"));
        }
        if self.dir_mode > 0o777 || self.file_mode > 0o777 {
            return Err(anyhow!("store.dir_mode and store.file_mode must be within 0o777"));
        }
        if self.dir_mode & 0o700 != 0o700 {
            return Err(anyhow!("store.dir_mode must grant the owner rwx (got {:o})", self.dir_mode));
        }
        Ok(())
    }
}
