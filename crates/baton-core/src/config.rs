//! Configuration loading.
//!
//! Loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `~/.config/baton/config.toml`
//! 3. Environment variables: `BATON_SESSION_DIR`, `BATON_RUNNER`
//!
//! # Example config
//!
//! ```toml
//! session_dir = "/data/beamline/sessions"
//! runner = "baton-runtime --profile p05"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const ENV_SESSION_DIR: &str = "BATON_SESSION_DIR";
pub const ENV_RUNNER: &str = "BATON_RUNNER";

/// Default runtime command launched by `start`.
pub const DEFAULT_RUNNER: &str = "baton-runtime";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding session descriptors and logs.
    pub session_dir: PathBuf,
    /// Command `start` launches with the descriptor path appended.
    pub runner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_dir: default_session_dir(),
            runner: DEFAULT_RUNNER.to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "baton")
}

fn default_session_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("sessions"))
        .unwrap_or_else(|| PathBuf::from(".baton/sessions"))
}

/// Location of the global config file, when a home directory exists.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Load the effective configuration: defaults, then the global file
    /// when present, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|err| Error::Config(format!("{}: {err}", path.display())))
    }

    /// Apply environment overrides through an injected lookup, so the
    /// hierarchy is testable without touching the process environment.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var(ENV_SESSION_DIR) {
            self.session_dir = PathBuf::from(dir);
        }
        if let Some(runner) = var(ENV_RUNNER) {
            self.runner = runner;
        }
    }
}
