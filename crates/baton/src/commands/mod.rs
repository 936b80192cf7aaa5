//! Session-management command implementations.

pub mod edit;
pub mod init;
pub mod log;
pub mod manage;
pub mod show;
pub mod start;
pub mod transfer;

use anyhow::Result;
use baton_core::{Config, SessionStore};

/// Shared state handed to every command handler for one process run.
pub struct AppContext {
    pub config: Config,
    pub store: SessionStore,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let store = SessionStore::open(&config.session_dir)?;
        Ok(Self { config, store })
    }
}
