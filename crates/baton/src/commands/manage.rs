//! Rename, copy, and remove sessions.

use anyhow::Result;
use baton_core::{Error, SessionName};

use super::AppContext;

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub source: String,
    pub target: String,
}

pub fn run_rename(ctx: &AppContext, options: &RenameOptions) -> Result<()> {
    let source = SessionName::parse(options.source.as_str())?;
    let target = SessionName::parse(options.target.as_str())?;
    ctx.store.rename(&source, &target)?;
    println!("Renamed session '{source}' to '{target}'");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CopyOptions {
    pub source: String,
    pub target: String,
}

pub fn run_copy(ctx: &AppContext, options: &CopyOptions) -> Result<()> {
    let source = SessionName::parse(options.source.as_str())?;
    let target = SessionName::parse(options.target.as_str())?;
    ctx.store.copy(&source, &target)?;
    println!("Copied session '{source}' to '{target}'");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RemoveOptions {
    pub names: Vec<String>,
    pub force: bool,
}

pub fn run_remove(ctx: &AppContext, options: &RemoveOptions) -> Result<()> {
    for raw in &options.names {
        let name = SessionName::parse(raw.as_str())?;
        match ctx.store.remove(&name) {
            Ok(()) => println!("Removed session '{name}'"),
            Err(Error::NotFound(_)) if options.force => {
                tracing::debug!(session = %name, "already absent");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
