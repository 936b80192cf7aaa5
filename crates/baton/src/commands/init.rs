//! Create a session from the built-in template.

use anyhow::Result;
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub name: String,
    pub force: bool,
}

pub fn run(ctx: &AppContext, options: &InitOptions) -> Result<()> {
    tracing::debug!(name = %options.name, "executing init command");
    let name = SessionName::parse(options.name.as_str())?;
    let path = ctx.store.create(&name, options.force)?;
    println!("Created session '{name}' at {}", path.display());
    Ok(())
}
