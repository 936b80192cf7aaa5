//! Open a descriptor in the user's editor.

use anyhow::{anyhow, bail, Context, Result};
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone)]
pub struct EditOptions {
    pub name: String,
}

pub fn run(ctx: &AppContext, options: &EditOptions) -> Result<()> {
    let name = SessionName::parse(options.name.as_str())?;
    if !ctx.store.exists(&name) {
        return Err(baton_core::Error::NotFound(name.to_string()).into());
    }
    let editor = editor_command()?;
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("editor command is empty");
    };
    let status = std::process::Command::new(program)
        .args(parts)
        .arg(ctx.store.descriptor_path(&name))
        .status()
        .with_context(|| format!("failed to launch editor '{editor}'"))?;
    if !status.success() {
        bail!("editor '{editor}' exited with {status}");
    }
    Ok(())
}

fn editor_command() -> Result<String> {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .map_err(|_| anyhow!("no editor configured; set VISUAL or EDITOR"))
}
