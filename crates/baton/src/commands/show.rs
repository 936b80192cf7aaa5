//! List sessions or print one descriptor.

use anyhow::Result;
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub name: Option<String>,
    pub json: bool,
}

pub fn run(ctx: &AppContext, options: &ShowOptions) -> Result<()> {
    match &options.name {
        Some(name) => show_one(ctx, name, options.json),
        None => list_all(ctx, options.json),
    }
}

fn list_all(ctx: &AppContext, json: bool) -> Result<()> {
    let entries = ctx.store.list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No sessions in {}", ctx.store.root().display());
        return Ok(());
    }
    for entry in entries {
        let modified = entry
            .modified
            .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<24} {:<17} {}", entry.name.as_str(), modified, entry.summary);
    }
    Ok(())
}

fn show_one(ctx: &AppContext, raw: &str, json: bool) -> Result<()> {
    let name = SessionName::parse(raw)?;
    if json {
        let entry = ctx.store.entry(&name)?;
        let detail = serde_json::json!({
            "name": entry.name,
            "summary": entry.summary,
            "modified": entry.modified,
            "path": ctx.store.descriptor_path(&name),
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }
    print!("{}", ctx.store.read(&name)?);
    Ok(())
}
