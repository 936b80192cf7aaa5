//! Print a session log.

use anyhow::Result;
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub name: String,
    pub lines: Option<u64>,
}

pub fn run(ctx: &AppContext, options: &LogOptions) -> Result<()> {
    let name = SessionName::parse(options.name.as_str())?;
    let tail = usize::try_from(options.lines.unwrap_or(0)).unwrap_or(usize::MAX);
    let content = ctx.store.read_log(&name, tail)?;
    print!("{content}");
    Ok(())
}
