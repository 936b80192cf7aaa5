//! Move sessions in and out of the store: import, export, fetch.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub paths: Vec<PathBuf>,
    pub force: bool,
}

pub fn run_import(ctx: &AppContext, options: &ImportOptions) -> Result<()> {
    for path in &options.paths {
        let name = ctx.store.import_file(path, options.force)?;
        println!("Imported session '{name}' from {}", path.display());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub name: String,
    pub output: Option<PathBuf>,
}

pub fn run_export(ctx: &AppContext, options: &ExportOptions) -> Result<()> {
    let name = SessionName::parse(options.name.as_str())?;
    let dest = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{name}.tar.gz")));
    ctx.store.export(&name, &dest)?;
    println!("Exported session '{name}' to {}", dest.display());
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub source: String,
    pub force: bool,
}

pub fn run_fetch(ctx: &AppContext, options: &FetchOptions) -> Result<()> {
    let source = options.source.as_str();
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(ctx, source, options.force)
    } else {
        fetch_path(ctx, Path::new(source), options.force)
    }
}

fn fetch_path(ctx: &AppContext, path: &Path, force: bool) -> Result<()> {
    if is_gzip(path)? {
        for name in ctx.store.unpack_archive(path, force)? {
            println!("Fetched session '{name}'");
        }
        Ok(())
    } else if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
        let name = ctx.store.import_file(path, force)?;
        println!("Fetched session '{name}' from {}", path.display());
        Ok(())
    } else {
        bail!(
            "unsupported source '{}': expected a .toml descriptor or a .tar.gz archive",
            path.display()
        );
    }
}

fn fetch_url(ctx: &AppContext, url: &str, force: bool) -> Result<()> {
    tracing::debug!(url, "downloading session");
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("failed to download '{url}'"))?;
    let bytes = response
        .bytes()
        .with_context(|| format!("failed to read '{url}'"))?;

    // Keep the payload under the name the URL ends with, so the descriptor
    // import rules apply unchanged.
    let file_name = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.split('/').next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("session.tar.gz");
    let dir = tempfile::tempdir()?;
    let local = dir.path().join(file_name);
    std::fs::write(&local, &bytes)?;
    fetch_path(ctx, &local, force)
}

fn is_gzip(path: &Path) -> Result<bool> {
    let mut magic = [0_u8; 2];
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("cannot open '{}'", path.display()))?;
    let read = file.read(&mut magic)?;
    Ok(read == 2 && magic == [0x1f, 0x8b])
}
