//! Bridge from parsed invocations to typed per-command options.
//!
//! Each handler converts the invocation mapping into its command's options
//! struct and delegates; no handler reads arguments it did not declare.

use std::path::PathBuf;

use anyhow::Result;
use baton_core::Invocation;

use crate::commands::{edit, init, log, manage, show, start, transfer, AppContext};

pub fn handle_init(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = init::InitOptions {
        name: inv.required("name")?.to_string(),
        force: inv.flag("force"),
    };
    init::run(ctx, &options)
}

pub fn handle_show(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = show::ShowOptions {
        name: inv.get("name").map(String::from),
        json: inv.flag("json"),
    };
    show::run(ctx, &options)
}

pub fn handle_edit(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = edit::EditOptions {
        name: inv.required("name")?.to_string(),
    };
    edit::run(ctx, &options)
}

pub fn handle_log(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = log::LogOptions {
        name: inv.required("name")?.to_string(),
        lines: inv.number("lines"),
    };
    log::run(ctx, &options)
}

pub fn handle_mv(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = manage::RenameOptions {
        source: inv.required("source")?.to_string(),
        target: inv.required("target")?.to_string(),
    };
    manage::run_rename(ctx, &options)
}

pub fn handle_cp(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = manage::CopyOptions {
        source: inv.required("source")?.to_string(),
        target: inv.required("target")?.to_string(),
    };
    manage::run_copy(ctx, &options)
}

pub fn handle_rm(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = manage::RemoveOptions {
        names: inv.many("names").to_vec(),
        force: inv.flag("force"),
    };
    manage::run_remove(ctx, &options)
}

pub fn handle_import(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = transfer::ImportOptions {
        paths: inv.many("paths").iter().map(PathBuf::from).collect(),
        force: inv.flag("force"),
    };
    transfer::run_import(ctx, &options)
}

pub fn handle_export(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = transfer::ExportOptions {
        name: inv.required("name")?.to_string(),
        output: inv.get("output").map(PathBuf::from),
    };
    transfer::run_export(ctx, &options)
}

pub fn handle_fetch(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = transfer::FetchOptions {
        source: inv.required("source")?.to_string(),
        force: inv.flag("force"),
    };
    transfer::run_fetch(ctx, &options)
}

pub fn handle_start(ctx: &AppContext, inv: &Invocation) -> Result<()> {
    let options = start::StartOptions {
        name: inv.required("name")?.to_string(),
        runner: inv.get("runner").map(String::from),
    };
    start::run(ctx, &options)
}
