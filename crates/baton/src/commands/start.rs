//! Launch a session with the external runtime.

use anyhow::{anyhow, bail, Context, Result};
use baton_core::SessionName;

use super::AppContext;

#[derive(Debug, Clone)]
pub struct StartOptions {
    pub name: String,
    pub runner: Option<String>,
}

pub fn run(ctx: &AppContext, options: &StartOptions) -> Result<()> {
    let name = SessionName::parse(options.name.as_str())?;
    if !ctx.store.exists(&name) {
        return Err(baton_core::Error::NotFound(name.to_string()).into());
    }

    let command_line = options
        .runner
        .clone()
        .unwrap_or_else(|| ctx.config.runner.clone());
    let mut parts = command_line.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("runner command is empty");
    };
    let program = which::which(program)
        .map_err(|_| anyhow!("runner '{program}' not found in PATH"))?;

    ctx.store
        .append_log(&name, &format!("starting with runner '{command_line}'"))?;
    let status = std::process::Command::new(&program)
        .args(parts)
        .arg(ctx.store.descriptor_path(&name))
        .status()
        .with_context(|| format!("failed to launch runner '{}'", program.display()))?;
    ctx.store
        .append_log(&name, &format!("runner exited with {status}"))?;

    if !status.success() {
        bail!("runner exited with {status}");
    }
    println!("Session '{name}' completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;

    fn name(raw: &str) -> SessionName {
        SessionName::parse(raw).unwrap()
    }

    #[test]
    fn starting_a_missing_session_fails() {
        let (ctx, _dir) = testing::context();
        let result = run(
            &ctx,
            &StartOptions {
                name: "ghost".to_string(),
                runner: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn starting_with_an_unknown_runner_fails_without_logging_an_exit() {
        let (ctx, _dir) = testing::context();
        ctx.store.create(&name("tomo"), false).unwrap();
        let result = run(
            &ctx,
            &StartOptions {
                name: "tomo".to_string(),
                runner: Some("definitely-not-a-real-runtime".to_string()),
            },
        );
        assert!(result.is_err());
        assert_eq!(ctx.store.read_log(&name("tomo"), 0).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn successful_run_records_launch_and_exit() {
        let (ctx, _dir) = testing::context();
        ctx.store.create(&name("tomo"), false).unwrap();
        run(
            &ctx,
            &StartOptions {
                name: "tomo".to_string(),
                runner: Some("true".to_string()),
            },
        )
        .unwrap();
        let log = ctx.store.read_log(&name("tomo"), 0).unwrap();
        assert!(log.contains("starting with runner 'true'"));
        assert!(log.contains("runner exited with"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_runner_surfaces_its_exit_status() {
        let (ctx, _dir) = testing::context();
        ctx.store.create(&name("tomo"), false).unwrap();
        let result = run(
            &ctx,
            &StartOptions {
                name: "tomo".to_string(),
                runner: Some("false".to_string()),
            },
        );
        assert!(result.is_err());
        let log = ctx.store.read_log(&name("tomo"), 0).unwrap();
        assert!(log.contains("runner exited with"));
    }
}
