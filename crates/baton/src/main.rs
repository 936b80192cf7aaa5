use std::process::ExitCode;

use baton_core::{Config, DispatchError, Dispatcher, Outcome};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;

use commands::AppContext;

const ABOUT: &str = "Manage laboratory control sessions";

fn main() -> ExitCode {
    init_tracing();

    let (context, dispatcher) = match bootstrap() {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match dispatcher.run(&context, std::env::args_os()) {
        Ok(Outcome::Ran(_)) => ExitCode::SUCCESS,
        Ok(Outcome::Help(text)) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Version(line)) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(DispatchError::Usage(err)) => {
            // clap routes help to stdout and errors to stderr on its own.
            let _ = err.print();
            ExitCode::from(2)
        }
        Err(DispatchError::Handler { source, .. }) => {
            eprintln!("error: {source:#}");
            ExitCode::FAILURE
        }
    }
}

fn bootstrap() -> anyhow::Result<(AppContext, Dispatcher<AppContext>)> {
    let config = Config::load()?;
    let context = AppContext::new(config)?;
    let registry = cli::registry()?;
    let dispatcher = Dispatcher::new("baton", env!("CARGO_PKG_VERSION"), ABOUT, registry);
    Ok((context, dispatcher))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BATON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
