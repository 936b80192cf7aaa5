//! The command dispatcher: one linear pass from raw argv to a single
//! handler call.
//!
//! The dispatcher owns no state besides the registry it was constructed
//! with, performs no I/O, and never terminates the process; it reports an
//! [`Outcome`] (or a [`DispatchError`]) and leaves printing and exit codes
//! to the binary.

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use crate::registry::{ArgKind, ArgSpec, Registry, ValueType};

/// Dispatch failure taxonomy. Usage errors never reach a handler; handler
/// errors carry the original failure unmodified. This layer performs no
/// recovery or retry.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Malformed invocation: unknown subcommand or flag, missing required
    /// value, wrong type. Rendered by the parser onto stderr.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The selected handler failed.
    #[error("command '{command}' failed")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

/// What a successful pass produced.
#[derive(Debug)]
pub enum Outcome {
    /// The named handler ran to completion, exactly once.
    Ran(&'static str),
    /// Help was requested, or no arguments were given; rendered text for
    /// standard output.
    Help(String),
    /// `--version`; the line for standard output.
    Version(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Single(String),
    Number(u64),
    Many(Vec<String>),
}

/// Ephemeral per-run mapping from argument name to parsed value. Built by
/// the dispatcher after a successful parse; the routing key is never
/// present. Dropped when the handler call returns.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    values: BTreeMap<&'static str, ArgValue>,
}

impl Invocation {
    pub(crate) fn from_args(args: &[ArgSpec], matches: &ArgMatches) -> Self {
        let mut values = BTreeMap::new();
        for arg in args {
            match arg.kind() {
                ArgKind::Flag => {
                    values.insert(arg.name(), ArgValue::Bool(matches.get_flag(arg.name())));
                }
                ArgKind::Value { value_type, .. } => match value_type {
                    ValueType::Text => {
                        if let Some(value) = matches.get_one::<String>(arg.name()) {
                            values.insert(arg.name(), ArgValue::Single(value.clone()));
                        }
                    }
                    ValueType::Unsigned => {
                        if let Some(value) = matches.get_one::<u64>(arg.name()) {
                            values.insert(arg.name(), ArgValue::Number(*value));
                        }
                    }
                },
                ArgKind::Multi { .. } => {
                    if let Some(many) = matches.get_many::<String>(arg.name()) {
                        values.insert(arg.name(), ArgValue::Many(many.cloned().collect()));
                    }
                }
            }
        }
        Self { values }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Bool(true)))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Single(value)) => Some(value),
            _ => None,
        }
    }

    pub fn required(&self, name: &str) -> anyhow::Result<&str> {
        self.get(name)
            .ok_or_else(|| anyhow::anyhow!("missing required argument '{name}'"))
    }

    pub fn number(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ArgValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn many(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(ArgValue::Many(values)) => values,
            _ => &[],
        }
    }

    /// Argument names with a parsed value, in name order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

/// Routes one process invocation to at most one handler.
pub struct Dispatcher<C> {
    name: &'static str,
    version: &'static str,
    about: &'static str,
    registry: Registry<C>,
}

impl<C> Dispatcher<C> {
    pub fn new(
        name: &'static str,
        version: &'static str,
        about: &'static str,
        registry: Registry<C>,
    ) -> Self {
        Self {
            name,
            version,
            about,
            registry,
        }
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// The full grammar: one subcommand per registry entry plus the
    /// top-level `--version` flag.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name).about(self.about).arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .action(ArgAction::SetTrue)
                .help("Print version and exit"),
        );
        for spec in self.registry.iter() {
            cmd = cmd.subcommand(spec.to_command());
        }
        cmd
    }

    /// Single pass: build grammar, branch on argument count, parse,
    /// dispatch. `argv` is the raw argument list including the program
    /// name, as from [`std::env::args_os`].
    pub fn run<I, T>(&self, ctx: &C, argv: I) -> Result<Outcome, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();

        if argv.len() <= 1 {
            return Ok(Outcome::Help(self.render_help()));
        }

        let matches = match self.command().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                return Ok(Outcome::Help(err.render().to_string()));
            }
            Err(err) => return Err(DispatchError::Usage(err)),
        };

        if matches.get_flag("version") {
            return Ok(Outcome::Version(format!("{} v{}", self.name, self.version)));
        }

        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(Outcome::Help(self.render_help()));
        };
        let Some(spec) = self.registry.get(name) else {
            // The grammar is generated from the registry, so an accepted
            // subcommand is always a registry key.
            let mut cmd = self.command();
            return Err(DispatchError::Usage(cmd.error(
                ErrorKind::InvalidSubcommand,
                format!("unrecognized subcommand '{name}'"),
            )));
        };

        let invocation = Invocation::from_args(spec.args(), sub_matches);
        tracing::debug!(command = name, "dispatching");
        (spec.handler())(ctx, &invocation).map_err(|source| DispatchError::Handler {
            command: name.to_string(),
            source,
        })?;
        Ok(Outcome::Ran(spec.name()))
    }

    fn render_help(&self) -> String {
        let mut cmd = self.command();
        cmd.render_help().to_string()
    }
}
