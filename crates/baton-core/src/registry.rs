//! Command registry: the immutable table the CLI grammar is generated from.
//!
//! A [`Registry`] maps each command name to a [`CommandSpec`] holding the
//! handler, its documentation string, and an ordered table of [`ArgSpec`]
//! records. The registry is built once at startup and handed to
//! [`crate::dispatch::Dispatcher`] by value; nothing in this crate keeps a
//! process-global command table.

use clap::{Arg, ArgAction, Command};

use crate::dispatch::Invocation;
use crate::{Error, Result};

/// First sentence of a documentation string, up to and including the first
/// period. A doc without a period yields the whole string; an empty doc
/// yields an empty summary. Never fails.
pub fn summary(doc: &str) -> &str {
    match doc.find('.') {
        Some(idx) => &doc[..=idx],
        None => doc,
    }
}

/// How a single argument parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Unsigned,
}

#[derive(Debug, Clone)]
pub enum ArgKind {
    /// Boolean switch, true when present.
    Flag,
    /// Single value, positional or `--name <VALUE>`.
    Value {
        required: bool,
        default: Option<&'static str>,
        value_type: ValueType,
    },
    /// One or more positional values.
    Multi { required: bool },
}

/// One row of a command's argument table.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: &'static str,
    long: Option<&'static str>,
    short: Option<char>,
    value_name: Option<&'static str>,
    help: &'static str,
    kind: ArgKind,
}

impl ArgSpec {
    /// A `--name` switch.
    pub fn flag(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            long: Some(name),
            short: None,
            value_name: None,
            help,
            kind: ArgKind::Flag,
        }
    }

    /// A `--name <VALUE>` option.
    pub fn option(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            long: Some(name),
            short: None,
            value_name: None,
            help,
            kind: ArgKind::Value {
                required: false,
                default: None,
                value_type: ValueType::Text,
            },
        }
    }

    /// A positional value.
    pub fn positional(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            long: None,
            short: None,
            value_name: None,
            help,
            kind: ArgKind::Value {
                required: false,
                default: None,
                value_type: ValueType::Text,
            },
        }
    }

    /// One-or-more positional values.
    pub fn variadic(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            long: None,
            short: None,
            value_name: None,
            help,
            kind: ArgKind::Multi { required: false },
        }
    }

    pub fn required(mut self) -> Self {
        match &mut self.kind {
            ArgKind::Value { required, .. } | ArgKind::Multi { required } => *required = true,
            ArgKind::Flag => {}
        }
        self
    }

    pub fn default(mut self, value: &'static str) -> Self {
        if let ArgKind::Value { default, .. } = &mut self.kind {
            *default = Some(value);
        }
        self
    }

    /// Parse the value as an unsigned integer; malformed input becomes a
    /// usage error instead of reaching the handler.
    pub fn unsigned(mut self) -> Self {
        if let ArgKind::Value { value_type, .. } = &mut self.kind {
            *value_type = ValueType::Unsigned;
        }
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn value_name(mut self, value_name: &'static str) -> Self {
        self.value_name = Some(value_name);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn kind(&self) -> &ArgKind {
        &self.kind
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name).help(self.help);
        if let Some(long) = self.long {
            arg = arg.long(long);
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(value_name) = self.value_name {
            arg = arg.value_name(value_name);
        }
        match self.kind {
            ArgKind::Flag => arg.action(ArgAction::SetTrue),
            ArgKind::Value {
                required,
                default,
                value_type,
            } => {
                arg = arg.action(ArgAction::Set).required(required);
                if let Some(default) = default {
                    arg = arg.default_value(default);
                }
                if value_type == ValueType::Unsigned {
                    arg = arg.value_parser(clap::value_parser!(u64));
                }
                arg
            }
            ArgKind::Multi { required } => arg
                .action(ArgAction::Append)
                .num_args(1..)
                .required(required),
        }
    }
}

/// Handler signature: shared context plus the parsed invocation, with the
/// routing key already stripped.
pub type Handler<C> = fn(&C, &Invocation) -> anyhow::Result<()>;

/// One registry entry: name, documentation, argument table, handler.
pub struct CommandSpec<C> {
    name: &'static str,
    doc: &'static str,
    args: Vec<ArgSpec>,
    run: Handler<C>,
}

impl<C> CommandSpec<C> {
    pub fn new(name: &'static str, doc: &'static str, args: Vec<ArgSpec>, run: Handler<C>) -> Self {
        Self {
            name,
            doc,
            args,
            run,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub(crate) fn handler(&self) -> Handler<C> {
        self.run
    }

    /// Subcommand grammar for this entry. The about line is the first
    /// sentence of the handler documentation.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.name);
        let about = summary(self.doc).trim();
        if !about.is_empty() {
            cmd = cmd.about(about);
        }
        if self.doc.trim().len() > about.len() {
            cmd = cmd.long_about(self.doc);
        }
        for arg in &self.args {
            cmd = cmd.arg(arg.to_arg());
        }
        cmd
    }
}

/// Immutable command table. Enforces the registry invariants at
/// construction: command names are unique, and argument names are unique
/// within each entry.
pub struct Registry<C> {
    entries: Vec<CommandSpec<C>>,
}

impl<C> Registry<C> {
    pub fn new(entries: Vec<CommandSpec<C>>) -> Result<Self> {
        let mut names = std::collections::BTreeSet::new();
        for entry in &entries {
            if !names.insert(entry.name) {
                return Err(Error::Registry(format!(
                    "duplicate command name '{}'",
                    entry.name
                )));
            }
            let mut args = std::collections::BTreeSet::new();
            for arg in &entry.args {
                if !args.insert(arg.name) {
                    return Err(Error::Registry(format!(
                        "duplicate argument '{}' in command '{}'",
                        arg.name, entry.name
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec<C>> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec<C>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
