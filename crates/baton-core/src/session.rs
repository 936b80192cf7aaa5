//! Session naming and descriptor inspection.
//!
//! A session is a TOML descriptor file whose leading `#` comment block is
//! its description; the first sentence of that block is the summary shown
//! in listings.

use chrono::{DateTime, Local};

use crate::registry::summary;
use crate::{Error, Result};

/// Descriptor file extension.
pub const SESSION_EXT: &str = "toml";

/// A validated session name.
///
/// Names are 1-64 characters, ASCII alphanumeric, dash or underscore, and
/// start with a letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionName(String);

impl SessionName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<()> {
        if name.is_empty() || name.len() > 64 {
            return Err(Error::InvalidName {
                name: name.to_string(),
                reason: "must be 1-64 characters".to_string(),
            });
        }
        let mut chars = name.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidName {
                name: name.to_string(),
                reason: "must start with a letter".to_string(),
            });
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(Error::InvalidName {
                name: name.to_string(),
                reason: "may contain only ASCII letters, digits, dash, or underscore"
                    .to_string(),
            });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.{SESSION_EXT}", self.0)
    }

    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.0)
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for SessionName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The leading `#` comment block of a descriptor, with comment markers
/// stripped. Stops at the first non-comment line; leading blank lines are
/// skipped.
pub fn description(content: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('#') {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        } else if trimmed.is_empty() && lines.is_empty() {
            continue;
        } else {
            break;
        }
    }
    lines.join("\n").trim().to_string()
}

/// One line for listings: the first sentence of the description, collapsed
/// onto a single line. Empty when the descriptor carries no description.
pub fn summary_line(content: &str) -> String {
    let description = description(content);
    summary(&description)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Listing record for one stored session.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionEntry {
    pub name: SessionName,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Local>>,
}
