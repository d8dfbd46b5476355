//! Classification of a typed name against the registries.

use crate::error::{Error, Result};
use crate::registry;
use crate::runtime::{Runtime, Target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Exact module name.
    Module(String),
    /// Exact builtin name that is not also a module.
    Builtin(String),
    /// Registry entries starting with the name, sorted and deduplicated.
    PartialMatches(Vec<String>),
    NoMatch,
}

impl MatchResult {
    /// The presentable target, for exact matches.
    pub fn target(&self) -> Option<Target> {
        match self {
            Self::Module(name) => Some(Target::Module(name.clone())),
            Self::Builtin(name) => Some(Target::Builtin(name.clone())),
            Self::PartialMatches(_) | Self::NoMatch => None,
        }
    }
}

/// Reject names that can never match: empty, blank, or containing whitespace
/// or control characters.
pub fn validate_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("name must not be empty".to_string()));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(Error::InvalidInput(format!(
            "name {:?} contains {:?}",
            name, c
        )));
    }
    Ok(name)
}

/// Classify `name`: exact module, then exact builtin, then prefix matches.
pub fn classify<R: Runtime + ?Sized>(runtime: &R, name: &str) -> Result<MatchResult> {
    let name = validate_name(name)?;

    let modules = registry::list_modules(runtime)?;
    if modules.contains(name) {
        tracing::debug!(name, "Exact module match");
        return Ok(MatchResult::Module(name.to_string()));
    }

    let builtins = registry::list_builtins(runtime)?;
    if builtins.contains(name) {
        tracing::debug!(name, "Exact builtin match");
        return Ok(MatchResult::Builtin(name.to_string()));
    }

    // Both sets are sorted; a union of prefix ranges stays sorted and unique
    let mut partial: Vec<String> = modules
        .union(&builtins)
        .filter(|candidate| candidate.starts_with(name))
        .cloned()
        .collect();
    partial.dedup();

    if partial.is_empty() {
        tracing::debug!(name, "No match");
        Ok(MatchResult::NoMatch)
    } else {
        tracing::debug!(name, count = partial.len(), "Partial matches");
        Ok(MatchResult::PartialMatches(partial))
    }
}
