//! Entry point state machine: classify a name, present it, pick an exit code.

use crate::cli::{Invocation, Mode};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::interactive;
use crate::launch::{Launcher, SystemLauncher};
use crate::matcher::{self, MatchResult};
use crate::presenter::Presenter;
use crate::runtime::{Runtime, RustdocRuntime, Target};
use crate::stdlib::StdlibDocs;
use std::io::Write;
use std::process::ExitCode;

pub const NO_MATCH_MESSAGE: &str = "No matches found.";
pub const SUGGESTIONS_HEADER: &str = "Possible suggestions:";

/// Successful ways a lookup can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    NoMatch,
}

impl Exit {
    pub fn code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::NoMatch => ExitCode::from(1),
        }
    }
}

/// Result of classifying and presenting one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Presented,
    Suggestions(Vec<String>),
    NoMatch,
}

/// Run one invocation against the installed toolchain docs.
pub async fn run(invocation: Invocation) -> Result<Exit> {
    let settings = &invocation.settings;
    let runtime = open_runtime(settings).await?;
    let launcher = SystemLauncher::new(settings.editor.clone(), settings.browser.clone());
    let presenter = Presenter::new(&runtime, &launcher, &settings.docs_url);

    let mut stdout = std::io::stdout().lock();
    if invocation.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        interactive::run(&presenter, invocation.name.as_deref(), stdin, &mut stdout).await?;
        return Ok(Exit::Success);
    }

    let name = invocation
        .name
        .as_deref()
        .ok_or_else(|| Error::InvalidInput("a name is required".to_string()))?;
    execute(&presenter, name, invocation.mode, &mut stdout).await
}

/// Locate the documentation and load the root crate.
pub async fn open_runtime(settings: &Settings) -> Result<RustdocRuntime> {
    let docs = match &settings.sysroot {
        Some(sysroot) => StdlibDocs::with_sysroot(sysroot.clone()),
        None => StdlibDocs::discover(&settings.toolchain).await,
    }
    .map_err(|e| Error::RegistryUnavailable(format!("{:#}", e)))?;

    RustdocRuntime::open(docs, &settings.root_crate).await
}

/// Classify `name`, present it, and print the outcome the way the command
/// line reports it.
pub async fn execute<R: Runtime, L: Launcher>(
    presenter: &Presenter<'_, R, L>,
    name: &str,
    mode: Mode,
    out: &mut impl Write,
) -> Result<Exit> {
    match present(presenter, name, mode, out).await? {
        Outcome::Presented => Ok(Exit::Success),
        Outcome::Suggestions(suggestions) => {
            writeln!(out, "{}", SUGGESTIONS_HEADER)?;
            for suggestion in &suggestions {
                writeln!(out, "{}", suggestion)?;
            }
            Ok(Exit::Success)
        }
        Outcome::NoMatch => {
            writeln!(out, "{}", NO_MATCH_MESSAGE)?;
            Ok(Exit::NoMatch)
        }
    }
}

/// Classify `name` and run the presenter operation selected by `mode`.
///
/// Suggestions and misses are returned, not printed; `--doc` is the exception
/// and falls back to a documentation search.
pub async fn present<R: Runtime, L: Launcher>(
    presenter: &Presenter<'_, R, L>,
    name: &str,
    mode: Mode,
    out: &mut impl Write,
) -> Result<Outcome> {
    let result = matcher::classify(presenter.runtime(), name)?;
    let target = result.target();
    if let Some(target) = &target {
        tracing::info!(resolved = %target, "Classified");
    }

    match (mode, target) {
        (Mode::Doc, target) => {
            presenter.open_docs_url(name, target.as_ref(), out).await?;
        }
        (_, None) => {
            return Ok(match result {
                MatchResult::PartialMatches(suggestions) => Outcome::Suggestions(suggestions),
                _ => Outcome::NoMatch,
            });
        }
        (Mode::Docs, Some(target)) => presenter.show_docs(&target, out)?,
        (Mode::Dir { include_private }, Some(Target::Module(module))) => {
            for member in presenter.list_members(&module, include_private)? {
                writeln!(out, "{}", member)?;
            }
        }
        (Mode::Dir { .. }, Some(Target::Builtin(builtin))) => {
            return Err(Error::NotAModule(builtin));
        }
        (Mode::Def, Some(target)) => {
            presenter.open_source(&target, out).await?;
        }
    }
    Ok(Outcome::Presented)
}
