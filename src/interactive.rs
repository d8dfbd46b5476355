//! Interactive prompt repeating single-shot lookups.

use crate::app::{self, NO_MATCH_MESSAGE, Outcome};
use crate::cli::Mode;
use crate::error::{Error, Result};
use crate::launch::Launcher;
use crate::presenter::Presenter;
use crate::runtime::Runtime;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const PROMPT: &str = "rustman> ";

const EXIT_WORDS: &[&str] = &["quit", "exit", "q"];

const HELP: &str = "\
Commands:
  <name>            show documentation for a module or builtin
  <n>               pick the n-th entry of the last suggestion list
  dir [-a] <module> list callable members (-a includes _-prefixed names)
  doc <name>        open the documentation page in a browser
  def <name>        open the defining source file in an editor
  help, ?           show this help
  quit, exit, q     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Lookup(String),
    Select(usize),
    Dir { module: String, include_private: bool },
    Doc(String),
    Def(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(Self::Empty);
        };
        let rest: Vec<&str> = words.collect();

        if EXIT_WORDS.contains(&first) && rest.is_empty() {
            return Ok(Self::Quit);
        }

        let command = match (first, rest.as_slice()) {
            ("help" | "?", []) => Self::Help,
            ("dir", ["-a", module]) => Self::Dir {
                module: (*module).to_string(),
                include_private: true,
            },
            ("dir", [module]) => Self::Dir {
                module: (*module).to_string(),
                include_private: false,
            },
            ("doc", [name]) => Self::Doc((*name).to_string()),
            ("def", [name]) => Self::Def((*name).to_string()),
            ("dir" | "doc" | "def", _) => {
                return Err(Error::InvalidInput(format!(
                    "usage: {} <name> (see 'help')",
                    if first == "dir" { "dir [-a]" } else { first }
                )));
            }
            (word, []) => match word.parse::<usize>() {
                Ok(index) => Self::Select(index),
                Err(_) => Self::Lookup(word.to_string()),
            },
            _ => {
                return Err(Error::InvalidInput(format!(
                    "unexpected input {:?} (see 'help')",
                    line.trim()
                )));
            }
        };
        Ok(command)
    }
}

/// Loop state carried between prompts.
#[derive(Debug, Default)]
struct Session {
    suggestions: Vec<String>,
}

impl Session {
    fn select(&self, index: usize) -> Result<String> {
        index
            .checked_sub(1)
            .and_then(|i| self.suggestions.get(i))
            .cloned()
            .ok_or_else(|| match self.suggestions.len() {
                0 => Error::InvalidInput("no suggestions to choose from".to_string()),
                len => Error::InvalidInput(format!("pick a number between 1 and {}", len)),
            })
    }
}

/// Run the prompt until an exit word or end of input.
///
/// `initial` is looked up before the first prompt.
pub async fn run<R, L, I>(
    presenter: &Presenter<'_, R, L>,
    initial: Option<&str>,
    input: I,
    out: &mut impl Write,
) -> Result<()>
where
    R: Runtime,
    L: Launcher,
    I: AsyncBufRead + Unpin,
{
    let mut session = Session::default();
    if let Some(name) = initial {
        report(
            lookup(presenter, &mut session, name, Mode::Docs, out).await,
            out,
        )?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                report(Err(e), out)?;
                continue;
            }
        };
        tracing::trace!(?command, "Interactive command");

        let result = match command {
            Command::Empty => Ok(()),
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP).map_err(Error::from),
            Command::Lookup(name) => lookup(presenter, &mut session, &name, Mode::Docs, out).await,
            Command::Select(index) => match session.select(index) {
                Ok(name) => lookup(presenter, &mut session, &name, Mode::Docs, out).await,
                Err(e) => Err(e),
            },
            Command::Dir {
                module,
                include_private,
            } => {
                let mode = Mode::Dir { include_private };
                lookup(presenter, &mut session, &module, mode, out).await
            }
            Command::Doc(name) => lookup(presenter, &mut session, &name, Mode::Doc, out).await,
            Command::Def(name) => lookup(presenter, &mut session, &name, Mode::Def, out).await,
        };
        report(result, out)?;
    }

    Ok(())
}

async fn lookup<R: Runtime, L: Launcher>(
    presenter: &Presenter<'_, R, L>,
    session: &mut Session,
    name: &str,
    mode: Mode,
    out: &mut impl Write,
) -> Result<()> {
    match app::present(presenter, name, mode, out).await? {
        Outcome::Presented => {}
        Outcome::Suggestions(suggestions) => {
            writeln!(out, "{}", app::SUGGESTIONS_HEADER)?;
            for (i, suggestion) in suggestions.iter().enumerate() {
                writeln!(out, "{:>3}) {}", i + 1, suggestion)?;
            }
            session.suggestions = suggestions;
        }
        Outcome::NoMatch => writeln!(out, "{}", NO_MATCH_MESSAGE)?,
    }
    Ok(())
}

/// Print a command's error and keep going; only output failures end the loop.
fn report(result: Result<()>, out: &mut impl Write) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(Error::Io(e)) => Err(Error::Io(e)),
        Err(e) => {
            writeln!(out, "rustman: {}", e)?;
            Ok(())
        }
    }
}
