//! Command-line interface.

use crate::config::{
    DEFAULT_DOCS_URL, DEFAULT_ROOT_CRATE, DEFAULT_TOOLCHAIN, Settings, expand_tilde,
};
use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Single-dash long flags accepted for compatibility.
const LEGACY_FLAGS: &[(&str, &str)] = &[("-doc", "--doc"), ("-def", "--def")];

/// Look up Rust standard library modules and builtins.
#[derive(Debug, Parser)]
#[command(name = "rustman", version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["man", "dir", "doc", "def"])))]
pub struct Cli {
    /// Module or builtin name, e.g. `env`, `collections::hash_map`, `println`.
    #[arg(required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Show documentation (default).
    #[arg(short, long)]
    pub man: bool,

    /// List callable members of a module.
    #[arg(short, long)]
    pub dir: bool,

    /// With --dir, include names starting with an underscore.
    #[arg(short = 'a', long = "all", requires = "dir")]
    pub all: bool,

    /// Open the documentation page in a browser.
    #[arg(long)]
    pub doc: bool,

    /// Open the defining source file in an editor.
    #[arg(long)]
    pub def: bool,

    /// Enter an interactive prompt; NAME, if given, is shown first.
    #[arg(short, long, conflicts_with = "mode")]
    pub interactive: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Toolchain sysroot containing the rust-docs-json component.
    #[arg(long, env = "RUSTMAN_SYSROOT", value_name = "PATH")]
    pub sysroot: Option<PathBuf>,

    /// Toolchain used to discover the sysroot.
    #[arg(long, env = "RUSTMAN_TOOLCHAIN", default_value = DEFAULT_TOOLCHAIN)]
    pub toolchain: String,

    /// Crate that module names are relative to.
    #[arg(long = "crate", env = "RUSTMAN_CRATE", default_value = DEFAULT_ROOT_CRATE)]
    pub root_crate: String,

    /// Editor command used by --def [default: $EDITOR, then vi].
    #[arg(long, env = "VISUAL", value_name = "CMD")]
    pub editor: Option<String>,

    /// Documentation base URL used by --doc.
    #[arg(long, env = "RUSTMAN_DOCS_URL", default_value = DEFAULT_DOCS_URL)]
    pub docs_url: String,
}

/// What to do with the resolved name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Docs,
    Dir { include_private: bool },
    Doc,
    Def,
}

/// A fully parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: Option<String>,
    pub mode: Mode,
    pub interactive: bool,
    pub verbosity: u8,
    pub settings: Settings,
}

impl Cli {
    /// Parse arguments after rewriting the single-dash long flags.
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn mode(&self) -> Mode {
        if self.dir {
            Mode::Dir {
                include_private: self.all,
            }
        } else if self.doc {
            Mode::Doc
        } else if self.def {
            Mode::Def
        } else {
            Mode::Docs
        }
    }

    pub fn into_invocation(self) -> Invocation {
        let settings = Settings {
            sysroot: self.sysroot.as_deref().map(expand_tilde),
            toolchain: self.toolchain.clone(),
            root_crate: self.root_crate.clone(),
            editor: Settings::editor_from_env(self.editor.clone()),
            browser: Settings::browser_from_env(),
            ..Settings::default()
        }
        .with_docs_url(&self.docs_url);

        Invocation {
            mode: self.mode(),
            name: self.name,
            interactive: self.interactive,
            verbosity: self.verbose,
            settings,
        }
    }
}

/// Rewrite `-doc`/`-def` to `--doc`/`--def`; everything else passes through.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if after_separator {
                return arg;
            }
            if arg == "--" {
                after_separator = true;
                return arg;
            }
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == *legacy)
                .map_or(arg, |(_, long)| OsString::from(*long))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::parse_args(std::iter::once("rustman").chain(args.iter().copied()))
    }

    #[test]
    fn legacy_flags_are_rewritten() {
        let args = normalize_args(["rustman", "-doc", "env", "--", "-def"]);
        assert_eq!(args, vec!["rustman", "--doc", "env", "--", "-def"]);
    }

    #[test]
    fn default_mode_shows_docs() {
        let cli = parse(&["env"]).unwrap();
        assert_eq!(cli.mode(), Mode::Docs);
        assert_eq!(cli.name.as_deref(), Some("env"));
    }

    #[test]
    fn single_dash_doc_and_def_select_modes() {
        assert_eq!(parse(&["-doc", "env"]).unwrap().mode(), Mode::Doc);
        assert_eq!(parse(&["-def", "env"]).unwrap().mode(), Mode::Def);
    }

    #[test]
    fn dir_with_all_includes_private() {
        let cli = parse(&["-d", "-a", "env"]).unwrap();
        assert_eq!(
            cli.mode(),
            Mode::Dir {
                include_private: true
            }
        );
    }

    #[test]
    fn modes_are_exclusive() {
        assert!(parse(&["-d", "--doc", "env"]).is_err());
        assert!(parse(&["-m", "-def", "env"]).is_err());
    }

    #[test]
    fn all_requires_dir() {
        assert!(parse(&["-a", "env"]).is_err());
    }

    #[test]
    fn name_is_optional_only_when_interactive() {
        assert!(parse(&[]).is_err());
        let cli = parse(&["-i"]).unwrap();
        assert!(cli.interactive);
        assert_eq!(cli.name, None);
    }

    #[test]
    fn interactive_takes_no_mode() {
        assert!(parse(&["-i", "-d", "env"]).is_err());
        assert!(parse(&["-i", "--doc", "env"]).is_err());
        assert_eq!(parse(&["-i", "env"]).unwrap().mode(), Mode::Docs);
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vvv", "env"]).unwrap().verbose, 3);
    }
}
