//! Per-invocation settings.
//!
//! Everything is resolved from command-line flags and environment variables
//! when the process starts; nothing is read from or written to disk.

use std::path::{Path, PathBuf};

pub const DEFAULT_TOOLCHAIN: &str = "nightly";
pub const DEFAULT_ROOT_CRATE: &str = "std";
pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_DOCS_URL: &str = "https://doc.rust-lang.org/nightly";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Explicit sysroot; discovered from `toolchain` when absent.
    pub sysroot: Option<PathBuf>,
    pub toolchain: String,
    /// Crate whose modules are addressed by relative names.
    pub root_crate: String,
    /// Editor command, possibly with arguments (`code --wait`).
    pub editor: String,
    /// Browser command; the platform opener is used when absent.
    pub browser: Option<String>,
    /// Documentation base URL without a trailing slash.
    pub docs_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sysroot: None,
            toolchain: DEFAULT_TOOLCHAIN.to_string(),
            root_crate: DEFAULT_ROOT_CRATE.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
            browser: None,
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }
}

impl Settings {
    /// Editor from `EDITOR` when neither `--editor` nor `VISUAL` was given.
    pub fn editor_from_env(explicit: Option<String>) -> String {
        explicit
            .or_else(|| non_empty_var("EDITOR"))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    /// First entry of the colon-separated `BROWSER` list.
    pub fn browser_from_env() -> Option<String> {
        let value = non_empty_var("BROWSER")?;
        value
            .split(':')
            .map(str::trim)
            .find(|entry| !entry.is_empty())
            .map(String::from)
    }

    pub fn with_docs_url(mut self, url: &str) -> Self {
        self.docs_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
