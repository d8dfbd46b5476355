//! Handing URLs and source files to external programs.

use crate::error::{Error, Result};
use crate::runtime::SourceLocation;
use std::process::Stdio;
use tokio::process::Command;

/// Host integration for opening documentation and sources.
#[allow(async_fn_in_trait)]
pub trait Launcher {
    /// Ask the host to open `url`. Returns once the opener has been started.
    async fn open_url(&self, url: &str) -> Result<()>;

    /// Open `location` in an editor and wait for it to exit.
    async fn open_editor(&self, location: &SourceLocation) -> Result<()>;
}

/// Launches the real browser and editor.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    editor: String,
    browser: Option<String>,
}

impl SystemLauncher {
    pub fn new(editor: impl Into<String>, browser: Option<String>) -> Self {
        Self {
            editor: editor.into(),
            browser,
        }
    }

    fn browser_command(&self, url: &str) -> Result<Command> {
        if let Some(browser) = &self.browser {
            let (program, mut args) = split_command(browser)?;
            if args.iter().any(|arg| arg.contains("%s")) {
                for arg in &mut args {
                    *arg = arg.replace("%s", url);
                }
            } else {
                args.push(url.to_string());
            }
            let mut command = Command::new(program);
            command.args(args);
            return Ok(command);
        }

        let command = if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(url);
            command
        } else if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        };
        Ok(command)
    }
}

impl Launcher for SystemLauncher {
    async fn open_url(&self, url: &str) -> Result<()> {
        let mut command = self.browser_command(url)?;
        let program = command.as_std().get_program().to_string_lossy().into_owned();
        tracing::debug!(program = %program, url, "Opening documentation URL");

        // Not awaited: the browser outlives this process
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Launch { program, source })?;
        Ok(())
    }

    async fn open_editor(&self, location: &SourceLocation) -> Result<()> {
        let (program, args) = split_command(&self.editor)?;
        tracing::debug!(program = %program, %location, "Opening editor");

        let status = Command::new(&program)
            .args(args)
            .arg(format!("+{}", location.line))
            .arg(&location.path)
            .status()
            .await
            .map_err(|source| Error::Launch {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Launch {
                program,
                source: std::io::Error::other(format!("editor exited with {}", status)),
            })
        }
    }
}

/// Split `"code --wait"` into a program and its arguments.
fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(String::from);
    let program = parts
        .next()
        .ok_or_else(|| Error::InvalidInput("empty command".to_string()))?;
    Ok((program, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_split_on_whitespace() {
        let (program, args) = split_command("code --wait  -n").unwrap();
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait", "-n"]);
        assert!(split_command("   ").is_err());
    }

    #[test]
    fn browser_placeholder_is_substituted() {
        let launcher = SystemLauncher::new("vi", Some("firefox --new-tab %s".to_string()));
        let command = launcher.browser_command("https://doc.rust-lang.org").unwrap();
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(args, vec!["--new-tab", "https://doc.rust-lang.org"]);
    }

    #[test]
    fn browser_without_placeholder_gets_url_appended() {
        let launcher = SystemLauncher::new("vi", Some("lynx".to_string()));
        let command = launcher.browser_command("https://doc.rust-lang.org").unwrap();
        assert_eq!(command.as_std().get_program(), "lynx");
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(args, vec!["https://doc.rust-lang.org"]);
    }
}
