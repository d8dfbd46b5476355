//! Error taxonomy for lookups.
//!
//! Every failure surfaces at the entry point as a single line and a non-zero
//! exit code. A name that matches nothing is a classification, not an error.

use std::path::PathBuf;
use std::process::ExitCode;

/// A specialized Result type for rustman operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Exit code for every error in the taxonomy.
pub const ERROR_EXIT_CODE: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty or malformed name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The module or builtin index could not be enumerated.
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// The name was classified but its documentation could not be loaded.
    #[error("could not resolve '{name}': {reason}")]
    Resolution { name: String, reason: String },

    #[error("'{0}' is not a module")]
    NotAModule(String),

    #[error("no source available for '{0}'")]
    NoSource(String),

    /// The browser or editor could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn resolution(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(ERROR_EXIT_CODE)
    }
}

/// Error returned when loading crate documentation fails.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// Documentation file not found at the expected path.
    #[error("documentation not found for '{crate_name}' at {}", path.display())]
    NotFound { crate_name: String, path: PathBuf },
    /// Failed to read or parse the documentation file.
    #[error("failed to load docs for '{crate_name}': {error}")]
    Parse { crate_name: String, error: String },
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        let crate_name = match &err {
            LoadError::NotFound { crate_name, .. } | LoadError::Parse { crate_name, .. } => {
                crate_name.clone()
            }
        };
        Self::resolution(crate_name, err)
    }
}
