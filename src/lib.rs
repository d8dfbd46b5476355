//! Look up Rust standard library modules and builtins from the command line.
//!
//! Names are classified against the module and builtin registries of the
//! installed toolchain's rustdoc JSON, then presented as documentation, a
//! member listing, a documentation URL or the defining source file.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod interactive;
pub mod item;
pub mod launch;
pub mod matcher;
pub mod presenter;
pub mod registry;
pub mod runtime;
pub mod stdlib;
pub mod tracing;

pub use error::{Error, LoadError, Result};
pub use matcher::MatchResult;
pub use runtime::{Member, MemberKind, Runtime, SourceLocation, Target};
