//! Capability queries against the documentation runtime.
//!
//! Everything rustman knows about modules and builtins comes through the
//! [`Runtime`] trait. [`RustdocRuntime`] answers it from the toolchain's
//! rustdoc JSON; tests answer it from memory.

mod rustdoc;

pub use rustdoc::RustdocRuntime;

use crate::error::Result;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A name the matcher resolved to something presentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Module(String),
    Builtin(String),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Self::Module(name) | Self::Builtin(name) => name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "module {}", name),
            Self::Builtin(name) => write!(f, "builtin {}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    Module,
    Struct,
    Enum,
    Union,
    Trait,
    Function,
    Macro,
    TypeAlias,
    Constant,
    Static,
    Primitive,
    Other,
}

impl MemberKind {
    /// Functions and function-like macros are the callable members.
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Function | Self::Macro)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Trait => "trait",
            Self::Function => "fn",
            Self::Macro => "macro",
            Self::TypeAlias => "type",
            Self::Constant => "const",
            Self::Static => "static",
            Self::Primitive => "primitive",
            Self::Other => "item",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute of a module, as exposed under the module's namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Where an item is defined on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// Introspection capabilities the lookup pipeline relies on.
pub trait Runtime {
    /// A loaded module, as returned by [`Runtime::load_module`].
    type Module;

    /// Every module name the runtime can load.
    fn enumerate_modules(&self) -> Result<BTreeSet<String>>;

    /// Every name usable without importing anything.
    fn enumerate_builtins(&self) -> Result<BTreeSet<String>>;

    fn load_module(&self, name: &str) -> Result<Self::Module>;

    /// All members of a loaded module, sorted by name.
    fn members(&self, module: &Self::Module) -> Result<Vec<Member>>;

    /// Rendered documentation text for a target.
    fn documentation(&self, target: &Target) -> Result<String>;

    /// Path of the target's documentation page relative to the docs base URL.
    fn doc_page(&self, target: &Target) -> Result<String>;

    /// Definition site of a target, `None` when it has no source (primitives).
    fn source_location(&self, target: &Target) -> Result<Option<SourceLocation>>;

    /// Crate that unresolved names are searched in on the documentation site.
    fn root_crate(&self) -> &str;
}
