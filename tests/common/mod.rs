//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `memory_runtime`: an in-memory [`Runtime`] shaped like a small `std`
//! - `launcher`: a [`Launcher`] that records what it was asked to open
//! - `fake_sysroot`: a temporary sysroot with hand-written rustdoc JSON for
//!   `std` and `core`, plus a `rust-src` tree
//!
//! Tests that need the real toolchain call [`installed_docs`] and return early
//! when the `rust-docs-json` component is missing.

use rstest::fixture;
use rustman::error::{Error, Result};
use rustman::launch::Launcher;
use rustman::runtime::{Member, MemberKind, Runtime, SourceLocation, Target};
use rustman::stdlib::StdlibDocs;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory for test isolation, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file, creating parent directories as needed.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    pub fn create_json(&self, path: &str, value: &Value) {
        let content = serde_json::to_string_pretty(value).expect("Failed to serialize JSON");
        self.create_file(path, &content);
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A module of [`MemoryRuntime`].
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MemoryModule {
    pub name: String,
    pub members: Vec<Member>,
}

/// In-memory runtime with hand-picked registries.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    pub modules: BTreeMap<String, Vec<Member>>,
    pub builtins: BTreeSet<String>,
    pub docs: BTreeMap<String, String>,
    pub pages: BTreeMap<String, String>,
    pub sources: BTreeMap<String, SourceLocation>,
    pub unavailable: bool,
}

#[allow(dead_code)]
impl MemoryRuntime {
    /// A small slice of `std`.
    pub fn std_like() -> Self {
        let mut runtime = Self::default()
            .with_module(
                "env",
                &[
                    ("args", MemberKind::Function),
                    ("args_os", MemberKind::Function),
                    ("var", MemberKind::Function),
                    ("vars", MemberKind::Function),
                    ("set_var", MemberKind::Function),
                    ("_set_var_unchecked", MemberKind::Function),
                    ("Args", MemberKind::Struct),
                    ("VarError", MemberKind::Enum),
                    ("consts", MemberKind::Module),
                    ("MAIN_SEPARATOR", MemberKind::Constant),
                ],
            )
            .with_module("env::consts", &[("ARCH", MemberKind::Constant)])
            .with_module(
                "collections",
                &[
                    ("HashMap", MemberKind::Struct),
                    ("hash_map", MemberKind::Module),
                    ("BTreeMap", MemberKind::Struct),
                ],
            )
            .with_module("collections::hash_map", &[("HashMap", MemberKind::Struct)])
            .with_module(
                "fs",
                &[
                    ("read", MemberKind::Function),
                    ("read_to_string", MemberKind::Function),
                    ("write", MemberKind::Function),
                    ("File", MemberKind::Struct),
                ],
            )
            .with_module("array", &[("from_fn", MemberKind::Function)])
            .with_module("_private", &[("hidden", MemberKind::Function)])
            .with_module(
                "std",
                &[
                    ("env", MemberKind::Module),
                    ("println", MemberKind::Macro),
                ],
            );

        for builtin in [
            "bool",
            "char",
            "i32",
            "str",
            "println",
            "format",
            "assert",
            "assert_eq",
            "Option",
            "Some",
            "String",
            "Vec",
            "_internal_macro",
        ] {
            runtime.builtins.insert(builtin.to_string());
        }

        runtime.docs.insert(
            "env".to_string(),
            "module std::env\n\nInspection and manipulation of the process's environment.\n"
                .to_string(),
        );
        runtime.pages.insert(
            "println".to_string(),
            "std/macro.println.html".to_string(),
        );
        runtime.pages.insert(
            "Option".to_string(),
            "core/option/enum.Option.html".to_string(),
        );
        runtime.sources.insert(
            "env".to_string(),
            SourceLocation {
                path: PathBuf::from("/sysroot/lib/rustlib/src/rust/library/std/src/env.rs"),
                line: 1,
            },
        );
        runtime.sources.insert(
            "println".to_string(),
            SourceLocation {
                path: PathBuf::from("/sysroot/lib/rustlib/src/rust/library/std/src/macros.rs"),
                line: 132,
            },
        );
        runtime
    }

    pub fn with_module(mut self, name: &str, members: &[(&str, MemberKind)]) -> Self {
        self.modules.insert(
            name.to_string(),
            members
                .iter()
                .map(|(member, kind)| Member::new(*member, *kind))
                .collect(),
        );
        self
    }

    pub fn with_builtin(mut self, name: &str) -> Self {
        self.builtins.insert(name.to_string());
        self
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::RegistryUnavailable("no documentation index".to_string()));
        }
        Ok(())
    }
}

impl Runtime for MemoryRuntime {
    type Module = MemoryModule;

    fn enumerate_modules(&self) -> Result<BTreeSet<String>> {
        self.check_available()?;
        Ok(self.modules.keys().cloned().collect())
    }

    fn enumerate_builtins(&self) -> Result<BTreeSet<String>> {
        self.check_available()?;
        Ok(self.builtins.clone())
    }

    fn load_module(&self, name: &str) -> Result<MemoryModule> {
        match self.modules.get(name) {
            Some(members) => Ok(MemoryModule {
                name: name.to_string(),
                members: members.clone(),
            }),
            None if self.builtins.contains(name) => Err(Error::NotAModule(name.to_string())),
            None => Err(Error::resolution(name, "no such module")),
        }
    }

    fn members(&self, module: &MemoryModule) -> Result<Vec<Member>> {
        let mut members = module.members.clone();
        members.sort();
        Ok(members)
    }

    fn documentation(&self, target: &Target) -> Result<String> {
        let name = target.name();
        match self.docs.get(name) {
            Some(text) => Ok(text.clone()),
            None => Ok(format!("{}\n\nDocumentation for {}.\n", target, name)),
        }
    }

    fn doc_page(&self, target: &Target) -> Result<String> {
        match target {
            Target::Module(name) => Ok(format!("std/{}/index.html", name.replace("::", "/"))),
            Target::Builtin(name) => self
                .pages
                .get(name)
                .cloned()
                .ok_or_else(|| Error::resolution(name.as_str(), "no page")),
        }
    }

    fn source_location(&self, target: &Target) -> Result<Option<SourceLocation>> {
        Ok(self.sources.get(target.name()).cloned())
    }

    fn root_crate(&self) -> &str {
        "std"
    }
}

/// Records URLs and editor requests instead of launching anything.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub urls: RefCell<Vec<String>>,
    pub edits: RefCell<Vec<SourceLocation>>,
    pub fail: bool,
}

impl Launcher for RecordingLauncher {
    async fn open_url(&self, url: &str) -> Result<()> {
        if self.fail {
            return Err(launch_failure("browser"));
        }
        self.urls.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn open_editor(&self, location: &SourceLocation) -> Result<()> {
        if self.fail {
            return Err(launch_failure("vi"));
        }
        self.edits.borrow_mut().push(location.clone());
        Ok(())
    }
}

#[allow(dead_code)]
fn launch_failure(program: &str) -> Error {
    Error::Launch {
        program: program.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
    }
}

#[allow(dead_code)]
pub const DOCS_URL: &str = "https://doc.rust-lang.org/nightly";

#[allow(dead_code)]
#[fixture]
pub fn memory_runtime() -> MemoryRuntime {
    MemoryRuntime::std_like()
}

#[allow(dead_code)]
#[fixture]
pub fn launcher() -> RecordingLauncher {
    RecordingLauncher::default()
}

/// Rustdoc JSON sysroot with `std` and `core` documentation.
#[allow(dead_code)]
pub struct FakeSysroot {
    pub workspace: TempWorkspace,
}

#[allow(dead_code)]
impl FakeSysroot {
    pub const DOCS_DIR: &'static str = "share/doc/rust/json";
    pub const SRC_DIR: &'static str = "lib/rustlib/src/rust/library";

    pub fn new() -> Self {
        let workspace = TempWorkspace::new();
        workspace.create_json(&format!("{}/std.json", Self::DOCS_DIR), &std_json());
        workspace.create_json(&format!("{}/core.json", Self::DOCS_DIR), &core_json());
        workspace.create_file(
            &format!("{}/std/src/env.rs", Self::SRC_DIR),
            "//! Inspection and manipulation of the process's environment.\n",
        );
        workspace.create_file(
            &format!("{}/core/src/option.rs", Self::SRC_DIR),
            "pub enum Option<T> { None, Some(T) }\n",
        );
        Self { workspace }
    }

    /// A sysroot whose docs directory exists but holds no JSON.
    pub fn empty() -> Self {
        let workspace = TempWorkspace::new();
        workspace.create_dir(Self::DOCS_DIR);
        Self { workspace }
    }

    pub fn path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn docs(&self) -> StdlibDocs {
        StdlibDocs::with_sysroot(self.path()).expect("fake sysroot has a docs directory")
    }
}

#[allow(dead_code)]
#[fixture]
pub fn fake_sysroot() -> FakeSysroot {
    FakeSysroot::new()
}

/// Docs of the active nightly toolchain, if `rust-docs-json` is installed.
#[allow(dead_code)]
pub async fn installed_docs() -> Option<StdlibDocs> {
    match StdlibDocs::discover("nightly").await {
        Ok(docs) if docs.has_docs("std") => Some(docs),
        Ok(_) => None,
        Err(e) => {
            eprintln!("Skipping: {:#}", e);
            None
        }
    }
}

fn generics() -> Value {
    json!({ "params": [], "where_predicates": [] })
}

fn span(file: &str, line: usize) -> Value {
    json!({ "filename": file, "begin": [line, 1], "end": [line, 20] })
}

fn item(id: u32, name: Option<&str>, docs: Option<&str>, span: Value, inner: Value) -> (String, Value) {
    (
        id.to_string(),
        json!({
            "id": id,
            "crate_id": 0,
            "name": name,
            "span": span,
            "visibility": "public",
            "docs": docs,
            "links": {},
            "attrs": [],
            "deprecation": null,
            "inner": inner,
        }),
    )
}

fn module(items: &[u32], is_crate: bool) -> Value {
    json!({ "module": { "is_crate": is_crate, "items": items, "is_stripped": false } })
}

fn function(inputs: Value, output: Value) -> Value {
    json!({
        "function": {
            "sig": { "inputs": inputs, "output": output, "is_c_variadic": false },
            "generics": generics(),
            "header": { "is_const": false, "is_unsafe": false, "is_async": false, "abi": "Rust" },
            "has_body": true,
        }
    })
}

fn unit_struct() -> Value {
    json!({ "struct": { "kind": "unit", "generics": generics(), "impls": [] } })
}

fn reexport(source: &str, name: &str, id: u32) -> Value {
    json!({ "use": { "source": source, "name": name, "id": id, "is_glob": false } })
}

fn summary(crate_id: u32, path: &[&str], kind: &str) -> Value {
    json!({ "crate_id": crate_id, "path": path, "kind": kind })
}

fn krate(root: u32, index: Vec<(String, Value)>, paths: Vec<(u32, Value)>, external: Value) -> Value {
    let index: serde_json::Map<String, Value> = index.into_iter().collect();
    let paths: serde_json::Map<String, Value> = paths
        .into_iter()
        .map(|(id, summary)| (id.to_string(), summary))
        .collect();
    json!({
        "root": root,
        "crate_version": "1.92.0-nightly",
        "includes_private": false,
        "index": index,
        "paths": paths,
        "external_crates": external,
        "target": { "triple": "x86_64-unknown-linux-gnu", "target_features": [] },
        "format_version": 56,
    })
}

/// `std`: env (module and macro), collections, string, prelude and a re-export of `core::option`.
#[allow(dead_code)]
pub fn std_json() -> Value {
    let env_rs = "/rustc/0123abcd/library/std/src/env.rs";
    let borrowed_str = json!({
        "borrowed_ref": { "lifetime": null, "is_mutable": false, "type": { "primitive": "str" } }
    });

    let index = vec![
        item(0, Some("std"), Some("The Rust Standard Library."), Value::Null,
            module(&[21, 1, 10, 20, 30, 40, 50, 100], true)),
        item(1, Some("env"),
            Some("Inspection and manipulation of the process's environment.\n\nSee [`args`] for details.\n\n[`args`]: crate::env::args"),
            span(env_rs, 1), module(&[2, 3, 4, 5, 6], false)),
        item(2, Some("args"), Some("Returns the arguments that this program was started with."),
            span(env_rs, 42), function(json!([]), Value::Null)),
        item(3, Some("var"), Some("Fetches the environment variable `key`."),
            span(env_rs, 60), function(json!([["key", borrowed_str]]), json!({ "primitive": "bool" }))),
        item(4, Some("Args"), Some("An iterator over the arguments of a process."),
            span(env_rs, 80), unit_struct()),
        item(5, Some("_private_helper"), None, span(env_rs, 90), function(json!([]), Value::Null)),
        item(6, Some("env_helper"), Some("A helper macro."), span(env_rs, 95),
            json!({ "macro": "macro_rules! env_helper {\n    () => { ... };\n}" })),
        item(10, Some("collections"), Some("Collection types."), Value::Null, module(&[11, 12], false)),
        item(11, Some("hash_map"), Some("A hash map."), Value::Null, module(&[13], false)),
        item(12, Some("_internal"), None, Value::Null, module(&[], false)),
        item(13, Some("HashMap"), Some("A hash map implemented with quadratic probing."),
            Value::Null, unit_struct()),
        item(20, Some("println"), Some("Prints to the standard output, with a newline."),
            span("/rustc/0123abcd/library/std/src/macros.rs", 132),
            json!({ "macro": "macro_rules! println {\n    () => { ... };\n    ($($arg:tt)*) => { ... };\n}" })),
        item(21, Some("env"), Some("Inspects an environment variable at compile time."),
            span("/rustc/0123abcd/library/core/src/macros/mod.rs", 1080),
            json!({ "macro": "macro_rules! env {\n    ($name:expr $(,)?) => { ... };\n}" })),
        item(30, Some("i32"), Some("The 32-bit signed integer type."), Value::Null,
            json!({ "primitive": { "name": "i32", "impls": [] } })),
        item(40, Some("prelude"), Some("The Rust Prelude."), Value::Null, module(&[41], false)),
        item(41, Some("v1"), Some("The first version of the prelude."), Value::Null,
            module(&[42, 43], false)),
        item(42, None, None, Value::Null, reexport("crate::string::String", "String", 51)),
        item(43, None, None, Value::Null, reexport("core::option::Option", "Option", 101)),
        item(50, Some("string"), Some("A UTF-8 encoded, growable string."), Value::Null,
            module(&[51], false)),
        item(51, Some("String"), Some("A UTF-8 encoded, growable string."), Value::Null, unit_struct()),
        item(100, None, None, Value::Null, reexport("core::option", "option", 102)),
    ];

    let paths = vec![
        (0, summary(0, &["std"], "module")),
        (1, summary(0, &["std", "env"], "module")),
        (2, summary(0, &["std", "env", "args"], "function")),
        (3, summary(0, &["std", "env", "var"], "function")),
        (4, summary(0, &["std", "env", "Args"], "struct")),
        (5, summary(0, &["std", "env", "_private_helper"], "function")),
        (6, summary(0, &["std", "env", "env_helper"], "macro")),
        (10, summary(0, &["std", "collections"], "module")),
        (11, summary(0, &["std", "collections", "hash_map"], "module")),
        (12, summary(0, &["std", "collections", "_internal"], "module")),
        (13, summary(0, &["std", "collections", "hash_map", "HashMap"], "struct")),
        (20, summary(0, &["std", "println"], "macro")),
        (21, summary(0, &["std", "env"], "macro")),
        (40, summary(0, &["std", "prelude"], "module")),
        (41, summary(0, &["std", "prelude", "v1"], "module")),
        (50, summary(0, &["std", "string"], "module")),
        (51, summary(0, &["std", "string", "String"], "struct")),
        (101, summary(1, &["core", "option", "Option"], "enum")),
        (102, summary(1, &["core", "option"], "module")),
    ];

    let external = json!({
        "1": { "name": "core", "html_root_url": null, "path": "/sysroot/lib/rustlib/core.rlib" }
    });

    krate(0, index, paths, external)
}

/// `core`: just `core::option::Option`.
#[allow(dead_code)]
pub fn core_json() -> Value {
    let option_rs = "/rustc/0123abcd/library/core/src/option.rs";
    let index = vec![
        item(0, Some("core"), Some("The Rust Core Library."), Value::Null, module(&[1], true)),
        item(1, Some("option"), Some("Optional values."), span(option_rs, 1), module(&[2], false)),
        item(2, Some("Option"),
            Some("The `Option` type. See [the module level documentation](self) for more."),
            span(option_rs, 572),
            json!({ "enum": {
                "generics": generics(),
                "has_stripped_variants": false,
                "variants": [],
                "impls": [],
            } })),
    ];
    let paths = vec![
        (0, summary(0, &["core"], "module")),
        (1, summary(0, &["core", "option"], "module")),
        (2, summary(0, &["core", "option", "Option"], "enum")),
    ];
    krate(0, index, paths, json!({}))
}
