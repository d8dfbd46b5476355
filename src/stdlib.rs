//! Standard library documentation discovery and loading.
//!
//! Provides access to pre-generated rustdoc JSON for std, core, alloc, and other
//! standard library crates from the `rust-docs-json` nightly component, and to
//! their sources from the `rust-src` component.

use crate::error::LoadError;
use crate::index::CrateIndex;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Standard library crates available when `rust-docs-json` component is installed.
pub const STDLIB_CRATES: &[&str] = &["std", "core", "alloc", "proc_macro", "test"];

const DOCS_JSON_DIR: &str = "share/doc/rust/json";
const RUST_SRC_DIR: &str = "lib/rustlib/src/rust";

/// Manages access to standard library documentation.
///
/// Crate indices are loaded lazily, at most once per process.
pub struct StdlibDocs {
    sysroot: PathBuf,
    loaded: Mutex<HashMap<String, Arc<CrateIndex>>>,
}

impl std::fmt::Debug for StdlibDocs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdlibDocs")
            .field("sysroot", &self.sysroot)
            .field("loaded", &self.cache().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StdlibDocs {
    /// Use an explicit sysroot. Fails if it carries no rustdoc JSON.
    pub fn with_sysroot(sysroot: impl Into<PathBuf>) -> Result<Self> {
        let sysroot = sysroot.into();
        let docs_path = sysroot.join(DOCS_JSON_DIR);

        if !docs_path.is_dir() {
            anyhow::bail!(
                "rust-docs-json component not installed in {}. Install with: rustup component add rust-docs-json --toolchain nightly",
                sysroot.display()
            );
        }

        Ok(Self {
            sysroot,
            loaded: Mutex::new(HashMap::new()),
        })
    }

    /// Discover the toolchain sysroot and verify `rust-docs-json` is available.
    ///
    /// Asks `rustc +<toolchain> --print sysroot` first, then falls back to the
    /// rustup toolchain directory.
    pub async fn discover(toolchain: &str) -> Result<Self> {
        let sysroot = match query_rustc_sysroot(toolchain).await {
            Ok(sysroot) => sysroot,
            Err(e) => {
                tracing::debug!(error = %e, "rustc sysroot query failed, scanning rustup home");
                rustup_toolchain_dir(toolchain).with_context(|| {
                    format!("Toolchain '{}' not found (rustc query failed: {})", toolchain, e)
                })?
            }
        };

        let docs = Self::with_sysroot(sysroot)?;
        tracing::info!(sysroot = %docs.sysroot.display(), "Discovered stdlib docs");
        Ok(docs)
    }

    /// Get the path to a stdlib crate's JSON documentation.
    pub fn doc_path(&self, crate_name: &str) -> PathBuf {
        self.sysroot
            .join(DOCS_JSON_DIR)
            .join(format!("{}.json", crate_name))
    }

    /// Check if a crate name is a standard library crate.
    pub fn is_stdlib_crate(crate_name: &str) -> bool {
        STDLIB_CRATES.contains(&crate_name)
    }

    /// Check if a specific crate's docs are available.
    pub fn has_docs(&self, crate_name: &str) -> bool {
        self.doc_path(crate_name).exists()
    }

    /// Get list of available stdlib crates.
    pub fn available_crates(&self) -> Vec<&'static str> {
        STDLIB_CRATES
            .iter()
            .filter(|name| self.has_docs(name))
            .copied()
            .collect()
    }

    /// Load a stdlib crate's documentation (lazy, cached).
    pub fn load(&self, crate_name: &str) -> Result<Arc<CrateIndex>, LoadError> {
        if let Some(index) = self.cache().get(crate_name) {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(CrateIndex::load(crate_name, self.doc_path(crate_name))?);
        self.insert(Arc::clone(&index));
        Ok(index)
    }

    /// Load a crate on the blocking pool and cache it.
    pub async fn preload(&self, crate_name: &str) -> Result<Arc<CrateIndex>, LoadError> {
        if let Some(index) = self.cache().get(crate_name) {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(
            CrateIndex::load_async(crate_name.to_string(), self.doc_path(crate_name)).await?,
        );
        self.insert(Arc::clone(&index));
        Ok(index)
    }

    /// Map a span filename recorded by rustdoc onto the `rust-src` component.
    ///
    /// Spans look like `/rustc/<hash>/library/std/src/env.rs` or
    /// `library/std/src/env.rs`; everything from `library` on is kept.
    pub fn source_path(&self, span_file: &Path) -> Option<PathBuf> {
        if span_file.is_absolute() && span_file.exists() {
            return Some(span_file.to_path_buf());
        }

        let components: Vec<Component<'_>> = span_file.components().collect();
        let start = components
            .iter()
            .position(|c| c.as_os_str() == "library")?;
        let relative: PathBuf = components[start..].iter().collect();

        let candidate = self.sysroot.join(RUST_SRC_DIR).join(relative);
        candidate.exists().then_some(candidate)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CrateIndex>>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, index: Arc<CrateIndex>) {
        tracing::debug!(crate_name = index.name(), "Cached stdlib docs");
        self.cache().insert(index.name().to_string(), index);
    }
}

async fn query_rustc_sysroot(toolchain: &str) -> Result<PathBuf> {
    let output = tokio::process::Command::new("rustc")
        .arg(format!("+{}", toolchain))
        .args(["--print", "sysroot"])
        .output()
        .await
        .with_context(|| format!("Failed to run rustc +{} --print sysroot", toolchain))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Toolchain '{}' not available: {}", toolchain, stderr.trim());
    }

    Ok(PathBuf::from(String::from_utf8_lossy(&output.stdout).trim()))
}

/// Finds `<rustup home>/toolchains/<toolchain>-*`, preferring an exact name.
fn rustup_toolchain_dir(toolchain: &str) -> Option<PathBuf> {
    let rustup_home = std::env::var_os("RUSTUP_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".rustup")))?;
    let toolchains = rustup_home.join("toolchains");

    let exact = toolchains.join(toolchain);
    if exact.is_dir() {
        return Some(exact);
    }

    let prefix = format!("{}-", toolchain);
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(&toolchains)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    candidates.sort();
    candidates.pop()
}
