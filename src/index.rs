//! Rustdoc JSON indexing.
//!
//! `CrateIndex` owns one parsed rustdoc JSON file and answers the id and path
//! lookups the rest of the crate needs.

use crate::error::LoadError;
use rustdoc_types::{Crate, Id, Item, ItemEnum, ItemSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Id of the local crate in `ItemSummary::crate_id`.
const LOCAL_CRATE_ID: u32 = 0;

pub struct CrateIndex {
    crate_data: Crate,
    name: String,
}

impl std::fmt::Debug for CrateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrateIndex")
            .field("name", &self.name)
            .field("items", &self.crate_data.index.len())
            .finish_non_exhaustive()
    }
}

impl CrateIndex {
    /// Loads rustdoc JSON output and builds an index of all items.
    pub fn load<P: AsRef<Path>>(crate_name: &str, path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound {
                crate_name: crate_name.to_string(),
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Parse {
            crate_name: crate_name.to_string(),
            error: format!("failed to read {}: {}", path.display(), e),
        })?;
        let crate_data: Crate = serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            crate_name: crate_name.to_string(),
            error: format!("failed to parse rustdoc JSON: {}", e),
        })?;

        tracing::debug!(
            crate_name,
            items = crate_data.index.len(),
            format_version = crate_data.format_version,
            "Loaded rustdoc JSON"
        );

        Ok(Self::from_crate(crate_name, crate_data))
    }

    /// Load on the blocking pool; parsing large JSON is CPU-intensive.
    pub async fn load_async(crate_name: String, path: PathBuf) -> Result<Self, LoadError> {
        let name = crate_name.clone();
        tokio::task::spawn_blocking(move || Self::load(&crate_name, path))
            .await
            .map_err(|e| LoadError::Parse {
                crate_name: name,
                error: format!("load task failed: {}", e),
            })?
    }

    pub fn from_crate(crate_name: &str, crate_data: Crate) -> Self {
        Self {
            crate_data,
            name: crate_name.to_string(),
        }
    }

    /// Get the crate name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crate_version(&self) -> Option<&str> {
        self.crate_data.crate_version.as_deref()
    }

    /// Get access to the crate's paths mapping
    pub fn paths(&self) -> &HashMap<Id, ItemSummary> {
        &self.crate_data.paths
    }

    pub fn get_item(&self, id: &Id) -> Option<&Item> {
        self.crate_data.index.get(id)
    }

    /// Get the root item ID
    pub fn root(&self) -> Id {
        self.crate_data.root
    }

    /// Name of an external crate referenced from this one.
    pub fn external_crate_name(&self, crate_id: u32) -> Option<&str> {
        if crate_id == LOCAL_CRATE_ID {
            return Some(&self.name);
        }
        self.crate_data
            .external_crates
            .get(&crate_id)
            .map(|krate| krate.name.as_str())
    }

    /// Finds a local item by its fully qualified path (`["core", "mem", "swap"]`).
    pub fn find_by_path(&self, path: &[String]) -> Option<&Item> {
        self.crate_data
            .paths
            .iter()
            .filter(|(_, summary)| summary.crate_id == LOCAL_CRATE_ID && summary.path == path)
            .find_map(|(id, _)| self.get_item(id))
    }

    /// Fully qualified path of an item, if rustdoc recorded one.
    pub fn item_path(&self, id: &Id) -> Option<&[String]> {
        self.crate_data
            .paths
            .get(id)
            .map(|summary| summary.path.as_slice())
    }

    /// All primitive type items documented by this crate.
    pub fn primitives(&self) -> impl Iterator<Item = &Item> {
        self.crate_data
            .index
            .values()
            .filter(|item| matches!(item.inner, ItemEnum::Primitive(_)))
    }
}
