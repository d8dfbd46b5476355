//! [`Runtime`] backed by the toolchain's rustdoc JSON.

use super::{Member, MemberKind, Runtime, SourceLocation, Target};
use crate::error::{Error, Result};
use crate::format::renderers;
use crate::index::CrateIndex;
use crate::item::{self, Child, ItemRef, Reach};
use crate::stdlib::StdlibDocs;
use rustdoc_types::{Id, ItemEnum};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::{Arc, OnceLock};

/// Prelude modules, newest edition first.
const PRELUDE_EDITIONS: &[&str] = &["rust_2024", "rust_2021", "v1"];

pub struct RustdocRuntime {
    docs: StdlibDocs,
    root: Arc<CrateIndex>,
    modules: OnceLock<BTreeSet<String>>,
    builtins: OnceLock<BTreeSet<String>>,
}

impl std::fmt::Debug for RustdocRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustdocRuntime")
            .field("root", &self.root.name())
            .field("docs", &self.docs)
            .finish_non_exhaustive()
    }
}

impl RustdocRuntime {
    /// Load the root crate's documentation and wrap it in a runtime.
    pub async fn open(docs: StdlibDocs, root_crate: &str) -> Result<Self> {
        if !StdlibDocs::is_stdlib_crate(root_crate) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a standard library crate",
                root_crate
            )));
        }

        let root = docs
            .preload(root_crate)
            .await
            .map_err(|e| Error::RegistryUnavailable(e.to_string()))?;
        tracing::info!(
            crate_name = root.name(),
            version = root.crate_version().unwrap_or("unknown"),
            "Opened documentation runtime"
        );

        Ok(Self {
            docs,
            root,
            modules: OnceLock::new(),
            builtins: OnceLock::new(),
        })
    }

    fn root_item(&self) -> Result<ItemRef> {
        ItemRef::root(Arc::clone(&self.root)).ok_or_else(|| {
            Error::RegistryUnavailable(format!("{} has no root module", self.root.name()))
        })
    }

    fn walk_modules(&self) -> Result<BTreeSet<String>> {
        let mut names: BTreeSet<String> = self
            .docs
            .available_crates()
            .into_iter()
            .map(String::from)
            .collect();

        let root = self.root_item()?;
        let mut seen: HashSet<Id> = HashSet::from([root.id]);
        let mut queue = VecDeque::from([(String::new(), root)]);

        while let Some((prefix, module)) = queue.pop_front() {
            for child in item::children(&self.docs, &module, Reach::Local) {
                if child.kind != MemberKind::Module {
                    continue;
                }
                let name = if prefix.is_empty() {
                    child.name.clone()
                } else {
                    format!("{}::{}", prefix, child.name)
                };

                // Only descend into modules whose items live in the root crate
                if let Some(target) = child.item {
                    if target.is_same_crate(&self.root) && seen.insert(target.id) {
                        queue.push_back((name.clone(), target));
                    }
                }
                names.insert(name);
            }
        }

        tracing::debug!(count = names.len(), "Enumerated modules");
        Ok(names)
    }

    fn collect_builtins(&self) -> Result<BTreeSet<String>> {
        let mut names: BTreeSet<String> = self
            .root
            .primitives()
            .filter_map(|item| item.name.clone())
            .collect();

        let root = self.root_item()?;
        let root_children = item::children(&self.docs, &root, Reach::Local);
        names.extend(
            root_children
                .iter()
                .filter(|child| child.kind == MemberKind::Macro)
                .map(|child| child.name.clone()),
        );

        match self.prelude(&root_children) {
            Some(prelude) => names.extend(prelude.into_iter().map(|child| child.name)),
            None => tracing::warn!(crate_name = self.root.name(), "No prelude module found"),
        }

        tracing::debug!(count = names.len(), "Enumerated builtins");
        Ok(names)
    }

    /// Children of the newest prelude edition the root crate documents.
    fn prelude(&self, root_children: &[Child]) -> Option<Vec<Child>> {
        let prelude = root_children
            .iter()
            .find(|child| child.name == "prelude" && child.kind == MemberKind::Module)?
            .resolve(&self.docs)?;
        let editions = item::children(&self.docs, &prelude, Reach::Local);

        PRELUDE_EDITIONS.iter().find_map(|edition| {
            let module = editions
                .iter()
                .find(|child| child.name == *edition)?
                .resolve(&self.docs)
                .and_then(|module| item::resolve_use(&self.docs, module))?;
            let children = item::children(&self.docs, &module, Reach::CrossCrate);
            tracing::debug!(edition, items = children.len(), "Using prelude");
            (!children.is_empty()).then_some(children)
        })
    }

    /// Walk `::`-separated segments down from `start`.
    fn walk_path(&self, name: &str, start: ItemRef, segments: &[&str]) -> Result<ItemRef> {
        let mut current = start;
        for segment in segments {
            if !matches!(current.inner, ItemEnum::Module(_)) {
                return Err(Error::NotAModule(current.path_string()));
            }
            let children = item::children(&self.docs, &current, Reach::Local);
            // Prefer the module when a macro shares its name
            let next = children
                .iter()
                .filter(|child| child.name == *segment)
                .min_by_key(|child| child.kind != MemberKind::Module)
                .and_then(|child| child.resolve(&self.docs))
                .and_then(|found| item::resolve_use(&self.docs, found))
                .ok_or_else(|| {
                    let parent = current.path_string();
                    Error::resolution(name, format!("no item '{}' in {}", segment, parent))
                })?;
            current = next;
        }
        Ok(current)
    }

    /// Resolve a module name to its item.
    ///
    /// Paths are looked up under the root crate first, so `alloc` names
    /// `std::alloc` rather than the `alloc` crate when the root is `std`.
    fn resolve_module(&self, name: &str) -> Result<ItemRef> {
        let segments: Vec<&str> = name.split("::").collect();
        let from_root = self.walk_path(name, self.root_item()?, &segments);

        match segments.split_first() {
            Some((first, rest))
                if from_root.is_err()
                    && StdlibDocs::is_stdlib_crate(first)
                    && self.docs.has_docs(first) =>
            {
                let index = self.docs.load(first)?;
                let root = ItemRef::root(index)
                    .ok_or_else(|| Error::resolution(name, "crate has no root module"))?;
                self.walk_path(name, root, rest)
            }
            _ => from_root,
        }
    }

    /// Resolve a builtin: a primitive, a root macro, or a prelude item.
    fn resolve_builtin(&self, name: &str) -> Result<ItemRef> {
        if let Some(primitive) = self
            .root
            .primitives()
            .find(|item| item.name.as_deref() == Some(name))
        {
            let id = primitive.id;
            if let Some(found) = ItemRef::new(Arc::clone(&self.root), id) {
                return Ok(found);
            }
        }

        let root = self.root_item()?;
        let root_children = item::children(&self.docs, &root, Reach::Local);
        let from_root = root_children
            .iter()
            .filter(|child| child.kind == MemberKind::Macro)
            .find(|child| child.name == name)
            .and_then(|child| child.resolve(&self.docs));
        let found = from_root.or_else(|| {
            self.prelude(&root_children)?
                .into_iter()
                .find(|child| child.name == name)?
                .resolve(&self.docs)
        });

        found
            .and_then(|found| item::resolve_use(&self.docs, found))
            .ok_or_else(|| {
                Error::resolution(name, "not found among primitives, macros or the prelude")
            })
    }

    fn resolve_target(&self, target: &Target) -> Result<ItemRef> {
        match target {
            Target::Module(name) => self.resolve_module(name),
            Target::Builtin(name) => self.resolve_builtin(name),
        }
    }
}

impl Runtime for RustdocRuntime {
    type Module = ItemRef;

    fn enumerate_modules(&self) -> Result<BTreeSet<String>> {
        if let Some(names) = self.modules.get() {
            return Ok(names.clone());
        }
        let names = self.walk_modules()?;
        Ok(self.modules.get_or_init(|| names).clone())
    }

    fn enumerate_builtins(&self) -> Result<BTreeSet<String>> {
        if let Some(names) = self.builtins.get() {
            return Ok(names.clone());
        }
        let names = self.collect_builtins()?;
        Ok(self.builtins.get_or_init(|| names).clone())
    }

    fn load_module(&self, name: &str) -> Result<ItemRef> {
        let module = self.resolve_module(name)?;
        if matches!(module.inner, ItemEnum::Module(_)) {
            Ok(module)
        } else {
            Err(Error::NotAModule(name.to_string()))
        }
    }

    fn members(&self, module: &ItemRef) -> Result<Vec<Member>> {
        if !matches!(module.inner, ItemEnum::Module(_)) {
            return Err(Error::NotAModule(module.path_string()));
        }

        // Macros and modules live in separate namespaces; `env` can be both
        let members: BTreeSet<Member> = item::children(&self.docs, module, Reach::CrossCrate)
            .into_iter()
            .map(|child| Member::new(child.name, child.kind))
            .collect();

        Ok(members.into_iter().collect())
    }

    fn documentation(&self, target: &Target) -> Result<String> {
        let found = self.resolve_target(target)?;
        let children = if matches!(found.inner, ItemEnum::Module(_)) {
            item::children(&self.docs, &found, Reach::CrossCrate)
        } else {
            Vec::new()
        };

        let mut output = String::new();
        renderers::render_documentation(&mut output, &found, &children)
            .map_err(|e| Error::resolution(target.name(), e))?;
        Ok(output)
    }

    fn doc_page(&self, target: &Target) -> Result<String> {
        let found = self.resolve_target(target)?;
        if let Some(page) = renderers::doc_page(&found, self.root.name()) {
            return Ok(page);
        }

        match target {
            Target::Module(name) => {
                let mut segments: Vec<&str> = name.split("::").collect();
                let root = self.root.name();
                if found.is_same_crate(&self.root) && segments.first() != Some(&root) {
                    segments.insert(0, root);
                }
                Ok(renderers::module_page(&segments))
            }
            Target::Builtin(name) => Err(Error::resolution(
                name.as_str(),
                "item has no page of its own",
            )),
        }
    }

    fn source_location(&self, target: &Target) -> Result<Option<SourceLocation>> {
        let found = self.resolve_target(target)?;
        if found.kind() == MemberKind::Primitive {
            return Ok(None);
        }
        let Some(span) = &found.span else {
            tracing::debug!(name = target.name(), "Item has no span");
            return Ok(None);
        };

        match self.docs.source_path(&span.filename) {
            Some(path) => Ok(Some(SourceLocation {
                path,
                line: span.begin.0,
            })),
            None => {
                tracing::warn!(
                    file = %span.filename.display(),
                    "Source file not found; is the rust-src component installed?"
                );
                Ok(None)
            }
        }
    }

    fn root_crate(&self) -> &str {
        self.root.name()
    }
}
