//! Item references and re-export resolution across standard library crates.

use crate::index::CrateIndex;
use crate::runtime::MemberKind;
use crate::stdlib::StdlibDocs;
use rustdoc_types::{Id, Item, ItemEnum, ItemKind, MacroKind, ProcMacro};
use std::ops::Deref;
use std::sync::Arc;

/// Re-export chains longer than this are treated as unresolvable.
const MAX_USE_DEPTH: usize = 8;

/// A documentation item together with the crate index that owns it.
/// Dereferences to the underlying [`Item`].
#[derive(Clone)]
pub struct ItemRef {
    index: Arc<CrateIndex>,
    id: Id,
    /// Custom name override (used for re-exports)
    override_name: Option<String>,
}

impl std::fmt::Debug for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRef")
            .field("crate", &self.index.name())
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl Deref for ItemRef {
    type Target = Item;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.index
            .get_item(&self.id)
            .expect("ItemRef ids are validated on construction")
    }
}

impl ItemRef {
    /// Returns `None` if `id` is not an item of `index`.
    pub fn new(index: Arc<CrateIndex>, id: Id) -> Option<Self> {
        index.get_item(&id)?;
        Some(Self {
            index,
            id,
            override_name: None,
        })
    }

    /// The crate's root module.
    pub fn root(index: Arc<CrateIndex>) -> Option<Self> {
        let root = index.root();
        Self::new(index, root)
    }

    /// Set a custom name on this ItemRef (for re-exports).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }

    /// Get the name of this item, preferring custom name over the item's own name.
    pub fn name(&self) -> Option<&str> {
        self.override_name
            .as_deref()
            .or_else(|| self.index.get_item(&self.id)?.name.as_deref())
    }

    pub fn kind(&self) -> MemberKind {
        member_kind(&self.inner)
    }

    /// Get the documentation comment for this item.
    pub fn comment(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    /// Path segments as recorded by rustdoc (e.g., ["std", "vec", "Vec"]).
    pub fn path_segments(&self) -> Option<&[String]> {
        self.index.item_path(&self.id)
    }

    /// Fully qualified path, falling back to the bare name.
    pub fn path_string(&self) -> String {
        match self.path_segments() {
            Some(segments) if !segments.is_empty() => segments.join("::"),
            _ => self.name().unwrap_or("<unnamed>").to_string(),
        }
    }

    #[inline]
    pub fn crate_index(&self) -> &Arc<CrateIndex> {
        &self.index
    }

    pub fn is_same_crate(&self, other: &CrateIndex) -> bool {
        self.index.name() == other.name()
    }
}

/// How far child iteration may reach into other crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// Never load another crate's JSON; external re-exports stay unresolved.
    Local,
    /// Load other standard library crates as needed.
    CrossCrate,
}

/// A named entry of a module, possibly a re-export of another item.
#[derive(Debug, Clone)]
pub struct Child {
    pub name: String,
    pub kind: MemberKind,
    /// Resolved item, when it lives in a crate that is already loaded.
    pub item: Option<ItemRef>,
    /// Re-export target that still needs loading another crate.
    external: Option<(Arc<CrateIndex>, Id)>,
}

impl Child {
    /// Resolve this child into an item, loading another crate if needed.
    pub fn resolve(&self, docs: &StdlibDocs) -> Option<ItemRef> {
        if let Some(item) = &self.item {
            return Some(item.clone());
        }
        let (index, id) = self.external.as_ref()?;
        resolve_id(docs, index, id).map(|item| item.with_name(self.name.clone()))
    }
}

/// Resolve an id referenced from `from`, crossing into other stdlib crates.
pub fn resolve_id(docs: &StdlibDocs, from: &Arc<CrateIndex>, id: &Id) -> Option<ItemRef> {
    if let Some(item) = ItemRef::new(Arc::clone(from), *id) {
        return Some(item);
    }

    let summary = from.paths().get(id)?;
    let crate_name = from.external_crate_name(summary.crate_id)?;
    if !StdlibDocs::is_stdlib_crate(crate_name) {
        tracing::debug!(crate_name, "Re-export target outside the standard library");
        return None;
    }

    let other = match docs.load(crate_name) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!(error = %e, "Could not follow re-export into {}", crate_name);
            return None;
        }
    };
    let target = other.find_by_path(&summary.path)?.id;
    ItemRef::new(other, target)
}

/// Follow `pub use` chains until a non-re-export item is reached.
pub fn resolve_use(docs: &StdlibDocs, item: ItemRef) -> Option<ItemRef> {
    let mut current = item;
    for _ in 0..MAX_USE_DEPTH {
        let ItemEnum::Use(use_item) = &current.inner else {
            return Some(current);
        };
        let name = use_item.name.clone();
        let id = use_item.id?;
        current = resolve_id(docs, current.crate_index(), &id)?.with_name(name);
    }
    tracing::debug!("Re-export chain too deep, giving up");
    None
}

/// Collect the named children of a module, expanding glob re-exports.
pub fn children(docs: &StdlibDocs, module: &ItemRef, reach: Reach) -> Vec<Child> {
    let ItemEnum::Module(inner) = &module.inner else {
        return Vec::new();
    };

    let mut out = Vec::new();
    // Stack of pending glob expansions
    let mut stack: Vec<(Arc<CrateIndex>, Vec<Id>, usize)> =
        vec![(Arc::clone(module.crate_index()), inner.items.clone(), 0)];

    while let Some((index, ids, depth)) = stack.pop() {
        for id in &ids {
            let Some(item) = ItemRef::new(Arc::clone(&index), *id) else {
                continue;
            };

            let ItemEnum::Use(use_item) = &item.inner else {
                if let Some(name) = item.name() {
                    out.push(Child {
                        name: name.to_string(),
                        kind: item.kind(),
                        item: Some(item.clone()),
                        external: None,
                    });
                }
                continue;
            };

            let Some(target_id) = use_item.id else {
                tracing::trace!(source = %use_item.source, "Skipping re-export without target id");
                continue;
            };

            if use_item.is_glob {
                if depth >= MAX_USE_DEPTH {
                    continue;
                }
                let target = match reach {
                    Reach::Local => ItemRef::new(Arc::clone(&index), target_id),
                    Reach::CrossCrate => resolve_id(docs, &index, &target_id),
                };
                if let Some(target) = target {
                    if let ItemEnum::Module(glob_module) = &target.inner {
                        stack.push((
                            Arc::clone(target.crate_index()),
                            glob_module.items.clone(),
                            depth + 1,
                        ));
                    }
                }
                continue;
            }

            let local = ItemRef::new(Arc::clone(&index), target_id)
                .and_then(resolve_use_local)
                .map(|target| target.with_name(use_item.name.clone()));

            match local {
                Some(target) => out.push(Child {
                    name: use_item.name.clone(),
                    kind: target.kind(),
                    item: Some(target),
                    external: None,
                }),
                None => {
                    let kind = index
                        .paths()
                        .get(&target_id)
                        .map_or(MemberKind::Other, |summary| summary_kind(&summary.kind));
                    let child = Child {
                        name: use_item.name.clone(),
                        kind,
                        item: None,
                        external: Some((Arc::clone(&index), target_id)),
                    };
                    match reach {
                        Reach::Local => out.push(child),
                        Reach::CrossCrate => out.push(Child {
                            item: child.resolve(docs),
                            ..child
                        }),
                    }
                }
            }
        }
    }

    out
}

/// Like [`resolve_use`] but never leaves the item's own crate.
fn resolve_use_local(item: ItemRef) -> Option<ItemRef> {
    let mut current = item;
    for _ in 0..MAX_USE_DEPTH {
        let ItemEnum::Use(use_item) = &current.inner else {
            return Some(current);
        };
        let name = use_item.name.clone();
        let target = ItemRef::new(Arc::clone(current.crate_index()), use_item.id?)?;
        current = target.with_name(name);
    }
    None
}

/// Convert an ItemEnum to the member kind shown to users.
pub fn member_kind(inner: &ItemEnum) -> MemberKind {
    match inner {
        ItemEnum::Module(_) => MemberKind::Module,
        ItemEnum::Struct(_) => MemberKind::Struct,
        ItemEnum::Enum(_) => MemberKind::Enum,
        ItemEnum::Union(_) => MemberKind::Union,
        ItemEnum::Trait(_) | ItemEnum::TraitAlias(_) => MemberKind::Trait,
        ItemEnum::Function(_) => MemberKind::Function,
        ItemEnum::Macro(_)
        | ItemEnum::ProcMacro(ProcMacro {
            kind: MacroKind::Bang,
            ..
        }) => MemberKind::Macro,
        ItemEnum::TypeAlias(_) => MemberKind::TypeAlias,
        ItemEnum::Constant { .. } => MemberKind::Constant,
        ItemEnum::Static(_) => MemberKind::Static,
        ItemEnum::Primitive(_) => MemberKind::Primitive,
        _ => MemberKind::Other,
    }
}

/// Convert the kind recorded in a path summary.
pub const fn summary_kind(kind: &ItemKind) -> MemberKind {
    match kind {
        ItemKind::Module => MemberKind::Module,
        ItemKind::Struct => MemberKind::Struct,
        ItemKind::Enum => MemberKind::Enum,
        ItemKind::Union => MemberKind::Union,
        ItemKind::Trait | ItemKind::TraitAlias => MemberKind::Trait,
        ItemKind::Function => MemberKind::Function,
        ItemKind::Macro => MemberKind::Macro,
        ItemKind::TypeAlias => MemberKind::TypeAlias,
        ItemKind::Constant => MemberKind::Constant,
        ItemKind::Static => MemberKind::Static,
        ItemKind::Primitive => MemberKind::Primitive,
        _ => MemberKind::Other,
    }
}
