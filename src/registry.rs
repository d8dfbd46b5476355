//! Module and builtin name registries.

use crate::error::Result;
use crate::runtime::Runtime;
use std::collections::BTreeSet;

/// Whether a name is private by convention: any `::` segment starts with `_`.
pub fn is_private_name(name: &str) -> bool {
    name.split("::").any(|segment| segment.starts_with('_'))
}

/// Every loadable module name, private names excluded.
pub fn list_modules<R: Runtime + ?Sized>(runtime: &R) -> Result<BTreeSet<String>> {
    Ok(public_only(runtime.enumerate_modules()?))
}

/// Every name available without an import, private names excluded.
pub fn list_builtins<R: Runtime + ?Sized>(runtime: &R) -> Result<BTreeSet<String>> {
    Ok(public_only(runtime.enumerate_builtins()?))
}

fn public_only(names: BTreeSet<String>) -> BTreeSet<String> {
    names
        .into_iter()
        .filter(|name| !is_private_name(name))
        .collect()
}
