//! Final output rendering for documentation display.
//!
//! Turns a resolved item into the text shown by `rustman NAME`: a header, the
//! item's signature, its cleaned doc comment and, for modules, a grouped
//! listing of the module's contents.

use super::{TypeFormatter, clean_docs, summary_line};
use crate::item::{Child, ItemRef};
use crate::runtime::MemberKind;
use rustdoc_types::ItemEnum;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

/// Display order of module listing groups.
const CATEGORY_ORDER: &[(MemberKind, &str)] = &[
    (MemberKind::Module, "Modules"),
    (MemberKind::Primitive, "Primitive Types"),
    (MemberKind::Struct, "Structs"),
    (MemberKind::Enum, "Enums"),
    (MemberKind::Union, "Unions"),
    (MemberKind::Trait, "Traits"),
    (MemberKind::TypeAlias, "Type Aliases"),
    (MemberKind::Function, "Functions"),
    (MemberKind::Constant, "Constants"),
    (MemberKind::Static, "Statics"),
    (MemberKind::Macro, "Macros"),
];

/// Render the full documentation text of an item.
///
/// `children` is only consulted for modules.
pub(crate) fn render_documentation(
    output: &mut String,
    item: &ItemRef,
    children: &[Child],
) -> fmt::Result {
    writeln!(output, "{} {}", item.kind(), display_path(item))?;

    if let Some(signature) = render_item_signature(item) {
        writeln!(output, "\n{}", signature)?;
    }

    if let Some(docs) = item.comment() {
        let cleaned = clean_docs(docs);
        if !cleaned.is_empty() {
            writeln!(output, "\n{}", cleaned)?;
        }
    }

    if matches!(item.inner, ItemEnum::Module(_)) {
        render_module_listing(output, children)?;
    }

    Ok(())
}

/// Generate a signature string for an item. `None` for modules and primitives.
pub(crate) fn render_item_signature(item: &ItemRef) -> Option<String> {
    let name = item.name()?;
    let fmt = TypeFormatter::new(item.crate_index());
    let mut s = String::new();

    let result = match &item.inner {
        ItemEnum::Function(_) => fmt.write_function_signature(&mut s, item),
        ItemEnum::Struct(st) => {
            write!(s, "struct {}", name).ok()?;
            fmt.write_generics(&mut s, &st.generics).ok()?;
            let len = s.len();
            fmt.write_where_clause(&mut s, &st.generics.where_predicates, len)
        }
        ItemEnum::Enum(e) => {
            write!(s, "enum {}", name).ok()?;
            fmt.write_generics(&mut s, &e.generics).ok()?;
            let len = s.len();
            fmt.write_where_clause(&mut s, &e.generics.where_predicates, len)
        }
        ItemEnum::Union(u) => {
            write!(s, "union {}", name).ok()?;
            fmt.write_generics(&mut s, &u.generics).ok()?;
            let len = s.len();
            fmt.write_where_clause(&mut s, &u.generics.where_predicates, len)
        }
        ItemEnum::Trait(t) => {
            if t.is_unsafe {
                s.push_str("unsafe ");
            }
            write!(s, "trait {}", name).ok()?;
            fmt.write_generics(&mut s, &t.generics).ok()?;
            let len = s.len();
            fmt.write_supertrait_bounds(&mut s, &t.bounds, len).ok()?;
            let len = s.lines().last().map_or(0, str::len);
            fmt.write_where_clause(&mut s, &t.generics.where_predicates, len)
        }
        ItemEnum::TypeAlias(ta) => {
            write!(s, "type {}", name).ok()?;
            fmt.write_generics(&mut s, &ta.generics).ok()?;
            s.push_str(" = ");
            fmt.write_type(&mut s, &ta.type_)
                .and_then(|()| s.write_char(';'))
        }
        ItemEnum::Constant { type_, .. } => {
            write!(s, "const {}: ", name).ok()?;
            fmt.write_type(&mut s, type_)
                .and_then(|()| s.write_char(';'))
        }
        ItemEnum::Static(st) => {
            write!(
                s,
                "static {}{}: ",
                if st.is_mutable { "mut " } else { "" },
                name
            )
            .ok()?;
            fmt.write_type(&mut s, &st.type_)
                .and_then(|()| s.write_char(';'))
        }
        ItemEnum::Macro(source) => s.write_str(source.trim()),
        ItemEnum::ProcMacro(_) => write!(s, "{}!(..)", name),
        _ => return None,
    };

    result.ok().map(|()| s)
}

/// Path of an item's rustdoc HTML page, relative to the documentation root.
///
/// `root_crate` hosts primitive pages. Returns `None` for items rustdoc does
/// not give a page of their own.
pub(crate) fn doc_page(item: &ItemRef, root_crate: &str) -> Option<String> {
    let name = item.name()?;
    let kind = item.kind();

    if kind == MemberKind::Primitive {
        return Some(format!("{}/primitive.{}.html", root_crate, name));
    }

    let segments = item.path_segments()?;
    if kind == MemberKind::Module {
        return Some(module_page(segments));
    }

    let prefix = page_prefix(kind, &item.inner)?;
    let (_, parents) = segments.split_last()?;
    let mut page = parents.join("/");
    write!(page, "/{}.{}.html", prefix, name).ok()?;
    Some(page)
}

/// `std/collections/index.html` for `["std", "collections"]`.
pub(crate) fn module_page<S: AsRef<str>>(segments: &[S]) -> String {
    let mut page = String::new();
    for segment in segments {
        page.push_str(segment.as_ref());
        page.push('/');
    }
    page.push_str("index.html");
    page
}

fn page_prefix(kind: MemberKind, inner: &ItemEnum) -> Option<&'static str> {
    let prefix = match kind {
        MemberKind::Struct => "struct",
        MemberKind::Enum => "enum",
        MemberKind::Union => "union",
        MemberKind::Trait if matches!(inner, ItemEnum::TraitAlias(_)) => "traitalias",
        MemberKind::Trait => "trait",
        MemberKind::Function => "fn",
        MemberKind::Macro => "macro",
        MemberKind::TypeAlias => "type",
        MemberKind::Constant => "constant",
        MemberKind::Static => "static",
        MemberKind::Module | MemberKind::Primitive | MemberKind::Other => return None,
    };
    Some(prefix)
}

fn display_path(item: &ItemRef) -> String {
    if item.kind() == MemberKind::Primitive {
        return item.name().unwrap_or("<unnamed>").to_string();
    }
    item.path_string()
}

fn render_module_listing(output: &mut String, children: &[Child]) -> fmt::Result {
    let mut groups: BTreeMap<MemberKind, BTreeMap<&str, &Child>> = BTreeMap::new();
    for child in children {
        groups
            .entry(child.kind)
            .or_default()
            .entry(child.name.as_str())
            .or_insert(child);
    }

    for (kind, category_name) in CATEGORY_ORDER {
        let Some(entries) = groups.get(kind) else {
            continue;
        };

        writeln!(output, "\n{}:", category_name)?;
        for (name, child) in entries {
            let summary = child
                .item
                .as_ref()
                .and_then(ItemRef::comment)
                .and_then(summary_line);
            match summary {
                Some(summary) if !summary.is_empty() => {
                    writeln!(output, "  {:<24} {}", name, summary)?;
                }
                _ => writeln!(output, "  {}", name)?,
            }
        }
    }

    Ok(())
}
