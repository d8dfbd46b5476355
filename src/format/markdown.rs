//! Doc comment cleanup for terminal output.
//!
//! Rustdoc comments are markdown written for HTML rendering. For a terminal we
//! drop intra-doc link markup, reference-style link definitions, and the hidden
//! `# ` lines of doctests, and keep everything else verbatim.

use regex::Regex;
use std::sync::LazyLock;

/// `[text](target)` and `[text][ref]`.
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]+)\](?:\([^()\s]*\)|\[[^\[\]]*\])").expect("valid link regex")
});

/// Shortcut intra-doc links: ``[`Vec`]``.
static SHORTCUT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(`[^`\]]+`)\]").expect("valid shortcut link regex"));

/// `[name]: target` definitions on their own line.
static LINK_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]+\]:\s*\S+.*$").expect("valid definition regex"));

/// Render a doc comment for the terminal.
pub fn clean_docs(docs: &str) -> String {
    let mut out = Vec::new();
    let mut in_rust_block = false;
    let mut in_other_block = false;

    for line in docs.lines() {
        let trimmed = line.trim_start();

        if let Some(info) = trimmed.strip_prefix("```") {
            if in_rust_block || in_other_block {
                in_rust_block = false;
                in_other_block = false;
            } else if is_rust_fence(info) {
                in_rust_block = true;
            } else {
                in_other_block = true;
            }
            out.push(line.to_string());
            continue;
        }

        if in_rust_block {
            // Hidden doctest lines
            if trimmed == "#" || trimmed.starts_with("# ") {
                continue;
            }
            out.push(line.to_string());
            continue;
        }

        if in_other_block {
            out.push(line.to_string());
            continue;
        }

        if LINK_DEFINITION.is_match(line) {
            continue;
        }

        let line = INLINE_LINK.replace_all(line, "$1");
        let line = SHORTCUT_LINK.replace_all(&line, "$1");
        out.push(line.into_owned());
    }

    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// First non-empty line of a doc comment, cleaned.
pub fn summary_line(docs: &str) -> Option<String> {
    let first = docs.lines().find(|line| !line.trim().is_empty())?;
    Some(clean_docs(first.trim()))
}

/// Fences without a language, or tagged `rust`/doctest attributes, hold Rust.
fn is_rust_fence(info: &str) -> bool {
    let info = info.trim();
    info.is_empty()
        || info.split(',').map(str::trim).all(|attr| {
            matches!(
                attr,
                "rust"
                    | "ignore"
                    | "no_run"
                    | "should_panic"
                    | "compile_fail"
                    | "edition2015"
                    | "edition2018"
                    | "edition2021"
                    | "edition2024"
            )
        })
}
