//! Presenting a resolved target: docs, member listings, URLs and sources.

use crate::error::{Error, Result};
use crate::launch::Launcher;
use crate::registry::is_private_name;
use crate::runtime::{Runtime, SourceLocation, Target};
use std::fmt::Write as _;
use std::io::Write;

pub struct Presenter<'a, R, L> {
    runtime: &'a R,
    launcher: &'a L,
    docs_url: &'a str,
}

impl<'a, R: Runtime, L: Launcher> Presenter<'a, R, L> {
    pub fn new(runtime: &'a R, launcher: &'a L, docs_url: &'a str) -> Self {
        Self {
            runtime,
            launcher,
            docs_url,
        }
    }

    pub fn runtime(&self) -> &'a R {
        self.runtime
    }

    /// Print the target's documentation.
    pub fn show_docs(&self, target: &Target, out: &mut impl Write) -> Result<()> {
        let text = self.runtime.documentation(target)?;
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }

    /// Callable members of a module in ascending order.
    ///
    /// Names starting with `_` are left out unless `include_private` is set.
    pub fn list_members(&self, module: &str, include_private: bool) -> Result<Vec<String>> {
        let loaded = self.runtime.load_module(module)?;
        let mut names: Vec<String> = self
            .runtime
            .members(&loaded)?
            .into_iter()
            .filter(|member| member.kind.is_callable())
            .filter(|member| include_private || !is_private_name(&member.name))
            .map(|member| member.name)
            .collect();
        names.sort();
        names.dedup();
        tracing::debug!(module, count = names.len(), "Listed callable members");
        Ok(names)
    }

    /// Documentation URL for `name`.
    ///
    /// A resolved target links to its own page; anything else, or a target
    /// without a page, links to a search of the root crate's docs.
    pub fn docs_url(&self, name: &str, target: Option<&Target>) -> String {
        let page = target.map(|target| self.runtime.doc_page(target));
        match page {
            Some(Ok(page)) => format!("{}/{}", self.docs_url, page),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "No page for target, falling back to search");
                self.search_url(name)
            }
            None => self.search_url(name),
        }
    }

    /// Print the documentation URL and ask the host to open it.
    pub async fn open_docs_url(
        &self,
        name: &str,
        target: Option<&Target>,
        out: &mut impl Write,
    ) -> Result<String> {
        let url = self.docs_url(name, target);
        writeln!(out, "{}", url)?;
        self.launcher.open_url(&url).await?;
        Ok(url)
    }

    /// Open the file defining `target` in the editor, at the defining line.
    pub async fn open_source(
        &self,
        target: &Target,
        out: &mut impl Write,
    ) -> Result<SourceLocation> {
        let location = self
            .runtime
            .source_location(target)?
            .ok_or_else(|| Error::NoSource(target.name().to_string()))?;
        writeln!(out, "{}", location)?;
        out.flush()?;
        self.launcher.open_editor(&location).await?;
        Ok(location)
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/{}/index.html?search={}",
            self.docs_url,
            self.runtime.root_crate(),
            encode_query(name)
        )
    }
}

/// Percent-encode everything but RFC 3986 unreserved characters and `:`.
fn encode_query(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' => {
                encoded.push(char::from(byte));
            }
            _ => {
                let _ = write!(encoded, "%{:02X}", byte);
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keeps_paths_readable() {
        assert_eq!(encode_query("collections::hash_map"), "collections::hash_map");
    }

    #[test]
    fn query_escapes_separators() {
        assert_eq!(encode_query("a#b&c?d"), "a%23b%26c%3Fd");
        assert_eq!(encode_query("100%"), "100%25");
        assert_eq!(encode_query("é"), "%C3%A9");
    }
}
