//! Formatting utilities for documentation display.

mod builders;
mod markdown;
pub(crate) mod renderers;

pub use builders::TypeFormatter;
pub use markdown::{clean_docs, summary_line};
