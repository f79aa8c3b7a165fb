//! Audit result output
//!
//! Builds a human-facing summary from the discovered pages and the link
//! analysis report, and renders it to stdout or a markdown file.

mod markdown;
mod summary;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use summary::{build_summary, print_summary, AuditSummary};
