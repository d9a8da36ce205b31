//! Lightweight description markup.
//!
//! Project and event descriptions use a private three-rule markup: tabs for
//! indentation, `**bold**` spans, and literal newlines. The rules are
//! disjoint — no rule can match the output of another — so the substitutions
//! commute and the order below is not load-bearing.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Error compiling bold pattern"));

/// Expands a raw description into an HTML fragment.
///
/// The input is trusted content authored alongside the descriptors; no other
/// HTML metacharacters are escaped.
pub fn expand(text: &str) -> String {
    let text = text.replace('\t', "&nbsp;&nbsp;&nbsp;&nbsp;");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    text.replace('\n', "<br>")
}
