//! Headings, inline emphasis, lists and whitespace cleanup.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `====== Title ======` with 1 to 6 equals signs on each side.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(={1,6})[ \t]+(.+?)[ \t]+={1,6}[ \t]*$").unwrap()
});

/// `//italic//`, skipping the `//` of `scheme://` URLs.
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^:])//([^\s/](?:.*?[^\s:])?)//").unwrap()
});

static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());

static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<del>(.*?)</del>").unwrap());

static MONOSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"''(.+?)''").unwrap());

/// List item indented by spaces or tabs, `*` unordered, `-` ordered.
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^((?: {2}|\t)[ \t]*)([*-])[ \t]+").unwrap());

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\\").unwrap());

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Apply all formatting rules in order.
pub(crate) fn convert(content: &str) -> String {
    let content = HEADING_RE.replace_all(content, |caps: &Captures<'_>| {
        let level = 7 - caps[1].len();
        format!("{} {}", "#".repeat(level), &caps[2])
    });
    let content = ITALIC_RE.replace_all(&content, "${1}*${2}*");
    let content = UNDERLINE_RE.replace_all(&content, "<u>${1}</u>");
    let content = STRIKE_RE.replace_all(&content, "~~${1}~~");
    let content = MONOSPACE_RE.replace_all(&content, "`${1}`");
    let content = LIST_ITEM_RE.replace_all(&content, |caps: &Captures<'_>| {
        let depth = indent_width(&caps[1]) / 2 - 1;
        let marker = if &caps[2] == "-" { "1." } else { "-" };
        format!("{}{marker} ", "    ".repeat(depth))
    });
    let content = LINE_BREAK_RE.replace_all(&content, "");
    BLANK_LINES_RE.replace_all(&content, "\n\n").into_owned()
}

/// Indentation width with tabs counted as two spaces.
fn indent_width(indent: &str) -> usize {
    indent.chars().map(|c| if c == '\t' { 2 } else { 1 }).sum()
}
