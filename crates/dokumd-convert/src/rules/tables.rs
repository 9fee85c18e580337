//! DokuWiki tables to pipe tables.
//!
//! DokuWiki rows start with `^` (header cell) or `|` (data cell). A table
//! whose first row is a header row gets a `|---|` separator after it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TABLE_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[\^|].*$").unwrap());

/// Links, embeds and inline code whose pipes do not separate cells.
static CELL_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]]*\]\]|\{\{[^}]*\}\}|`[^`]*`").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<code(?:\s[^>]*)?>([^<\n]*)</code>").unwrap());

/// DokuWiki's escaped pipe inside a cell.
const ESCAPED_PIPE: &str = "%%|%%";

/// Stand-in for an escaped pipe while cells are split.
const PIPE_PLACEHOLDER: char = '\u{1}';

/// Rewrite single-line `<code>` inside table rows to inline code.
///
/// Runs before block preservation so cell code never becomes a fenced block.
pub(crate) fn inline_code_in_rows(content: &str) -> String {
    if !content.contains("<code") {
        return content.to_owned();
    }
    TABLE_ROW_RE
        .replace_all(content, |caps: &Captures<'_>| {
            INLINE_CODE_RE.replace_all(&caps[0], "`${1}`").into_owned()
        })
        .into_owned()
}

/// Convert table rows, leaving other lines untouched.
pub(crate) fn convert(content: &str) -> String {
    let mut lines = Vec::new();
    let mut in_table = false;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('^') || trimmed.starts_with('|') {
            let header = !in_table && trimmed.starts_with('^');
            in_table = true;

            let cells = split_cells(trimmed);
            lines.push(format!("| {} |", cells.join(" | ")));
            if header {
                lines.push(format!("|{}|", vec!["---"; cells.len()].join("|")));
            }
        } else {
            if in_table {
                lines.push(String::new());
                in_table = false;
            }
            lines.push(line.to_owned());
        }
    }

    lines.join("\n")
}

/// Check whether `offset` lies on a converted table row.
///
/// Rules that run after the table rule use this to escape the pipes they
/// emit, so a link or embed stays inside its cell.
pub(crate) fn in_table_row(content: &str, offset: usize) -> bool {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    content[line_start..].trim_start().starts_with('|')
}

/// Split a row into trimmed cells, escaping literal pipes.
///
/// Pipes inside `[[…]]`, `{{…}}` and inline code belong to the span and come
/// out as `\|`.
fn split_cells(row: &str) -> Vec<String> {
    let placeholder = PIPE_PLACEHOLDER.to_string();
    let row = row.replace(ESCAPED_PIPE, &placeholder);
    let row = CELL_SPAN_RE.replace_all(&row, |caps: &Captures<'_>| {
        caps[0].replace("\\|", "|").replace('|', &placeholder)
    });
    row.trim_matches(|c| c == '|' || c == '^')
        .split(['|', '^'])
        .map(|cell| cell.trim().replace(PIPE_PLACEHOLDER, "\\|"))
        .collect()
}
