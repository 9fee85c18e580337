//! Wiki links to Obsidian links.
//!
//! `[[ns:page|text]]` becomes `[[page|text]]`, external targets become
//! regular markdown links. Embeds (`![[…]]`) produced by earlier rules are
//! left alone. On a table row the `|` separator is written as `\|`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::tables::in_table_row;

/// Target, then optional text after a plain or table-escaped `|`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+?)\\?(?:\|([^\]]*))?\]\]").unwrap());

pub(crate) fn convert(content: &str) -> String {
    LINK_RE
        .replace_all(content, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            if content[..start].ends_with('!') {
                return whole.to_owned();
            }
            let text = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|t| !t.is_empty());
            let separator = if in_table_row(content, start) { "\\|" } else { "|" };
            convert_link(caps[1].trim(), text, separator)
        })
        .into_owned()
}

fn convert_link(target: &str, text: Option<&str>, separator: &str) -> String {
    if is_external(target) {
        return format!("[{}]({target})", text.unwrap_or(target));
    }

    let page = target.rsplit(':').next().unwrap_or(target);

    if let Some((page, anchor)) = page.split_once('#') {
        return match text {
            Some(text) => format!("[[{page}#{anchor}{separator}{text}]]"),
            None => format!("[[{page}#{anchor}]]"),
        };
    }

    match text {
        Some(text) if text.to_lowercase() != page.to_lowercase() => {
            format!("[[{page}{separator}{text}]]")
        }
        _ => format!("[[{page}]]"),
    }
}

/// Check whether a link or media target points outside the wiki.
pub(crate) fn is_external(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_link() {
        assert_eq!(convert("[[wiki:start]]"), "[[start]]");
    }

    #[test]
    fn test_internal_link_with_text() {
        assert_eq!(convert("[[ns:guide|The Guide]]"), "[[guide|The Guide]]");
    }

    #[test]
    fn test_text_equal_to_page_is_dropped() {
        assert_eq!(convert("[[ns:Guide|guide]]"), "[[Guide]]");
    }

    #[test]
    fn test_anchor_link() {
        assert_eq!(convert("[[ns:page#setup]]"), "[[page#setup]]");
        assert_eq!(
            convert("[[ns:page#setup|Setup]]"),
            "[[page#setup|Setup]]"
        );
    }

    #[test]
    fn test_external_link() {
        assert_eq!(
            convert("[[https://example.com|Example]]"),
            "[Example](https://example.com)"
        );
        assert_eq!(
            convert("[[http://example.com]]"),
            "[http://example.com](http://example.com)"
        );
    }

    #[test]
    fn test_adjacent_links() {
        assert_eq!(convert("[[a:x]][[b:y]]"), "[[x]][[y]]");
    }

    #[test]
    fn test_link_in_table_row_escapes_separator() {
        assert_eq!(
            convert("| [[ns:guide\\|The Guide]] | ok |"),
            "| [[guide\\|The Guide]] | ok |"
        );
        assert_eq!(
            convert("| [[https://example.com\\|Example]] |"),
            "| [Example](https://example.com) |"
        );
    }

    #[test]
    fn test_embed_left_alone() {
        assert_eq!(convert("![[image.png | 300]]"), "![[image.png | 300]]");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.com"));
        assert!(!is_external("wiki:page"));
    }
}
