//! DokuWiki plugin syntax.
//!
//! Runs before the other line rules so that `{{plugin>…}}` constructs are
//! consumed before the media rule sees them. Wrap bodies are only marked
//! here; [`quote_wraps`] turns them into callouts once the other rules have
//! seen the unquoted lines.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::blocks::callout;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{tag>(.*?)\}\}").unwrap());

static TAG_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|(\S+)"#).unwrap());

static RADAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<radar[^>]*>(.*?)</radar>").unwrap());

static DRAWIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{drawio>([^}]*)\}\}").unwrap());

static INDEXMENU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{indexmenu>[^|}]+(?:\|[^}]+)?\}\}").unwrap());

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(?:page|section)>([^|}]+)(?:\|[^}]+)?\}\}").unwrap()
});

static WRAP_NOPRINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<WRAP[^>]*\bnoprint\b[^>]*>(.*?)</WRAP>").unwrap()
});

static WRAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:WRAP|wrap|div|block)(?:[ \t][^>]*)?>(.*?)</(?:WRAP|wrap|div|block)>")
        .unwrap()
});

static WRAP_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:WRAP|wrap)(?:[ \t][^>]*)?>").unwrap());

static WRAP_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</(?:WRAP|wrap)[^>]*>").unwrap());

static FONT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<font[^>]*>(.*?)</font>").unwrap());

static WRAP_MARKED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\x02(.*?)\x03").unwrap());

static MACRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(?:NOTOC|NOCACHE)~~").unwrap());

/// Callout header used for converted wraps.
const WRAP_CALLOUT: &str = "[!tip | cc-nt]";

/// Markers around a wrap body between [`convert`] and [`quote_wraps`].
const WRAP_START: char = '\u{2}';
const WRAP_END: char = '\u{3}';

pub(crate) fn convert(content: &str, image_width: u32) -> String {
    let content = TAG_RE.replace_all(content, |caps: &Captures<'_>| tags(&caps[1]));
    let content = RADAR_RE.replace_all(
        &content,
        "```comment\nRadar chart not supported in Obsidian:\n${1}\n```",
    );
    let content = DRAWIO_RE.replace_all(&content, |caps: &Captures<'_>| {
        format!("![[{} | {image_width}]]", last_segment(&caps[1]))
    });
    let content = INDEXMENU_RE.replace_all(&content, "");
    let content = INCLUDE_RE.replace_all(&content, |caps: &Captures<'_>| {
        format!("![[{}]]", last_segment(&caps[1]))
    });
    let content = WRAP_NOPRINT_RE.replace_all(&content, "${1}");
    let content = WRAP_RE.replace_all(&content, |caps: &Captures<'_>| {
        let body = caps[1].trim();
        if body.is_empty() {
            String::new()
        } else {
            format!("{WRAP_START}\n{body}\n{WRAP_END}")
        }
    });
    let content = WRAP_OPEN_RE.replace_all(&content, "");
    let content = WRAP_CLOSE_RE.replace_all(&content, "");
    let content = FONT_RE.replace_all(&content, "==${1}==");
    MACRO_RE.replace_all(&content, "").into_owned()
}

/// Quote every wrap body marked by [`convert`] as a callout.
pub(crate) fn quote_wraps(content: &str) -> String {
    if !content.contains(WRAP_START) {
        return content.to_owned();
    }
    WRAP_MARKED_RE
        .replace_all(content, |caps: &Captures<'_>| callout(WRAP_CALLOUT, caps[1].trim()))
        .into_owned()
}

/// `a "b c" d-e` → `#a #b_c #d_e`
fn tags(list: &str) -> String {
    TAG_WORD_RE
        .captures_iter(list)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|tag| format!("#{}", tag.as_str().replace([' ', '-'], "_")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn last_segment(path: &str) -> &str {
    let path = path.trim();
    path.rsplit(':').next().unwrap_or(path)
}
