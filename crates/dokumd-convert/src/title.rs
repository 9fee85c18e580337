//! Page titles and filesystem-safe names.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"======[ \t]+(.+?)[ \t]+======").unwrap());

/// Characters rejected by at least one supported filesystem.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Names Windows refuses regardless of extension.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Maximum filename length in bytes.
const MAX_FILENAME_LEN: usize = 255;

/// Bytes a page name leaves free for `.md` and a `-N` collision suffix.
const PAGE_NAME_RESERVE: usize = ".md".len() + 8;

/// Text of the first level-1 heading (`====== Title ======`), if any.
///
/// # Example
///
/// ```
/// use dokumd_convert::extract_title;
///
/// assert_eq!(extract_title("====== Setup ======\ntext"), Some("Setup"));
/// assert_eq!(extract_title("no heading"), None);
/// ```
#[must_use]
pub fn extract_title(content: &str) -> Option<&str> {
    TITLE_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Make `name` safe to use as a file or directory name on any OS.
///
/// Forbidden characters become `-`, trailing dots and spaces are dropped,
/// reserved Windows names get a `_` prefix, and empty results become
/// `untitled`. Overlong names are truncated, keeping the extension.
///
/// # Example
///
/// ```
/// use dokumd_convert::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What? Why: How"), "What- Why- How");
/// assert_eq!(sanitize_filename("con"), "_con");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    sanitize(name, MAX_FILENAME_LEN)
}

/// Like [`sanitize_filename`], for a page saved as `<name>.md`.
///
/// The result is short enough that appending `.md`, or a `-N` suffix and
/// `.md`, still fits the filesystem's name limit.
///
/// # Example
///
/// ```
/// use dokumd_convert::sanitize_page_name;
///
/// let name = sanitize_page_name(&"a".repeat(300));
/// assert!(format!("{name}-2.md").len() <= 255);
/// ```
#[must_use]
pub fn sanitize_page_name(name: &str) -> String {
    sanitize(name, MAX_FILENAME_LEN - PAGE_NAME_RESERVE)
}

fn sanitize(name: &str, max_len: usize) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '-' } else { c })
        .collect();
    let mut clean = replaced.trim().trim_end_matches(['.', ' ']).to_owned();

    if RESERVED_NAMES
        .iter()
        .any(|reserved| clean.eq_ignore_ascii_case(reserved))
    {
        clean.insert(0, '_');
    }

    if clean.trim_matches(['-', '.', ' ']).is_empty() {
        return "untitled".to_owned();
    }

    truncate_filename(clean, max_len)
}

fn truncate_filename(name: String, max_len: usize) -> String {
    if name.len() <= max_len {
        return name;
    }
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < max_len / 2 => (stem, Some(ext)),
        _ => (name.as_str(), None),
    };
    let budget = extension.map_or(max_len, |ext| max_len - ext.len() - 1);
    let stem = floor_char_boundary(stem, budget);
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_owned(),
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn floor_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
