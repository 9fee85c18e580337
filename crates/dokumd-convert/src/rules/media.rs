//! Media embeds.
//!
//! `{{ns:file.png?200|caption}}` becomes `![[file.png | 200]]`. Images
//! without an explicit width get the configured default width. On a table
//! row the width separator is written as `\|`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::links::is_external;
use super::tables::in_table_row;

/// Target, then optional caption after a plain or table-escaped `|`.
static MEDIA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}|]+?)\\?(?:\|([^}]*))?\}\}").unwrap());

/// Extensions embedded with a width.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg", "gif"];

pub(crate) fn convert(content: &str, default_width: u32) -> String {
    MEDIA_RE
        .replace_all(content, |caps: &Captures<'_>| {
            let target = caps[1].trim();
            // Unconverted plugin syntax such as {{foo>bar}}
            if target.contains('>') {
                return caps[0].to_owned();
            }
            let caption = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty());
            let start = caps.get(0).map_or(0, |m| m.start());
            let separator = if in_table_row(content, start) { "\\|" } else { "|" };
            convert_media(target, caption, default_width, separator)
        })
        .into_owned()
}

fn convert_media(
    target: &str,
    caption: Option<&str>,
    default_width: u32,
    separator: &str,
) -> String {
    let (path, options) = target.split_once('?').unwrap_or((target, ""));

    if is_external(path) {
        return if is_image(path) {
            format!("![{}]({path})", caption.unwrap_or_default())
        } else {
            format!("[{}]({path})", caption.unwrap_or(path))
        };
    }

    let name = path.rsplit(':').next().unwrap_or(path);
    if is_image(name) {
        let width = requested_width(options).unwrap_or(default_width);
        format!("![[{name} {separator} {width}]]")
    } else {
        format!("![[{name}]]")
    }
}

fn is_image(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Width from DokuWiki media options (`200`, `200x100`, `nolink&200`).
fn requested_width(options: &str) -> Option<u32> {
    options.split('&').find_map(|option| {
        let digits: String = option.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok().filter(|w| *w > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_gets_default_width() {
        assert_eq!(convert("{{wiki:logo.png}}", 300), "![[logo.png | 300]]");
    }

    #[test]
    fn test_image_with_requested_width() {
        assert_eq!(convert("{{ns:photo.JPG?200x100}}", 300), "![[photo.JPG | 200]]");
        assert_eq!(convert("{{ns:photo.jpg?nolink&150}}", 300), "![[photo.jpg | 150]]");
    }

    #[test]
    fn test_alignment_spaces_and_caption_ignored() {
        assert_eq!(
            convert("{{ ns:diagram.svg |Architecture}}", 640),
            "![[diagram.svg | 640]]"
        );
    }

    #[test]
    fn test_non_image_file() {
        assert_eq!(convert("{{docs:manual.pdf}}", 300), "![[manual.pdf]]");
    }

    #[test]
    fn test_non_numeric_options_fall_back_to_default() {
        assert_eq!(convert("{{a.gif?direct}}", 300), "![[a.gif | 300]]");
    }

    #[test]
    fn test_external_image() {
        assert_eq!(
            convert("{{https://example.com/a.png|Logo}}", 300),
            "![Logo](https://example.com/a.png)"
        );
    }

    #[test]
    fn test_external_file() {
        assert_eq!(
            convert("{{https://example.com/a.pdf}}", 300),
            "[https://example.com/a.pdf](https://example.com/a.pdf)"
        );
    }

    #[test]
    fn test_image_in_table_row_escapes_separator() {
        assert_eq!(
            convert("| {{ns:a.png?200\\|cap}} | {{b.png}} |", 300),
            "| ![[a.png \\| 200]] | ![[b.png \\| 300]] |"
        );
    }

    #[test]
    fn test_unknown_plugin_left_alone() {
        assert_eq!(convert("{{gallery>ns:photos}}", 300), "{{gallery>ns:photos}}");
    }
}
