//! DokuWiki to Obsidian markdown conversion engine.
//!
//! Conversion runs in three passes over one page:
//!
//! 1. [`preserve`] replaces special blocks (code, notes, mermaid and UML
//!    diagrams) with opaque tokens.
//! 2. [`LineConverter`] rewrites headings, emphasis, lists, tables, links,
//!    media and plugin syntax on the token-replaced text.
//! 3. [`restore`] converts each preserved block and puts it back in place of
//!    its token.
//!
//! Because the block table is returned from [`preserve`] rather than stored,
//! a [`Converter`] can be shared across threads.
//!
//! # Example
//!
//! ```
//! use dokumd_convert::Converter;
//!
//! let converter = Converter::default();
//! let markdown = converter.convert("====== Hello ======\n<note>Read me</note>");
//! assert_eq!(markdown, "# Hello\n\n> [!NOTE]\n> Read me");
//! ```

mod blocks;
mod rules;
mod title;

pub use blocks::{BlockKind, Preserved, PreservedBlock, PreservedBlocks, preserve, restore};
pub use rules::{DEFAULT_IMAGE_WIDTH, LineConverter};
pub use title::{extract_title, sanitize_filename, sanitize_page_name};

/// Options for page conversion.
#[derive(Clone, Copy, Debug)]
pub struct ConvertOptions {
    /// Width for embedded images that do not request one.
    pub default_image_width: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_image_width: DEFAULT_IMAGE_WIDTH,
        }
    }
}

/// Converts whole DokuWiki pages to Obsidian markdown.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    lines: LineConverter,
}

impl Converter {
    /// Create a converter with the given options.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            lines: LineConverter::new(options.default_image_width),
        }
    }

    /// Convert one page.
    ///
    /// Line endings are normalized to `\n` and the result is trimmed.
    #[must_use]
    pub fn convert(&self, content: &str) -> String {
        let content = content.replace("\r\n", "\n");
        let content = rules::tables::inline_code_in_rows(&content);
        let preserved = preserve(&content);
        let converted = self.lines.convert(&preserved.text);
        restore(&converted, &preserved.blocks).trim().to_owned()
    }
}
