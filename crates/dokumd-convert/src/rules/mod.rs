//! Line-level substitution rules.
//!
//! The rules run on text whose special blocks have already been replaced by
//! tokens, so none of them can reach inside a code or diagram block.

mod formatting;
mod links;
mod media;
mod plugins;
pub(crate) mod tables;

/// Default width for embedded images without an explicit size.
pub const DEFAULT_IMAGE_WIDTH: u32 = 300;

/// Applies the line rules in a fixed order: plugins, formatting, tables,
/// links, media. Wrap callouts are quoted last so their bodies go through
/// every rule.
#[derive(Clone, Copy, Debug)]
pub struct LineConverter {
    image_width: u32,
}

impl LineConverter {
    /// Create a line converter embedding images at `image_width` by default.
    #[must_use]
    pub fn new(image_width: u32) -> Self {
        Self { image_width }
    }

    /// Apply every rule to `content`.
    #[must_use]
    pub fn convert(&self, content: &str) -> String {
        let content = plugins::convert(content, self.image_width);
        let content = formatting::convert(&content);
        let content = tables::convert(&content);
        let content = links::convert(&content);
        let content = media::convert(&content, self.image_width);
        plugins::quote_wraps(&content)
    }
}

impl Default for LineConverter {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WIDTH)
    }
}
