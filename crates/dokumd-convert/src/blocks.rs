//! Special block preservation and restoration.
//!
//! Code, note, mermaid and UML blocks are cut out of the document before the
//! line rules run and replaced with random tokens. After the line rules have
//! finished, [`restore`] swaps every token for the block converted to its
//! Obsidian equivalent.
//!
//! Same-kind nesting is not supported: the non-greedy pattern closes a block
//! at the first matching closing tag. Blocks of different kinds may nest when
//! the inner kind is preserved first (a code block inside a note); the outer
//! block is parsed with the inner token still in place, and the token is
//! expanded inside the converted result.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use uuid::Uuid;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code(?:\s[^>]*)?>.*?</code>").unwrap());

static NOTE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<note(?:\s[^>]*)?>.*?</note>").unwrap());

static MERMAID_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<mermaid(?:\s[^>]*)?>.*?</mermaid>").unwrap());

static UML_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<uml(?:\s[^>]*)?>.*?</uml>").unwrap());

/// Language, then ignored attributes such as a download filename.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<code(?:\s+([^\s>]+))?[^>]*>(.*?)</code>").unwrap()
});

static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<note(?:\s+(?i:(tip|important|warning|caution)))?\s*>(.*?)</note>").unwrap()
});

static MERMAID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^<mermaid[^>]*>(.*?)</mermaid>").unwrap());

static UML_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^<uml[^>]*>(.*?)</uml>").unwrap());

/// Kind of special block, in preservation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `<code lang>…</code>`
    Code,
    /// `<note type>…</note>`
    Note,
    /// `<mermaid>…</mermaid>`
    Mermaid,
    /// `<uml>…</uml>`
    Uml,
}

impl BlockKind {
    /// All kinds in the order they are preserved.
    pub const ALL: [Self; 4] = [Self::Code, Self::Note, Self::Mermaid, Self::Uml];

    /// Tag name as written in DokuWiki markup.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Note => "note",
            Self::Mermaid => "mermaid",
            Self::Uml => "uml",
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            Self::Code => "<code",
            Self::Note => "<note",
            Self::Mermaid => "<mermaid",
            Self::Uml => "<uml",
        }
    }

    fn block_pattern(self) -> &'static Regex {
        match self {
            Self::Code => &CODE_BLOCK_RE,
            Self::Note => &NOTE_BLOCK_RE,
            Self::Mermaid => &MERMAID_BLOCK_RE,
            Self::Uml => &UML_BLOCK_RE,
        }
    }

    /// Detect the kind of a stored block from its opening tag.
    fn detect(block: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| block.starts_with(kind.open_tag()))
    }
}

/// One block cut out of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreservedBlock {
    /// Placeholder that stands in for the block in the document text.
    pub token: String,
    /// Kind of block.
    pub kind: BlockKind,
    /// Original matched markup, tags included.
    pub original: String,
}

/// Table of blocks preserved during one conversion, in preservation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreservedBlocks {
    blocks: Vec<PreservedBlock>,
}

impl PreservedBlocks {
    /// Number of preserved blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if nothing was preserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by its token.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&PreservedBlock> {
        self.blocks.iter().find(|b| b.token == token)
    }

    /// Iterate blocks in preservation order.
    pub fn iter(&self) -> impl Iterator<Item = &PreservedBlock> {
        self.blocks.iter()
    }
}

/// Document text with special blocks replaced by tokens, plus the block table.
#[derive(Clone, Debug)]
pub struct Preserved {
    /// Text with every special block replaced by its token.
    pub text: String,
    /// Blocks keyed by token.
    pub blocks: PreservedBlocks,
}

/// Replace every special block in `content` with a fresh token.
///
/// Kinds are processed in [`BlockKind::ALL`] order. Content without special
/// blocks comes back unchanged with an empty table.
///
/// # Example
///
/// ```
/// use dokumd_convert::preserve;
///
/// let preserved = preserve("before\n<code>x</code>\nafter");
/// assert_eq!(preserved.blocks.len(), 1);
/// assert!(!preserved.text.contains("<code>"));
/// ```
#[must_use]
pub fn preserve(content: &str) -> Preserved {
    let mut blocks = Vec::new();
    let mut text = content.to_owned();

    for kind in BlockKind::ALL {
        let pattern = kind.block_pattern();
        if !pattern.is_match(&text) {
            continue;
        }
        text = pattern
            .replace_all(&text, |caps: &Captures<'_>| {
                let token = Uuid::new_v4().to_string();
                blocks.push(PreservedBlock {
                    token: token.clone(),
                    kind,
                    original: caps[0].to_owned(),
                });
                token
            })
            .into_owned();
    }

    if !blocks.is_empty() {
        tracing::debug!(count = blocks.len(), "preserved special blocks");
    }

    Preserved {
        text,
        blocks: PreservedBlocks { blocks },
    }
}

/// Put converted blocks back in place of their tokens.
///
/// Blocks are converted in preservation order. Each block is parsed while
/// nested tokens are still in place, then the tokens of earlier blocks are
/// expanded inside the converted text. A code block nested in a note thus
/// lands inside the callout, whatever its body contains.
///
/// A token that follows a `> ` quote prefix on its line is expanded with
/// that prefix repeated on every line, so blocks stay inside callouts.
#[must_use]
pub fn restore(content: &str, blocks: &PreservedBlocks) -> String {
    let mut converted: Vec<(&str, String)> = Vec::with_capacity(blocks.len());

    for block in &blocks.blocks {
        let text = expand_tokens(&convert_block(&block.original), &converted);
        converted.push((block.token.as_str(), text));
    }

    expand_tokens(content, &converted)
}

fn expand_tokens(text: &str, expansions: &[(&str, String)]) -> String {
    let mut output = text.to_owned();
    for (token, expansion) in expansions {
        if output.contains(token) {
            output = replace_token(&output, token, expansion);
        }
    }
    output
}

fn replace_token(text: &str, token: &str, expansion: &str) -> String {
    let mut output = String::with_capacity(text.len() + expansion.len());
    let mut rest = text;

    while let Some(pos) = rest.find(token) {
        output.push_str(&rest[..pos]);
        let line_start = output.rfind('\n').map_or(0, |i| i + 1);
        let prefix = &output[line_start..];
        if is_quote_prefix(prefix) {
            let continuation = format!("\n{prefix}");
            let quoted = expansion.trim_end_matches('\n').replace('\n', &continuation);
            output.push_str(&quoted);
        } else {
            output.push_str(expansion);
        }
        rest = &rest[pos + token.len()..];
    }

    output.push_str(rest);
    output
}

/// `> `, `> > ` and the like.
fn is_quote_prefix(prefix: &str) -> bool {
    prefix.contains('>') && prefix.chars().all(|c| matches!(c, '>' | ' ' | '\t'))
}

/// Convert one stored block, passing unrecognized markup through unchanged.
fn convert_block(block: &str) -> String {
    let converted = match BlockKind::detect(block) {
        Some(BlockKind::Code) => convert_code(block),
        Some(BlockKind::Note) => convert_note(block),
        Some(BlockKind::Mermaid) => convert_fenced(block, &MERMAID_RE, "mermaid"),
        Some(BlockKind::Uml) => convert_fenced(block, &UML_RE, "plantuml"),
        None => None,
    };
    converted.unwrap_or_else(|| {
        tracing::debug!("unrecognized special block, passing through");
        block.to_owned()
    })
}

fn convert_code(block: &str) -> Option<String> {
    let caps = CODE_RE.captures(block)?;
    let language = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|lang| *lang != "-")
        .unwrap_or_default();
    let body = caps[2].trim();
    Some(format!("\n```{language}\n{body}\n```\n"))
}

fn convert_note(block: &str) -> Option<String> {
    let caps = NOTE_RE.captures(block)?;
    let note_type = caps
        .get(1)
        .map_or_else(|| "NOTE".to_owned(), |m| m.as_str().to_uppercase());
    Some(callout(&format!("[!{note_type}]"), caps[2].trim()))
}

fn convert_fenced(block: &str, pattern: &Regex, fence_tag: &str) -> Option<String> {
    let caps = pattern.captures(block)?;
    let body = caps[1].trim();
    Some(format!("\n```{fence_tag}\n{body}\n```\n"))
}

/// Format an Obsidian callout: a `> header` line, then every body line quoted.
pub(crate) fn callout(header: &str, body: &str) -> String {
    let mut out = String::with_capacity(header.len() + body.len() + 16);
    out.push_str("\n> ");
    out.push_str(header);
    out.push('\n');
    for line in body.split('\n') {
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
