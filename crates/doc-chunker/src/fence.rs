//! Fenced code block extraction.
//!
//! Partitions a document into plain-text segments and fenced code segments.
//! Together the two lists cover the whole document without gaps or overlap.

use once_cell::sync::Lazy;
use regex::Regex;

/// Language reported for fences without a tag
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

const FENCE: &str = "```";

// Opening marker, optional language tag, optional trailing blanks, newline,
// then the shortest body up to the next closing marker.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([^\s`]*)[ \t]*\r?\n(.*?)```").expect("fence pattern is a valid regex")
});

/// Plain text between fences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment<'a> {
    pub text: &'a str,
    /// Byte offset of `text` in the document
    pub start: usize,
}

impl TextSegment<'_> {
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// A complete fenced code block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSegment<'a> {
    /// Language tag as written after the opening marker, if any
    pub tag: Option<&'a str>,
    /// Trimmed code body
    pub body: &'a str,
    /// Byte offset of `body` in the document
    pub body_start: usize,
    /// Byte offset of the opening marker
    pub start: usize,
    /// Byte offset just past the closing marker
    pub end: usize,
}

impl<'a> CodeSegment<'a> {
    /// Language identifier, `"text"` when the fence is untagged
    #[must_use]
    pub fn language(&self) -> &'a str {
        self.tag.unwrap_or(DEFAULT_CODE_LANGUAGE)
    }

    /// Rebuild the fence around the whole body
    #[must_use]
    pub fn fence(&self) -> String {
        self.fence_around(self.body)
    }

    /// Wrap part of the body in this block's fence
    #[must_use]
    pub fn fence_around(&self, body: &str) -> String {
        format!("{FENCE}{}\n{body}\n{FENCE}", self.tag.unwrap_or_default())
    }
}

/// Ordered text and code segments of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments<'a> {
    pub text: Vec<TextSegment<'a>>,
    pub code: Vec<CodeSegment<'a>>,
}

impl Segments<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.code.is_empty()
    }
}

/// Split a document into text and fenced code segments
///
/// Unterminated fences are left inside the surrounding text. Empty gaps
/// (adjacent fences, fence at the very start or end) produce no text segment.
#[must_use]
pub fn extract_segments(content: &str) -> Segments<'_> {
    let mut segments = Segments::default();
    let mut cursor = 0;

    for caps in FENCE_RE.captures_iter(content) {
        let (Some(whole), Some(raw_body)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        push_text(&mut segments, content, cursor, whole.start());

        let tag = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|tag| !tag.is_empty());
        let raw = raw_body.as_str();
        let leading = raw.len() - raw.trim_start().len();

        segments.code.push(CodeSegment {
            tag,
            body: raw.trim(),
            body_start: raw_body.start() + leading,
            start: whole.start(),
            end: whole.end(),
        });
        cursor = whole.end();
    }

    push_text(&mut segments, content, cursor, content.len());

    log::trace!(
        "extracted {} text / {} code segments",
        segments.text.len(),
        segments.code.len()
    );
    segments
}

fn push_text<'a>(segments: &mut Segments<'a>, content: &'a str, start: usize, end: usize) {
    if start < end {
        segments.text.push(TextSegment {
            text: &content[start..end],
            start,
        });
    }
}
