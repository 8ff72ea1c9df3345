//! Recursive text splitting.
//!
//! Text is split on the most semantic separator it contains, parts are packed
//! greedily into chunks no longer than `chunk_size` characters, and oversized
//! parts are split again with the remaining, less semantic separators. When no
//! separator is left the text is cut into fixed windows.
//!
//! The splitter works on byte ranges of the input so every chunk maps back to
//! an exact, trimmed slice of the source.

use crate::config::ChunkerConfig;
use std::ops::Range;

/// Where a separator ends up once the text is cut at it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Separator starts the following part (headers, fences, newlines)
    Leading,
    /// Separator ends the preceding part (sentence punctuation)
    Trailing,
}

/// A boundary pattern in the separator priority list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator {
    pub pattern: &'static str,
    pub placement: Placement,
}

impl Separator {
    #[must_use]
    pub const fn leading(pattern: &'static str) -> Self {
        Self {
            pattern,
            placement: Placement::Leading,
        }
    }

    #[must_use]
    pub const fn trailing(pattern: &'static str) -> Self {
        Self {
            pattern,
            placement: Placement::Trailing,
        }
    }

    /// Cut `range` of `text` at every occurrence of the pattern
    ///
    /// Returned parts are contiguous, cover `range` and are never empty.
    fn cut(&self, text: &str, range: Range<usize>) -> Vec<Range<usize>> {
        let slice = &text[range.clone()];
        let shift = match self.placement {
            Placement::Leading => 0,
            Placement::Trailing => self.pattern.len(),
        };

        let mut parts = Vec::new();
        let mut start = range.start;
        for (idx, _) in slice.match_indices(self.pattern) {
            let at = range.start + idx + shift;
            if at > start {
                parts.push(start..at);
                start = at;
            }
        }
        if start < range.end {
            parts.push(start..range.end);
        }
        parts
    }
}

/// Separators from most to least semantic
pub const DEFAULT_SEPARATORS: &[Separator] = &[
    Separator::leading("\n## "),
    Separator::leading("\n### "),
    Separator::leading("\n#### "),
    Separator::leading("\n```"),
    Separator::leading("\n\n"),
    Separator::leading("\n"),
    Separator::trailing(". "),
    Separator::leading(" "),
];

/// Recursive character splitter over a separator priority list
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter<'s> {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &'s [Separator],
}

impl TextSplitter<'static> {
    #[must_use]
    pub fn new(config: &ChunkerConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separators: DEFAULT_SEPARATORS,
        }
    }
}

impl<'s> TextSplitter<'s> {
    /// Replace the separator priority list
    #[must_use]
    pub fn with_separators<'n>(self, separators: &'n [Separator]) -> TextSplitter<'n> {
        TextSplitter {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators,
        }
    }

    /// Split `text` into trimmed, non-empty chunks
    #[must_use]
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.split_spans(text)
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }

    /// Split `text`, returning byte ranges of the trimmed chunks
    #[must_use]
    pub fn split_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        self.split_range(text, 0..text.len(), self.separators, &mut out);
        out
    }

    // Each recursive call drops at least the separator it used, so depth is
    // bounded by the separator list length.
    fn split_range(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[Separator],
        out: &mut Vec<Range<usize>>,
    ) {
        let slice = &text[range.clone()];
        if char_len(slice) <= self.chunk_size {
            push_trimmed(text, range, out);
            return;
        }

        let Some(pos) = separators
            .iter()
            .position(|sep| slice.contains(sep.pattern))
        else {
            log::trace!(
                "no separator left for {} chars, falling back to hard split",
                char_len(slice)
            );
            self.hard_split(text, range, out);
            return;
        };
        let rest = &separators[pos + 1..];

        let mut buffer: Option<Range<usize>> = None;
        let mut buffer_len = 0;

        for part in separators[pos].cut(text, range) {
            let part_len = char_len(&text[part.clone()]);

            match buffer.take() {
                None if part_len > self.chunk_size => {
                    self.split_range(text, part, rest, out);
                }
                None => {
                    buffer = Some(part);
                    buffer_len = part_len;
                }
                Some(buf) if buffer_len + part_len <= self.chunk_size => {
                    buffer = Some(buf.start..part.end);
                    buffer_len += part_len;
                }
                Some(buf) => {
                    let flushed = push_trimmed(text, buf, out);
                    if part_len > self.chunk_size {
                        self.split_range(text, part, rest, out);
                        continue;
                    }

                    // Whitespace trimmed off the flushed chunk still sits
                    // between the overlap and the part, so it counts too.
                    let budget = self.chunk_size - part_len;
                    let start = flushed
                        .and_then(|prev| {
                            let gap = char_len(&text[prev.end..part.start]);
                            self.overlap_start(text, prev, budget.saturating_sub(gap))
                        })
                        .unwrap_or(part.start);
                    buffer_len = char_len(&text[start..part.end]);
                    buffer = Some(start..part.end);
                }
            }
        }

        if let Some(buf) = buffer {
            push_trimmed(text, buf, out);
        }
    }

    /// Cut into `chunk_size` windows, preferring to end a window at a space
    fn hard_split(&self, text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
        let slice = &text[range.clone()];
        let boundaries: Vec<usize> = slice.char_indices().map(|(idx, _)| idx).collect();
        let total = boundaries.len();
        let byte_at = |pos: usize| boundaries.get(pos).copied().unwrap_or(slice.len());
        let size = self.chunk_size.max(1);

        let mut start = 0;
        while start < total {
            let mut end = (start + size).min(total);

            if end < total {
                let window = byte_at(start)..byte_at(end);
                if let Some(space) = slice[window.clone()].rfind(' ') {
                    if space > 0 {
                        let cut = window.start + space;
                        end = boundaries.partition_point(|&b| b < cut);
                    }
                }
            }

            push_trimmed(
                text,
                range.start + byte_at(start)..range.start + byte_at(end),
                out,
            );

            if end >= total {
                break;
            }

            let next = end.saturating_sub(self.chunk_overlap);
            start = if next <= start || next >= end { end } else { next };
        }
    }

    /// Byte offset where the overlap taken from `prev` begins
    ///
    /// Takes at most `min(chunk_overlap, budget)` trailing characters and moves
    /// forward to the next word start when the cut lands inside a word.
    /// `None` when no overlap fits.
    fn overlap_start(&self, text: &str, prev: Range<usize>, budget: usize) -> Option<usize> {
        let limit = self.chunk_overlap.min(budget);
        if limit == 0 {
            return None;
        }

        let slice = &text[prev.clone()];
        let len = char_len(slice);
        if len <= limit {
            return Some(prev.start);
        }

        let tail = slice
            .char_indices()
            .nth(len - limit)
            .map_or(slice.len(), |(idx, _)| idx);

        Some(match slice[tail..].find(' ') {
            Some(space) => prev.start + tail + space + 1,
            None => prev.start + tail,
        })
    }
}

/// Split `text` with the default separators
#[must_use]
pub fn split_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    TextSplitter::new(config)
        .split(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Split `text` with the default separators, returning byte ranges
#[must_use]
pub fn split_text_spans(text: &str, config: &ChunkerConfig) -> Vec<Range<usize>> {
    TextSplitter::new(config).split_spans(text)
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Push the trimmed form of `range`, returning it unless it was blank
fn push_trimmed(
    text: &str,
    range: Range<usize>,
    out: &mut Vec<Range<usize>>,
) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }

    let start = range.start + (slice.len() - slice.trim_start().len());
    let span = start..start + trimmed.len();
    out.push(span.clone());
    Some(span)
}
