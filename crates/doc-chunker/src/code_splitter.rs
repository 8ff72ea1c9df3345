//! Line-based splitting of oversized code blocks.

use crate::config::ChunkerConfig;
use crate::splitter::char_len;
use std::ops::Range;

/// A run of whole lines from a code body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSlice<'a> {
    /// Lines joined with `\n`, exactly as they appear in the body
    pub text: &'a str,
    /// Byte range of `text` in the body
    pub span: Range<usize>,
    /// Zero-based index of the first line in the body
    pub first_line: usize,
    /// Number of lines in the slice
    pub line_count: usize,
}

/// Split a code body into line runs of at most `chunk_size` characters
///
/// Bodies up to `code_split_threshold()` characters come back whole. Larger
/// bodies are packed line by line (one newline counted per line); each new
/// slice starts with up to `code_overlap_lines` trailing lines of the previous
/// one, dropping the oldest of those when they would not fit. A single line
/// longer than `chunk_size` becomes its own slice.
#[must_use]
pub fn split_code<'a>(body: &'a str, config: &ChunkerConfig) -> Vec<CodeSlice<'a>> {
    let lines = line_spans(body);

    if char_len(body) <= config.code_split_threshold() {
        return vec![slice(body, &lines, 0..lines.len())];
    }

    // costs[i] = characters in lines[..i], newline included per line
    let mut costs = Vec::with_capacity(lines.len() + 1);
    costs.push(0);
    for line in &lines {
        let last = costs[costs.len() - 1];
        costs.push(last + char_len(&body[line.clone()]) + 1);
    }
    let cost = |window: &Range<usize>| costs[window.end] - costs[window.start];

    let limit = config.chunk_size;
    let mut out = Vec::new();
    let mut window = 0..0;

    for idx in 0..lines.len() {
        let line_cost = costs[idx + 1] - costs[idx];

        if !window.is_empty() && cost(&window) + line_cost > limit {
            out.push(slice(body, &lines, window.clone()));

            let keep = config.code_overlap_lines.min(window.len());
            let mut seed = window.end - keep..window.end;
            while !seed.is_empty() && cost(&seed) + line_cost > limit {
                seed.start += 1;
            }
            window = seed;
        }

        if window.is_empty() {
            window = idx..idx;
        }
        window.end = idx + 1;
    }

    if !window.is_empty() {
        out.push(slice(body, &lines, window));
    }

    out.retain(|s| !s.text.trim().is_empty());
    log::trace!("split {} code lines into {} slices", lines.len(), out.len());
    out
}

fn line_spans(body: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    for line in body.split('\n') {
        spans.push(start..start + line.len());
        start += line.len() + 1;
    }
    spans
}

fn slice<'a>(body: &'a str, lines: &[Range<usize>], window: Range<usize>) -> CodeSlice<'a> {
    let last = window.end.checked_sub(1).and_then(|i| lines.get(i));
    let span = match (lines.get(window.start), last) {
        (Some(first), Some(last)) if !window.is_empty() => first.start..last.end,
        _ => 0..0,
    };

    CodeSlice {
        text: &body[span.clone()],
        span,
        first_line: window.start,
        line_count: window.len(),
    }
}
