use context_doc_chunker::{
    split_code, split_text, ChunkOrdering, ChunkType, Chunker, ChunkerConfig, Document,
};
use pretty_assertions::assert_eq;

const HANDBOOK: &str = r#"# Handbook

Welcome to the handbook. It explains how the service is deployed and operated.

## Installation

Download the release archive and unpack it somewhere on your PATH. The binary
is self-contained and needs no runtime.

```bash
curl -LO https://example.invalid/release.tar.gz
tar xzf release.tar.gz
```

## Configuration

Settings live in a TOML file. Every key has a default, so an empty file is valid.

### Logging

Set `RUST_LOG=debug` to see every request. Logs go to stderr.

```toml
[server]
port = 8080
```

#### Rotation

Rotation is left to the host. Use logrotate or journald.
"#;

fn chunker(size: usize, overlap: usize) -> Chunker {
    Chunker::new(ChunkerConfig::new(size, overlap))
}

#[test]
fn every_chunk_is_non_empty_and_text_chunks_fit() {
    for (size, overlap) in [(40, 0), (60, 15), (120, 30), (500, 100)] {
        let chunks = chunker(size, overlap).chunk_str("handbook", HANDBOOK);
        assert!(!chunks.is_empty());

        for chunk in &chunks {
            assert!(!chunk.content.trim().is_empty());
            assert!(chunk.start_offset <= chunk.end_offset);
            if chunk.chunk_type() == ChunkType::Text {
                assert!(
                    chunk.char_len() <= size,
                    "size {size}: {:?} has {} chars",
                    chunk.content,
                    chunk.char_len()
                );
            }
        }
    }
}

#[test]
fn fitting_text_is_a_single_trimmed_chunk() {
    let text = "\n  A short note about nothing in particular.  \n";
    assert_eq!(
        split_text(text, &ChunkerConfig::new(100, 10)),
        vec!["A short note about nothing in particular."]
    );
}

#[test]
fn single_small_fence_reconstructs_exactly() {
    let fence = "```python\ndef add(a, b):\n    return a + b\n```";
    let chunks = chunker(40, 5).chunk_str("snippet", fence);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_type(), ChunkType::Code);
    assert_eq!(chunks[0].content, fence);
    assert_eq!(chunks[0].id, "snippet-code-0");
    assert_eq!(chunks[0].metadata.code_language.as_deref(), Some("python"));
    assert_eq!((chunks[0].start_offset, chunks[0].end_offset), (0, fence.len()));
}

#[test]
fn documents_without_fences_only_yield_text_chunks() {
    let text = HANDBOOK.replace("```", "");
    let chunks = chunker(80, 10).chunk_str("plain", &text);
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chunk_type() == ChunkType::Text));
    assert!(chunks.iter().all(|c| c.metadata.code_language.is_none()));
}

#[test]
fn paragraph_split_example() {
    assert_eq!(
        split_text("para one.\n\npara two.", &ChunkerConfig::new(11, 0)),
        vec!["para one.", "para two."]
    );
}

#[test]
fn ten_line_code_block_splits_with_line_overlap() {
    let lines: Vec<String> = (0..10).map(|i| format!("{i}").repeat(50)).collect();
    let body = lines.join("\n");
    let slices = split_code(&body, &ChunkerConfig::new(120, 0));

    assert!(slices.len() > 1);
    for slice in &slices {
        assert!(slice.text.chars().count() <= 120);
    }
    for pair in slices.windows(2) {
        let prev: Vec<&str> = pair[0].text.split('\n').collect();
        let next: Vec<&str> = pair[1].text.split('\n').collect();
        let shared = prev.len().min(3).min(next.len());
        let matched = (1..=shared)
            .rev()
            .find(|&n| next[..n] == prev[prev.len() - n..])
            .unwrap_or(0);
        assert!(matched >= 1, "{prev:?} / {next:?}");
    }
}

#[test]
fn rechunking_is_deterministic() {
    let doc = Document::new("handbook", HANDBOOK).with_metadata("category", "ops");
    let config = ChunkerConfig::new(90, 20);
    let first = Chunker::new(config.clone()).chunk_document(&doc);
    let second = Chunker::new(config).chunk_document(&doc);
    assert_eq!(first, second);
}

#[test]
fn unbroken_string_hard_splits_and_terminates() {
    let size = 37;
    let text = "q".repeat(size * 10);
    let chunks = chunker(size, 9).chunk_str("blob", &text);

    assert!(chunks.len() >= 10);
    assert!(chunks.iter().all(|c| c.char_len() <= size));
    assert_eq!(chunks.last().map(|c| c.end_offset), Some(text.len()));
}

#[test]
fn text_chunks_precede_code_chunks_by_default() {
    let chunks = chunker(120, 20).chunk_str("handbook", HANDBOOK);
    let first_code = chunks
        .iter()
        .position(|c| c.chunk_type() == ChunkType::Code)
        .unwrap();

    assert!(chunks[first_code..]
        .iter()
        .all(|c| c.chunk_type() == ChunkType::Code));
    assert!(chunks[..first_code]
        .iter()
        .all(|c| c.id.starts_with("handbook-chunk-")));
    assert_eq!(chunks[first_code].id, format!("handbook-code-{first_code}"));
}

#[test]
fn document_ordering_follows_start_offsets() {
    let config = ChunkerConfig::new(120, 20).ordering(ChunkOrdering::Document);
    let chunks = Chunker::new(config).chunk_str("handbook", HANDBOOK);

    assert!(chunks
        .windows(2)
        .all(|w| w[0].start_offset <= w[1].start_offset));
    for (idx, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.metadata.chunk_index, idx);
        assert!(chunk.id.ends_with(&format!("-{idx}")));
    }
}

#[test]
fn text_offsets_slice_the_original_document() {
    let chunks = chunker(70, 15).chunk_str("handbook", HANDBOOK);
    for chunk in chunks.iter().filter(|c| c.chunk_type() == ChunkType::Text) {
        assert_eq!(&HANDBOOK[chunk.start_offset..chunk.end_offset], chunk.content);
    }
}

#[test]
fn overlap_is_duplicated_suffix_of_previous_chunk() {
    let text = "one two three four five six seven eight nine ten eleven twelve thirteen";
    let chunks = chunker(24, 10).chunk_str("words", text);
    assert!(chunks.len() > 2);

    for pair in chunks.windows(2) {
        // overlap means the next chunk starts before the previous one ends
        assert!(pair[1].start_offset < pair[0].end_offset);
        let shared = &text[pair[1].start_offset..pair[0].end_offset];
        assert!(pair[0].content.ends_with(shared));
        assert!(pair[1].content.starts_with(shared));
    }
}

#[test]
fn unterminated_fence_is_plain_text() {
    let doc = "Intro text.\n\n```rust\nfn never_closed() {\n";
    let chunks = chunker(200, 0).chunk_str("broken", doc);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_type(), ChunkType::Text);
    assert_eq!(chunks[0].content, doc.trim());
}
