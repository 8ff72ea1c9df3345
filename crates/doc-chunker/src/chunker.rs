use crate::code_splitter::split_code;
use crate::config::{ChunkOrdering, ChunkerConfig};
use crate::error::Result;
use crate::fence::{extract_segments, CodeSegment, TextSegment};
use crate::splitter::{char_len, TextSplitter};
use crate::types::{chunk_id, Chunk, ChunkMetadata, ChunkType, Document};
use std::ops::Range;
use std::path::Path;

/// Main chunker interface for processing documents
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

/// A chunk before identifiers and metadata are assigned
struct Draft<'a> {
    chunk_type: ChunkType,
    content: String,
    /// Byte range in the document text
    span: Range<usize>,
    language: Option<&'a str>,
}

impl Chunker {
    /// Create a new chunker with configuration
    ///
    /// The configuration is used as given; see [`ChunkerConfig::validate`].
    #[must_use]
    pub const fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Chunk a document into text and code chunks
    #[must_use]
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        let content = document.content.as_str();
        let segments = extract_segments(content);

        let mut drafts = Vec::new();
        for segment in &segments.text {
            self.draft_text(segment, &mut drafts);
        }
        for segment in &segments.code {
            self.draft_code(segment, &mut drafts);
        }

        if self.config.ordering == ChunkOrdering::Document {
            drafts.sort_by_key(|draft| draft.span.start);
        }

        let offsets = CharOffsets::new(content);
        let chunks: Vec<Chunk> = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let metadata = match draft.chunk_type {
                    ChunkType::Text => ChunkMetadata::text(&document.metadata, index),
                    ChunkType::Code => ChunkMetadata::code(
                        &document.metadata,
                        index,
                        draft.language.unwrap_or(crate::fence::DEFAULT_CODE_LANGUAGE),
                    ),
                };
                Chunk {
                    id: chunk_id(&document.id, draft.chunk_type, index),
                    document_id: document.id.clone(),
                    content: draft.content,
                    start_offset: offsets.char_offset(draft.span.start),
                    end_offset: offsets.char_offset(draft.span.end),
                    metadata,
                }
            })
            .collect();

        log::debug!(
            "chunked document {}: {} text / {} code segments -> {} chunks",
            document.id,
            segments.text.len(),
            segments.code.len(),
            chunks.len()
        );
        chunks
    }

    /// Chunk a string under the given document id, with no metadata
    #[must_use]
    pub fn chunk_str(&self, document_id: &str, content: &str) -> Vec<Chunk> {
        self.chunk_document(&Document::new(document_id, content))
    }

    /// Chunk a file, using its path as the document id
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let id = path.to_string_lossy().replace('\\', "/");
        Ok(self.chunk_document(&Document::new(id, content)))
    }

    fn draft_text<'a>(&self, segment: &TextSegment<'a>, drafts: &mut Vec<Draft<'a>>) {
        let splitter = TextSplitter::new(&self.config);
        for span in splitter.split_spans(segment.text) {
            drafts.push(Draft {
                chunk_type: ChunkType::Text,
                content: segment.text[span.clone()].to_string(),
                span: segment.start + span.start..segment.start + span.end,
                language: None,
            });
        }
    }

    fn draft_code<'a>(&self, segment: &CodeSegment<'a>, drafts: &mut Vec<Draft<'a>>) {
        let language = Some(segment.language());

        if char_len(segment.body) <= self.config.code_split_threshold() {
            drafts.push(Draft {
                chunk_type: ChunkType::Code,
                content: segment.fence(),
                span: segment.start..segment.end,
                language,
            });
            return;
        }

        log::trace!(
            "splitting {} code block of {} chars by line",
            segment.language(),
            char_len(segment.body)
        );
        for slice in split_code(segment.body, &self.config) {
            drafts.push(Draft {
                chunk_type: ChunkType::Code,
                content: segment.fence_around(slice.text),
                span: segment.body_start + slice.span.start..segment.body_start + slice.span.end,
                language,
            });
        }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        let lengths: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
        let total_chars: usize = lengths.iter().sum();

        ChunkingStats {
            total_chunks: chunks.len(),
            text_chunks: chunks
                .iter()
                .filter(|c| c.chunk_type() == ChunkType::Text)
                .count(),
            code_chunks: chunks
                .iter()
                .filter(|c| c.chunk_type() == ChunkType::Code)
                .count(),
            total_chars,
            avg_chars_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_chars / chunks.len()
            },
            min_chars: lengths.iter().copied().min().unwrap_or(0),
            max_chars: lengths.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub text_chunks: usize,
    pub code_chunks: usize,
    pub total_chars: usize,
    pub avg_chars_per_chunk: usize,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl ChunkingStats {
    /// Fold another run into this one (averages are recomputed)
    pub fn merge(&mut self, other: &Self) {
        let was_empty = self.total_chunks == 0;
        self.total_chunks += other.total_chunks;
        self.text_chunks += other.text_chunks;
        self.code_chunks += other.code_chunks;
        self.total_chars += other.total_chars;
        self.avg_chars_per_chunk = if self.total_chunks == 0 {
            0
        } else {
            self.total_chars / self.total_chunks
        };
        if other.total_chunks > 0 {
            self.min_chars = if was_empty {
                other.min_chars
            } else {
                self.min_chars.min(other.min_chars)
            };
            self.max_chars = self.max_chars.max(other.max_chars);
        }
    }
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} (text {}, code {}) | Chars: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.text_chunks,
            self.code_chunks,
            self.total_chars,
            self.avg_chars_per_chunk,
            self.min_chars,
            self.max_chars
        )
    }
}

/// Byte offset to character offset mapping for one document
struct CharOffsets {
    /// Byte offsets of every char boundary; empty for ASCII text
    boundaries: Vec<usize>,
    len: usize,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        let boundaries = if text.is_ascii() {
            Vec::new()
        } else {
            text.char_indices().map(|(idx, _)| idx).collect()
        };
        Self {
            boundaries,
            len: text.len(),
        }
    }

    fn char_offset(&self, byte: usize) -> usize {
        if self.boundaries.is_empty() {
            return byte.min(self.len);
        }
        self.boundaries.partition_point(|&b| b < byte)
    }
}
