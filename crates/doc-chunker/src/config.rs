use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for document chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters of trailing context repeated at the start of the next chunk
    pub chunk_overlap: usize,

    /// Code bodies longer than `code_split_factor * chunk_size` are split by line
    pub code_split_factor: usize,

    /// Lines of a flushed code sub-chunk re-seeded into the next one
    pub code_overlap_lines: usize,

    /// Emission order of text and code chunks
    pub ordering: ChunkOrdering,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            code_split_factor: 2,
            code_overlap_lines: 3,
            ordering: ChunkOrdering::TextFirst,
        }
    }
}

impl ChunkerConfig {
    /// Create config with explicit size and overlap, other fields default
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        }
    }

    /// Create config optimized for embeddings (smaller, focused chunks)
    #[must_use]
    pub fn for_embeddings() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 64,
            ..Default::default()
        }
    }

    /// Create config optimized for LLM context (larger, comprehensive chunks)
    #[must_use]
    pub fn for_llm_context() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 400,
            ..Default::default()
        }
    }

    /// Builder: set emission order
    #[must_use]
    pub const fn ordering(mut self, ordering: ChunkOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Length above which a code body is split by line
    #[must_use]
    pub const fn code_split_threshold(&self) -> usize {
        self.chunk_size.saturating_mul(self.code_split_factor)
    }

    /// Validate configuration
    ///
    /// The chunker does not call this itself; callers reject bad input first.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.code_split_factor == 0 {
            return Err(ChunkerError::invalid_config(
                "code_split_factor must be > 0",
            ));
        }

        Ok(())
    }
}

/// Order in which chunks of one document are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkOrdering {
    /// All text-derived chunks in segment order, then all code-derived chunks
    #[default]
    TextFirst,

    /// Interleaved by start offset, indexes resequenced after sorting
    Document,
}

impl ChunkOrdering {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextFirst => "text_first",
            Self::Document => "document",
        }
    }
}

impl std::str::FromStr for ChunkOrdering {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "text_first" | "text" => Ok(Self::TextFirst),
            "document" | "doc" => Ok(Self::Document),
            other => Err(ChunkerError::invalid_config(format!(
                "unknown chunk ordering '{other}' (expected text_first|document)"
            ))),
        }
    }
}
