//! # Context Doc Chunker
//!
//! Fence-aware chunking of Markdown documentation for search indexing.
//!
//! ## Philosophy
//!
//! The chunker produces bounded, overlapping fragments that:
//! - Break at the most meaningful boundary available (headers, paragraphs, lines, sentences, words)
//! - Keep fenced code blocks intact, splitting only very large ones and only between lines
//! - Map back to exact character offsets in the source document
//! - Repeat a little trailing context at each boundary
//!
//! ## Architecture
//!
//! ```text
//! Document
//!     │
//!     ├──> Fence Extraction → text segments + code segments
//!     │
//!     ├──> Text segments
//!     │    └─> Recursive splitting over the separator priority list
//!     │        └─> Hard positional split when no separator is left
//!     │
//!     ├──> Code segments
//!     │    ├─> Kept whole (≤ code_split_factor × chunk_size)
//!     │    └─> Split by line with trailing-line overlap
//!     │
//!     └──> Assembly
//!          ├─> Text chunks first, then code chunks (or document order)
//!          ├─> Sequential ids, merged metadata
//!          └─> Emit Chunk[] with character offsets
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_doc_chunker::{ChunkType, Chunker, ChunkerConfig, Document};
//!
//! let doc = Document::new("intro", "Install it first.\n\n```sh\ncargo install demo\n```")
//!     .with_metadata("category", "guide");
//!
//! let chunker = Chunker::new(ChunkerConfig::new(200, 20));
//! let chunks = chunker.chunk_document(&doc);
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].id, "intro-chunk-0");
//! assert_eq!(chunks[1].id, "intro-code-1");
//! assert_eq!(chunks[1].chunk_type(), ChunkType::Code);
//! assert_eq!(chunks[1].content, "```sh\ncargo install demo\n```");
//! ```

mod chunker;
mod code_splitter;
mod config;
mod error;
mod fence;
mod splitter;
mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use code_splitter::{split_code, CodeSlice};
pub use config::{ChunkOrdering, ChunkerConfig};
pub use error::{ChunkerError, Result};
pub use fence::{extract_segments, CodeSegment, Segments, TextSegment, DEFAULT_CODE_LANGUAGE};
pub use splitter::{
    split_text, split_text_spans, Placement, Separator, TextSplitter, DEFAULT_SEPARATORS,
};
pub use types::{
    chunk_id, Chunk, ChunkMetadata, ChunkType, Document, Metadata, MetadataValue,
    RESERVED_METADATA_KEYS,
};
