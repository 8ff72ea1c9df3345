use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open mapping of document-level metadata (category, language, tags, ...)
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar or string-array metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Borrow the value as a string, if it is one
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a string list, if it is one
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// A source document handed to the chunker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable document identifier, used as the chunk id prefix
    pub id: String,

    /// Full text (Markdown body with fenced code blocks)
    pub content: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document without metadata
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder: add a metadata entry
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A bounded-size slice of a document, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `<documentId>-chunk-<n>` for text, `<documentId>-code-<n>` for code
    pub id: String,

    /// Owning document
    pub document_id: String,

    /// Chunk text; code chunks carry a reconstructed fence
    pub content: String,

    /// Start character offset in the document text
    pub start_offset: usize,

    /// End character offset in the document text (exclusive)
    pub end_offset: usize,

    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Kind of source segment this chunk came from
    #[must_use]
    pub const fn chunk_type(&self) -> ChunkType {
        self.metadata.chunk_type
    }

    /// Position in the emitted sequence
    #[must_use]
    pub const fn index(&self) -> usize {
        self.metadata.chunk_index
    }

    /// Content length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the chunk covers a document character offset
    #[must_use]
    pub const fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }
}

/// Chunk-level keys that replace same-named document metadata entries
pub const RESERVED_METADATA_KEYS: &[&str] = &["chunkType", "chunkIndex", "codeLanguage"];

/// Per-chunk metadata: the document metadata overlaid with chunk fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Shallow copy of the owning document's metadata, minus reserved keys
    #[serde(flatten)]
    pub document: Metadata,

    pub chunk_type: ChunkType,

    pub chunk_index: usize,

    /// Fence language tag (`"text"` when the fence had none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<String>,
}

impl ChunkMetadata {
    /// Metadata for a text-derived chunk
    #[must_use]
    pub fn text(document: &Metadata, chunk_index: usize) -> Self {
        Self {
            document: inherited(document),
            chunk_type: ChunkType::Text,
            chunk_index,
            code_language: None,
        }
    }

    /// Metadata for a code-derived chunk
    #[must_use]
    pub fn code(document: &Metadata, chunk_index: usize, language: impl Into<String>) -> Self {
        Self {
            document: inherited(document),
            chunk_type: ChunkType::Code,
            chunk_index,
            code_language: Some(language.into()),
        }
    }
}

fn inherited(document: &Metadata) -> Metadata {
    document
        .iter()
        .filter(|(key, _)| !RESERVED_METADATA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Kind of segment a chunk was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    /// Prose between fences
    Text,
    /// Fenced code block
    Code,
}

impl ChunkType {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
        }
    }

    /// Infix used in chunk identifiers
    #[must_use]
    pub const fn id_infix(self) -> &'static str {
        match self {
            Self::Text => "chunk",
            Self::Code => "code",
        }
    }
}

/// Build a chunk identifier from document id, type and index
#[must_use]
pub fn chunk_id(document_id: &str, chunk_type: ChunkType, index: usize) -> String {
    format!("{document_id}-{}-{index}", chunk_type.id_infix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_chunk() -> Chunk {
        let doc = Document::new("guide", "ignored")
            .with_metadata("category", "howto")
            .with_metadata("tags", vec!["a".to_string(), "b".to_string()]);
        Chunk {
            id: chunk_id("guide", ChunkType::Code, 3),
            document_id: doc.id.clone(),
            content: "```rust\nfn main() {}\n```".to_string(),
            start_offset: 10,
            end_offset: 34,
            metadata: ChunkMetadata::code(&doc.metadata, 3, "rust"),
        }
    }

    #[test]
    fn test_chunk_id_format() {
        assert_eq!(chunk_id("doc", ChunkType::Text, 0), "doc-chunk-0");
        assert_eq!(chunk_id("doc", ChunkType::Code, 7), "doc-code-7");
    }

    #[test]
    fn test_chunk_contains_offset() {
        let chunk = sample_chunk();
        assert!(chunk.contains_offset(10));
        assert!(chunk.contains_offset(33));
        assert!(!chunk.contains_offset(34));
        assert!(!chunk.contains_offset(9));
    }

    #[test]
    fn test_chunk_serializes_flat_camel_case_metadata() {
        let value = serde_json::to_value(sample_chunk()).unwrap();
        assert_eq!(value["documentId"], "guide");
        assert_eq!(value["startOffset"], 10);
        assert_eq!(value["metadata"]["category"], "howto");
        assert_eq!(value["metadata"]["tags"][1], "b");
        assert_eq!(value["metadata"]["chunkType"], "code");
        assert_eq!(value["metadata"]["chunkIndex"], 3);
        assert_eq!(value["metadata"]["codeLanguage"], "rust");
    }

    #[test]
    fn test_text_metadata_omits_code_language() {
        let meta = ChunkMetadata::text(&Metadata::new(), 0);
        let value = serde_json::to_value(meta).unwrap();
        assert!(value.get("codeLanguage").is_none());
        assert_eq!(value["chunkType"], "text");
    }

    #[test]
    fn test_chunk_round_trips_through_json() {
        let chunk = sample_chunk();
        let json = serde_json::to_string(&chunk).unwrap();
        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
    }

    #[test]
    fn test_chunk_fields_override_document_metadata() {
        let doc = Document::new("notes", "ignored")
            .with_metadata("chunkType", "user")
            .with_metadata("chunkIndex", 99_i64)
            .with_metadata("codeLanguage", "klingon")
            .with_metadata("category", "faq");
        let chunk = Chunk {
            id: chunk_id("notes", ChunkType::Text, 0),
            document_id: doc.id.clone(),
            content: "Some prose.".to_string(),
            start_offset: 0,
            end_offset: 11,
            metadata: ChunkMetadata::text(&doc.metadata, 0),
        };

        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json.matches("\"chunkType\"").count(), 1);
        assert_eq!(json.matches("\"chunkIndex\"").count(), 1);
        assert!(!json.contains("codeLanguage"));

        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunk_type(), ChunkType::Text);
        assert_eq!(back.index(), 0);
        assert_eq!(
            back.metadata.document.get("category"),
            Some(&MetadataValue::from("faq"))
        );
        assert_eq!(back, chunk);

        let code = ChunkMetadata::code(&doc.metadata, 4, "rust");
        assert_eq!(code.code_language.as_deref(), Some("rust"));
        assert!(!code.document.contains_key("codeLanguage"));
    }

    #[test]
    fn test_metadata_value_accessors() {
        assert_eq!(MetadataValue::from("x").as_str(), Some("x"));
        assert_eq!(MetadataValue::from(3_i64).as_str(), None);
        let list = MetadataValue::from(vec!["t".to_string()]);
        assert_eq!(list.as_list().map(<[String]>::len), Some(1));
    }
}
