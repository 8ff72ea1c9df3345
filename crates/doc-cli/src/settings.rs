use anyhow::{Context, Result};
use context_doc_chunker::{ChunkOrdering, ChunkerConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional TOML configuration file
///
/// ```toml
/// [chunker]
/// chunk_size = 800
/// chunk_overlap = 120
/// ordering = "document"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    chunker: ChunkerConfig,
}

/// Command-line overrides applied on top of the file
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub ordering: Option<ChunkOrdering>,
}

/// Resolve chunker configuration: defaults, then file, then flags
pub fn resolve(config_path: Option<&Path>, overrides: Overrides) -> Result<ChunkerConfig> {
    let mut config = match config_path {
        Some(path) => load_file(path)?,
        None => ChunkerConfig::default(),
    };

    if let Some(size) = overrides.chunk_size {
        config.chunk_size = size;
    }
    if let Some(overlap) = overrides.chunk_overlap {
        config.chunk_overlap = overlap;
    }
    if let Some(ordering) = overrides.ordering {
        config.ordering = ordering;
    }

    config.validate().context("Invalid chunker configuration")?;
    log::debug!("Resolved chunker config: {config:?}");
    Ok(config)
}

fn load_file(path: &Path) -> Result<ChunkerConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let settings: SettingsFile = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(settings.chunker)
}
