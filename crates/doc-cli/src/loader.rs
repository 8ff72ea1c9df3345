use anyhow::{Context, Result};
use context_doc_chunker::Document;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Loads documentation files from a file or directory tree
pub struct DocumentLoader {
    root: PathBuf,
}

impl DocumentLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Load every supported document under the root (or the root itself when it is a file)
    pub fn load(&self) -> Result<Vec<Document>> {
        if self.root.is_file() {
            let base = self.root.parent().unwrap_or_else(|| Path::new(""));
            let doc = Self::read_document(base, &self.root)
                .with_context(|| format!("Failed to read {}", self.root.display()))?;
            return Ok(vec![doc]);
        }

        if !self.root.is_dir() {
            anyhow::bail!("Path does not exist: {}", self.root.display());
        }

        let mut documents = Vec::new();
        for path in self.scan() {
            match Self::read_document(&self.root, &path) {
                Ok(doc) => documents.push(doc),
                Err(e) => log::warn!("Skipping {}: {e:#}", path.display()),
            }
        }

        log::info!(
            "Loaded {} documents from {}",
            documents.len(),
            self.root.display()
        );
        Ok(documents)
    }

    /// Scan the root for documentation files (.gitignore aware), sorted by path
    fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !Self::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() || !Self::is_doc_file(entry.path()) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                entry.path().display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    files.push(entry.path().to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        files
    }

    fn read_document(base: &Path, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path)?;
        let relative = path.strip_prefix(base).unwrap_or(path);
        let relative_str = normalize(relative);

        let mut doc = Document::new(document_id(relative), content)
            .with_metadata("path", relative_str);
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            doc = doc.with_metadata("extension", ext.to_lowercase());
        }
        if let Some(title) = first_heading(&doc.content) {
            doc = doc.with_metadata("title", title);
        }
        Ok(doc)
    }

    fn is_doc_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                DOC_EXTENSIONS.iter().any(|candidate| *candidate == ext)
            })
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let lowered = name.to_string_lossy().to_lowercase();
                IGNORED_SCOPES.iter().any(|ignored| *ignored == lowered)
            }
            _ => false,
        })
    }
}

/// Relative path without extension, `/`-separated
fn document_id(relative: &Path) -> String {
    normalize(&relative.with_extension(""))
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Text of the first level-1 ATX heading outside fenced blocks
fn first_heading(content: &str) -> Option<String> {
    let mut in_fence = false;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(title) = trimmed.strip_prefix("# ") {
            let title = title.trim().trim_end_matches('#').trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

const DOC_EXTENSIONS: &[&str] = &["md", "markdown", "mdx", "txt"];

const IGNORED_SCOPES: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "build",
    "dist",
    ".cache",
    "vendor",
];

const MAX_FILE_SIZE_BYTES: u64 = 4 * 1_048_576;
