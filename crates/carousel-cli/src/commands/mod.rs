pub mod render;
pub mod run;
pub mod slides;

use std::path::Path;

use anyhow::{Context, Result};
use carousel_core::Document;

/// Read and parse a markup file
pub fn load_document(path: &Path) -> Result<Document> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Document::parse(&html).with_context(|| format!("Failed to parse {}", path.display()))
}
