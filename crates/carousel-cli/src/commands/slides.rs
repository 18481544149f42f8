use std::path::Path;

use anyhow::Result;
use carousel_core::{extract_slides, find_block, AppConfig, SlideRecord};

use super::load_document;

pub fn run(config: &AppConfig, path: &Path) -> Result<()> {
    let mut doc = load_document(path)?;
    let block = find_block(&doc);

    let slides = extract_slides(&mut doc, block, &config.extract);
    let records: Vec<SlideRecord> = slides.iter().map(|s| s.to_record(&doc)).collect();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
