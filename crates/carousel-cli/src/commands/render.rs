use std::path::Path;

use anyhow::{bail, Result};
use carousel_core::{find_block, AppConfig, Carousel};

use super::load_document;

/// Decorate the block and print its markup, optionally at slide `goto` (1-based)
///
/// With `state`, the carousel snapshot is printed as JSON instead.
pub fn run(config: &AppConfig, path: &Path, goto: Option<usize>, state: bool) -> Result<()> {
    let mut doc = load_document(path)?;
    let block = find_block(&doc);

    let Some(mut carousel) = Carousel::decorate(&mut doc, block, &config.carousel, &config.extract)?
    else {
        if state {
            bail!("No slides found in {}", path.display());
        }
        // Undecorated block is printed as-is
        println!("{}", doc.outer_html(block));
        return Ok(());
    };

    if let Some(slide) = goto {
        let count = carousel.slide_count();
        if slide == 0 || slide > count {
            bail!("Slide {} out of range (1-{})", slide, count);
        }
        carousel.jump_to(&mut doc, slide - 1);
    }

    carousel.dispose();
    if state {
        println!("{}", serde_json::to_string_pretty(&carousel.snapshot(&doc))?);
    } else {
        println!("{}", doc.outer_html(block));
    }
    Ok(())
}
