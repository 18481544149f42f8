use serde::Serialize;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::dom::{Document, NodeId};

/// One unit of carousel content pulled out of a block row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Detached copy of the row's media element
    pub media: Option<NodeId>,
    /// Markup of the row's content cell
    pub content_html: String,
}

/// Serializable view of a [`Slide`]
#[derive(Debug, Clone, Serialize)]
pub struct SlideRecord {
    pub media_html: Option<String>,
    pub content_html: String,
}

impl Slide {
    pub fn to_record(&self, doc: &Document) -> SlideRecord {
        SlideRecord {
            media_html: self.media.map(|m| doc.outer_html(m)),
            content_html: self.content_html.clone(),
        }
    }
}

/// Whether a row is a header or navigation row rather than a slide
pub fn is_marker_row(first_cell_text: &str, config: &ExtractConfig) -> bool {
    let trimmed = first_cell_text.trim();
    trimmed == config.next_marker
        || trimmed == config.previous_marker
        || first_cell_text.contains(&config.header_caption)
}

/// Extract slides from the rows of `block`
///
/// Each row is an element child of the block; its first two element children
/// are the media cell and the content cell. Rows with fewer than two cells
/// and marker rows are skipped. Media is deep-cloned, so the block can be
/// cleared afterwards.
pub fn extract_slides(doc: &mut Document, block: NodeId, config: &ExtractConfig) -> Vec<Slide> {
    let mut slides = Vec::new();

    for row in doc.element_children(block) {
        let cells = doc.element_children(row);
        if cells.len() < 2 {
            continue;
        }
        let (first, second) = (cells[0], cells[1]);

        let first_text = doc.text_content(first);
        if is_marker_row(&first_text, config) {
            debug!("Skipping marker row: {:?}", first_text.trim());
            continue;
        }

        let media = doc
            .find_by_tag(first, &config.media_tag)
            .map(|media| doc.deep_clone(media));

        slides.push(Slide {
            media,
            content_html: doc.inner_html(second),
        });
    }

    debug!("Extracted {} slides", slides.len());
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"<div class="carousel">
  <div><div>Carousel</div><div></div></div>
  <div><div><picture><img src="one.png" alt="One"></picture></div><div><h2>First</h2></div></div>
  <div><div></div><div><p>Second, no media</p></div></div>
  <div><div> &gt;&gt; </div><div>next</div></div>
  <div><div>&lt;&lt;</div><div>prev</div></div>
  <div><div>single cell</div></div>
</div>"#;

    fn block(doc: &Document) -> NodeId {
        doc.find_by_class(doc.root(), "carousel").unwrap()
    }

    #[test]
    fn test_marker_rows() {
        let config = ExtractConfig::default();
        assert!(is_marker_row(">>", &config));
        assert!(is_marker_row("  <<\n", &config));
        assert!(is_marker_row("My Carousel Block", &config));
        assert!(!is_marker_row(">> more", &config));
        assert!(!is_marker_row("carousel", &config));
        assert!(!is_marker_row("", &config));
    }

    #[test]
    fn test_extract_skips_markers_and_short_rows() {
        let mut doc = Document::parse(BLOCK).unwrap();
        let block = block(&doc);

        let slides = extract_slides(&mut doc, block, &ExtractConfig::default());

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].content_html, "<h2>First</h2>");
        assert_eq!(slides[1].content_html, "<p>Second, no media</p>");
        assert!(slides[1].media.is_none());
    }

    #[test]
    fn test_media_is_cloned_img() {
        let mut doc = Document::parse(BLOCK).unwrap();
        let block = block(&doc);

        let slides = extract_slides(&mut doc, block, &ExtractConfig::default());
        let media = slides[0].media.unwrap();

        assert_eq!(doc.tag(media), Some("img"));
        assert_eq!(doc.parent(media), None);
        assert_eq!(doc.attr(media, "src"), Some("one.png"));

        let record = slides[0].to_record(&doc);
        assert_eq!(
            record.media_html.as_deref(),
            Some(r#"<img src="one.png" alt="One">"#)
        );
    }

    #[test]
    fn test_custom_markers() {
        let config = ExtractConfig {
            next_marker: "next".to_string(),
            previous_marker: "prev".to_string(),
            header_caption: "Slides".to_string(),
            ..Default::default()
        };
        let mut doc = Document::parse(
            "<div><div><div>Slides</div><div>x</div></div><div><div>next</div><div>x</div></div>\
             <div><div>Carousel</div><div>kept</div></div></div>",
        )
        .unwrap();
        let block = doc.element_children(doc.root())[0];

        let slides = extract_slides(&mut doc, block, &config);

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].content_html, "kept");
    }

    #[test]
    fn test_empty_block_yields_no_slides() {
        let mut doc = Document::parse(r#"<div class="carousel"><div><div>Carousel</div><div></div></div></div>"#)
            .unwrap();
        let block = block(&doc);
        assert!(extract_slides(&mut doc, block, &ExtractConfig::default()).is_empty());
    }
}
