//! Navigation chrome built into the decorated block

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::extract::Slide;
use crate::Result;

/// Attachment points of the rendered carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub block: NodeId,
    pub container: NodeId,
    /// The track whose horizontal offset selects the visible slide
    pub track: NodeId,
    pub slides: Vec<NodeId>,
    pub prev: NodeId,
    pub next: NodeId,
    pub dots_container: NodeId,
    /// One per slide, same order
    pub dots: Vec<NodeId>,
}

/// Replace the children of `block` with the carousel structure
pub fn build(doc: &mut Document, block: NodeId, slides: &[Slide]) -> Result<Controls> {
    doc.remove_children(block);

    let container = element(doc, "div", "carousel-container");
    let track = element(doc, "div", "carousel-slides");

    let mut slide_nodes = Vec::with_capacity(slides.len());
    for slide in slides {
        let node = element(doc, "div", "slide");
        if let Some(media) = slide.media {
            doc.append_child(node, media);
        }
        let content = element(doc, "div", "slide-content");
        doc.set_inner_html(content, &slide.content_html)?;
        doc.append_child(node, content);

        doc.append_child(track, node);
        slide_nodes.push(node);
    }
    doc.append_child(container, track);

    let prev = nav_button(doc, "prev-button", "\u{2039}", "Previous slide");
    let next = nav_button(doc, "next-button", "\u{203a}", "Next slide");
    doc.append_child(container, prev);
    doc.append_child(container, next);

    let dots_container = element(doc, "div", "carousel-dots");
    let dots: Vec<NodeId> = (0..slides.len())
        .map(|index| {
            let dot = element(doc, "button", "dot");
            doc.set_attr(dot, "aria-label", &format!("Go to slide {}", index + 1));
            doc.append_child(dots_container, dot);
            dot
        })
        .collect();

    doc.append_child(block, container);
    doc.append_child(block, dots_container);
    doc.set_attr(block, "tabindex", "0");

    Ok(Controls {
        block,
        container,
        track,
        slides: slide_nodes,
        prev,
        next,
        dots_container,
        dots,
    })
}

fn element(doc: &mut Document, tag: &str, class: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.set_attr(node, "class", class);
    node
}

fn nav_button(doc: &mut Document, class: &str, glyph: &str, label: &str) -> NodeId {
    let button = element(doc, "button", &format!("nav-button {}", class));
    doc.set_text(button, glyph);
    doc.set_attr(button, "aria-label", label);
    button
}
