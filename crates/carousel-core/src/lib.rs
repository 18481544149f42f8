pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod extract;
pub mod service;

pub use config::{AppConfig, CarouselConfig, ExtractConfig};
pub use controller::{Carousel, CarouselSnapshot, Command, Controls, HostEvent, Key};
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use extract::{extract_slides, Slide, SlideRecord};
pub use service::{CarouselHandle, CarouselService};

/// Class that marks the carousel block in a page
pub const BLOCK_CLASS: &str = "carousel";

/// Locate the carousel block: the first `.carousel` element, else the root
pub fn find_block(doc: &Document) -> NodeId {
    doc.find_by_class(doc.root(), BLOCK_CLASS)
        .unwrap_or_else(|| doc.root())
}
