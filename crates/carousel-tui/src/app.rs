use carousel_core::{AppConfig, CarouselSnapshot, Controls, Document, NodeId};
use ratatui::layout::Rect;

use crate::theme::Theme;

/// Terminal rendering of one slide, taken from the decorated DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    /// Label for the slide's media, e.g. `[image: Sunset]`
    pub media_label: Option<String>,
    /// Markup of the slide-content element
    pub content_html: String,
}

impl SlideView {
    /// Read a rendered `div.slide` back out of the document
    pub fn from_dom(doc: &Document, slide: NodeId) -> Self {
        let media_label = doc.element_children(slide).into_iter().find_map(|child| {
            if doc.has_class(child, "slide-content") {
                return None;
            }
            let tag = doc.tag(child).unwrap_or("media");
            let name = doc
                .attr(child, "alt")
                .filter(|alt| !alt.trim().is_empty())
                .or_else(|| doc.attr(child, "src"))
                .unwrap_or("");
            Some(if name.is_empty() {
                format!("[{}]", tag)
            } else {
                format!("[{}: {}]", tag, name.trim())
            })
        });

        let content_html = doc
            .find_by_class(slide, "slide-content")
            .map(|content| doc.inner_html(content))
            .unwrap_or_default();

        Self {
            media_label,
            content_html,
        }
    }

    /// Plain-text rendering of the content wrapped to `width` columns
    pub fn content_text(&self, width: u16) -> String {
        let width = usize::from(width.max(10));
        html2text::from_read(self.content_html.as_bytes(), width)
            .unwrap_or_else(|_| self.content_html.clone())
    }
}

/// Screen regions of the interactive controls, refreshed on every draw
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    area: Rect,
    targets: Vec<(Rect, NodeId)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.area = Rect::default();
        self.targets.clear();
    }

    /// Region covered by the whole carousel block
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn add(&mut self, rect: Rect, node: NodeId) {
        self.targets.push((rect, node));
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.area, x, y)
    }

    /// Topmost control at a cell; later registrations win
    pub fn hit(&self, x: u16, y: u16) -> Option<NodeId> {
        self.targets
            .iter()
            .rev()
            .find(|(rect, _)| rect_contains(*rect, x, y))
            .map(|(_, node)| *node)
    }
}

fn rect_contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

/// Left-button press awaiting its release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    /// Pixel position the press started at
    pub screen_x: f64,
    /// Control under the cursor when pressed
    pub control: Option<NodeId>,
}

/// Application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub slides: Vec<SlideView>,
    pub controls: Controls,
    /// Latest state published by the carousel service
    pub snapshot: CarouselSnapshot,
    pub hit_map: HitMap,
    /// Whether the mouse is currently over the carousel
    pub pointer_inside: bool,
    /// Left button held inside the carousel
    pub press: Option<Press>,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
        doc: &Document,
        controls: Controls,
        snapshot: CarouselSnapshot,
    ) -> Self {
        let slides = controls
            .slides
            .iter()
            .map(|&slide| SlideView::from_dom(doc, slide))
            .collect();

        Self {
            config,
            theme: Theme::default(),
            slides,
            controls,
            snapshot,
            hit_map: HitMap::default(),
            pointer_inside: false,
            press: None,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn current_slide(&self) -> Option<&SlideView> {
        self.slides.get(self.snapshot.current_index)
    }

    /// Convert a terminal column to a host-style pixel position
    pub fn column_to_px(&self, column: u16) -> f64 {
        f64::from(column) * f64::from(self.config.ui.cell_width_px)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}
