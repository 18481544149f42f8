//! Carousel controller
//!
//! The controller is the single owner of the current slide index. Every input
//! source (nav buttons, dots, keyboard, swipe, auto-advance timer) is turned
//! into a [`Command`] and goes through [`Carousel::execute`], which applies the
//! transition and re-renders.
//!
//! # Usage
//!
//! ```ignore
//! let mut doc = Document::parse(html)?;
//! let block = find_block(&doc);
//! if let Some(mut carousel) = Carousel::decorate(&mut doc, block, &config, &extract)? {
//!     carousel.handle_event(&mut doc, HostEvent::Click { target: carousel.controls().next });
//!     carousel.dispose();
//! }
//! ```

pub mod chrome;
pub mod input;
pub mod state;
pub mod timer;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CarouselConfig, ExtractConfig};
use crate::dom::{Document, NodeId};
use crate::extract::extract_slides;
use crate::Result;

pub use chrome::Controls;
pub use input::{HostEvent, Key, Swipe, SwipeTracker};
pub use state::{CarouselState, Command};
pub use timer::AutoAdvance;

/// Outcome of dispatching one host event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Command the event mapped to, if any
    pub command: Option<Command>,
    /// Whether the command changed state (false for clamped no-ops)
    pub applied: bool,
    /// Whether the host should suppress its default action (page scroll)
    pub default_prevented: bool,
}

/// Read-only projection of the rendered carousel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarouselSnapshot {
    pub current_index: usize,
    pub slide_count: usize,
    /// Inline transform of the slide track
    pub track_transform: String,
    /// Index of the dot carrying the `active` class
    pub active_dot: Option<usize>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub auto_advance_active: bool,
    pub focused: bool,
    pub hovered: bool,
    /// Number of applied transitions since decoration
    pub transitions: u64,
    pub disposed: bool,
}

/// A decorated carousel block
#[derive(Debug)]
pub struct Carousel {
    state: CarouselState,
    controls: Controls,
    timer: AutoAdvance,
    auto_advance: bool,
    swipe: SwipeTracker,
    focused: bool,
    hovered: bool,
    transitions: u64,
    disposed: bool,
}

impl Carousel {
    /// Extract slides from `block`, build the chrome and render slide 0
    ///
    /// Returns `Ok(None)` and leaves the block untouched when no slides are
    /// found. The auto-advance timer is started after the first render.
    pub fn decorate(
        doc: &mut Document,
        block: NodeId,
        config: &CarouselConfig,
        extract: &ExtractConfig,
    ) -> Result<Option<Self>> {
        let slides = extract_slides(doc, block, extract);
        let Some(state) = CarouselState::new(slides.len()) else {
            warn!("No slides found in carousel");
            return Ok(None);
        };

        let controls = chrome::build(doc, block, &slides)?;
        let mut carousel = Self {
            state,
            controls,
            timer: AutoAdvance::new(config.auto_advance_interval()),
            auto_advance: config.auto_advance,
            swipe: SwipeTracker::new(config.swipe_threshold_px),
            focused: false,
            hovered: false,
            transitions: 0,
            disposed: false,
        };

        carousel.render(doc);
        if carousel.auto_advance {
            carousel.timer.start();
        }

        info!(
            "Carousel decorated with {} slides (auto-advance: {})",
            carousel.state.slide_count(),
            if carousel.auto_advance {
                format!("{}ms", carousel.timer.period().as_millis())
            } else {
                "off".to_string()
            }
        );
        Ok(Some(carousel))
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn slide_count(&self) -> usize {
        self.state.slide_count()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn timer(&self) -> &AutoAdvance {
        &self.timer
    }

    pub fn auto_advance_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn advance(&mut self, doc: &mut Document) -> bool {
        self.execute(doc, Command::Advance)
    }

    pub fn retreat(&mut self, doc: &mut Document) -> bool {
        self.execute(doc, Command::Retreat)
    }

    pub fn jump_to(&mut self, doc: &mut Document, index: usize) -> bool {
        self.execute(doc, Command::JumpTo(index))
    }

    /// The single transition function: apply `command`, then render
    pub fn execute(&mut self, doc: &mut Document, command: Command) -> bool {
        if self.disposed {
            return false;
        }
        let from = self.state.current_index();
        if !self.state.apply(command) {
            debug!("{:?} clamped at slide {}", command, from);
            return false;
        }
        self.transitions += 1;
        self.render(doc);
        debug!(
            "{:?}: slide {} -> {}",
            command,
            from,
            self.state.current_index()
        );
        true
    }

    /// Timer tick: advance, wrapping to the first slide after the last
    pub fn on_timer_tick(&mut self, doc: &mut Document) -> bool {
        if self.disposed {
            return false;
        }
        self.timer.reschedule();
        let command = self.state.auto_advance_command();
        self.execute(doc, command)
    }

    /// Project the current index onto the DOM
    pub fn render(&self, doc: &mut Document) {
        let index = self.state.current_index();
        let offset = -(index as i64) * 100;
        doc.set_style_property(
            self.controls.track,
            "transform",
            &format!("translateX({}%)", offset),
        );

        for (i, &dot) in self.controls.dots.iter().enumerate() {
            doc.toggle_class(dot, "active", i == index);
        }

        doc.set_flag(self.controls.prev, "disabled", self.state.is_first());
        doc.set_flag(self.controls.next, "disabled", self.state.is_last());
    }

    /// Route one host event to a transition or a timer/focus change
    pub fn handle_event(&mut self, doc: &mut Document, event: HostEvent) -> Dispatch {
        if self.disposed {
            return Dispatch::default();
        }

        let mut dispatch = Dispatch::default();
        match event {
            HostEvent::Click { target } => {
                dispatch.command = self.resolve_click(doc, target);
            }
            HostEvent::KeyDown { key } => {
                if self.focused {
                    dispatch.command = match key {
                        Key::ArrowLeft => Some(Command::Retreat),
                        Key::ArrowRight => Some(Command::Advance),
                        Key::Other(_) => None,
                    };
                    dispatch.default_prevented = dispatch.command.is_some();
                }
            }
            HostEvent::TouchStart { screen_x } => self.swipe.begin(screen_x),
            HostEvent::TouchEnd { screen_x } => {
                dispatch.command = self.swipe.end(screen_x).map(|swipe| match swipe {
                    Swipe::Left => Command::Advance,
                    Swipe::Right => Command::Retreat,
                });
            }
            HostEvent::PointerEnter => {
                self.hovered = true;
                if self.timer.cancel() {
                    debug!("Auto-advance suspended");
                }
            }
            HostEvent::PointerLeave => {
                self.hovered = false;
                if self.auto_advance && self.timer.start() {
                    debug!("Auto-advance resumed");
                }
            }
            HostEvent::FocusIn => self.focused = true,
            HostEvent::FocusOut => self.focused = false,
        }

        if let Some(command) = dispatch.command {
            dispatch.applied = self.execute(doc, command);
        }
        dispatch
    }

    /// Find the control hit by a click on `target` or one of its descendants
    fn resolve_click(&self, doc: &Document, target: NodeId) -> Option<Command> {
        if !doc.contains(self.controls.block, target) {
            return None;
        }
        for node in doc.ancestors(target) {
            if node == self.controls.block {
                break;
            }
            // Disabled buttons swallow clicks
            if node == self.controls.prev || node == self.controls.next {
                if doc.has_attr(node, "disabled") {
                    return None;
                }
                return Some(if node == self.controls.prev {
                    Command::Retreat
                } else {
                    Command::Advance
                });
            }
            if let Some(index) = self.controls.dots.iter().position(|&d| d == node) {
                return Some(Command::JumpTo(index));
            }
        }
        None
    }

    /// Cancel the timer and stop reacting to input; idempotent
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.timer.cancel();
        self.disposed = true;
        info!(
            "Carousel disposed after {} transitions",
            self.transitions
        );
    }

    /// Read the rendered state back from the DOM
    pub fn snapshot(&self, doc: &Document) -> CarouselSnapshot {
        CarouselSnapshot {
            current_index: self.state.current_index(),
            slide_count: self.state.slide_count(),
            track_transform: doc
                .style_property(self.controls.track, "transform")
                .unwrap_or_default(),
            active_dot: self
                .controls
                .dots
                .iter()
                .position(|&d| doc.has_class(d, "active")),
            prev_disabled: doc.has_attr(self.controls.prev, "disabled"),
            next_disabled: doc.has_attr(self.controls.next, "disabled"),
            auto_advance_active: self.timer.is_active(),
            focused: self.focused,
            hovered: self.hovered,
            transitions: self.transitions,
            disposed: self.disposed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_html(slides: usize) -> String {
        let mut html = String::from(r#"<div class="carousel"><div><div>Carousel</div><div></div></div>"#);
        for i in 0..slides {
            html.push_str(&format!(
                r#"<div><div><img src="{i}.png" alt="Slide {i}"></div><div><p>Slide {i}</p></div></div>"#
            ));
        }
        html.push_str("<div><div>&gt;&gt;</div><div></div></div></div>");
        html
    }

    fn decorated(slides: usize) -> (Document, Carousel) {
        let mut doc = Document::parse(&block_html(slides)).unwrap();
        let block = doc.find_by_class(doc.root(), "carousel").unwrap();
        let carousel = Carousel::decorate(
            &mut doc,
            block,
            &CarouselConfig::default(),
            &ExtractConfig::default(),
        )
        .unwrap()
        .unwrap();
        (doc, carousel)
    }

    fn assert_rendered(doc: &Document, carousel: &Carousel) {
        let snap = carousel.snapshot(doc);
        let index = carousel.current_index();
        let active: Vec<usize> = carousel
            .controls()
            .dots
            .iter()
            .enumerate()
            .filter(|&(_, &d)| doc.has_class(d, "active"))
            .map(|(i, _)| i)
            .collect();

        assert_eq!(active, vec![index]);
        assert_eq!(snap.prev_disabled, index == 0);
        assert_eq!(snap.next_disabled, index == carousel.slide_count() - 1);
        assert_eq!(
            snap.track_transform,
            format!("translateX({}%)", -(index as i64) * 100)
        );
    }

    #[tokio::test]
    async fn test_structure_matches_attachment_contract() {
        let (doc, carousel) = decorated(3);
        let c = carousel.controls();

        assert_eq!(doc.attr(c.block, "tabindex"), Some("0"));
        assert_eq!(doc.element_children(c.block), vec![c.container, c.dots_container]);
        assert_eq!(
            doc.element_children(c.container),
            vec![c.track, c.prev, c.next]
        );
        assert_eq!(doc.attr(c.container, "class"), Some("carousel-container"));
        assert_eq!(doc.attr(c.track, "class"), Some("carousel-slides"));
        assert_eq!(doc.attr(c.prev, "class"), Some("nav-button prev-button"));
        assert_eq!(doc.attr(c.prev, "aria-label"), Some("Previous slide"));
        assert_eq!(doc.attr(c.next, "class"), Some("nav-button next-button"));
        assert_eq!(doc.attr(c.next, "aria-label"), Some("Next slide"));
        assert_eq!(doc.attr(c.dots_container, "class"), Some("carousel-dots"));

        assert_eq!(c.slides.len(), 3);
        assert_eq!(c.dots.len(), 3);
        for (i, &dot) in c.dots.iter().enumerate() {
            assert_eq!(
                doc.attr(dot, "aria-label"),
                Some(format!("Go to slide {}", i + 1).as_str())
            );
        }

        let first = c.slides[0];
        let kids = doc.element_children(first);
        assert_eq!(doc.tag(kids[0]), Some("img"));
        assert_eq!(doc.attr(kids[1], "class"), Some("slide-content"));
        assert_eq!(doc.inner_html(kids[1]), "<p>Slide 0</p>");
    }

    #[tokio::test]
    async fn test_four_slide_scenario() {
        let (mut doc, mut carousel) = decorated(4);
        let next = carousel.controls().next;

        assert_eq!(carousel.current_index(), 0);
        assert_rendered(&doc, &carousel);
        assert!(carousel.snapshot(&doc).prev_disabled);
        assert!(!carousel.snapshot(&doc).next_disabled);

        for _ in 0..3 {
            carousel.handle_event(&mut doc, HostEvent::Click { target: next });
            assert_rendered(&doc, &carousel);
        }
        assert_eq!(carousel.current_index(), 3);
        assert!(carousel.snapshot(&doc).next_disabled);
        assert!(!carousel.snapshot(&doc).prev_disabled);

        // Clamped: manual advance at the end is a no-op
        assert!(!carousel.advance(&mut doc));
        assert_eq!(carousel.current_index(), 3);

        // The timer wraps
        assert!(carousel.on_timer_tick(&mut doc));
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.snapshot(&doc).active_dot, Some(0));
        assert_rendered(&doc, &carousel);
    }

    #[tokio::test]
    async fn test_zero_slides_leaves_block_untouched() {
        let html = r#"<div class="carousel"><div><div>Carousel</div><div>hdr</div></div><div><div>&gt;&gt;</div><div></div></div></div>"#;
        let mut doc = Document::parse(html).unwrap();
        let block = doc.find_by_class(doc.root(), "carousel").unwrap();
        let before = doc.outer_html(block);

        let carousel = Carousel::decorate(
            &mut doc,
            block,
            &CarouselConfig::default(),
            &ExtractConfig::default(),
        )
        .unwrap();

        assert!(carousel.is_none());
        assert_eq!(doc.outer_html(block), before);
        assert!(doc.find_by_class(block, "carousel-container").is_none());
        assert!(!doc.has_attr(block, "tabindex"));
    }

    #[tokio::test]
    async fn test_single_slide_buttons_always_disabled() {
        let (mut doc, mut carousel) = decorated(1);
        let events = [
            HostEvent::FocusIn,
            HostEvent::Click { target: carousel.controls().next },
            HostEvent::Click { target: carousel.controls().prev },
            HostEvent::KeyDown { key: Key::ArrowRight },
            HostEvent::KeyDown { key: Key::ArrowLeft },
            HostEvent::TouchStart { screen_x: 300.0 },
            HostEvent::TouchEnd { screen_x: 0.0 },
        ];
        for event in events {
            carousel.handle_event(&mut doc, event);
            let snap = carousel.snapshot(&doc);
            assert!(snap.prev_disabled && snap.next_disabled);
            assert_eq!(snap.current_index, 0);
        }

        carousel.on_timer_tick(&mut doc);
        let snap = carousel.snapshot(&doc);
        assert_eq!(snap.current_index, 0);
        assert!(snap.prev_disabled && snap.next_disabled);
    }

    #[tokio::test]
    async fn test_dot_click_jumps() {
        let (mut doc, mut carousel) = decorated(5);
        let dot = carousel.controls().dots[3];

        let dispatch = carousel.handle_event(&mut doc, HostEvent::Click { target: dot });

        assert_eq!(dispatch.command, Some(Command::JumpTo(3)));
        assert!(dispatch.applied);
        assert_eq!(carousel.current_index(), 3);
        assert_rendered(&doc, &carousel);
    }

    #[tokio::test]
    async fn test_click_on_button_text_reaches_button() {
        let (mut doc, mut carousel) = decorated(3);
        let glyph = doc.children(carousel.controls().next)[0];

        carousel.handle_event(&mut doc, HostEvent::Click { target: glyph });
        assert_eq!(carousel.current_index(), 1);

        // Clicks on the track or outside the block do nothing
        let track = carousel.controls().track;
        let dispatch = carousel.handle_event(&mut doc, HostEvent::Click { target: track });
        assert_eq!(dispatch.command, None);
        let root = doc.root();
        let dispatch = carousel.handle_event(&mut doc, HostEvent::Click { target: root });
        assert_eq!(dispatch.command, None);
    }

    #[tokio::test]
    async fn test_keyboard_requires_focus() {
        let (mut doc, mut carousel) = decorated(3);

        let dispatch = carousel.handle_event(&mut doc, HostEvent::KeyDown { key: Key::ArrowRight });
        assert_eq!(dispatch.command, None);
        assert!(!dispatch.default_prevented);
        assert_eq!(carousel.current_index(), 0);

        carousel.handle_event(&mut doc, HostEvent::FocusIn);
        let dispatch = carousel.handle_event(&mut doc, HostEvent::KeyDown { key: Key::ArrowRight });
        assert!(dispatch.applied);
        assert!(dispatch.default_prevented);
        assert_eq!(carousel.current_index(), 1);

        let dispatch = carousel.handle_event(&mut doc, HostEvent::KeyDown { key: Key::ArrowLeft });
        assert!(dispatch.default_prevented);
        assert_eq!(carousel.current_index(), 0);

        // Clamped keys still suppress scrolling
        let dispatch = carousel.handle_event(&mut doc, HostEvent::KeyDown { key: Key::ArrowLeft });
        assert!(!dispatch.applied);
        assert!(dispatch.default_prevented);

        let dispatch = carousel.handle_event(
            &mut doc,
            HostEvent::KeyDown { key: Key::Other("Enter".to_string()) },
        );
        assert!(!dispatch.default_prevented);

        carousel.handle_event(&mut doc, HostEvent::FocusOut);
        carousel.handle_event(&mut doc, HostEvent::KeyDown { key: Key::ArrowRight });
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test]
    async fn test_swipe_threshold() {
        let (mut doc, mut carousel) = decorated(3);
        carousel.jump_to(&mut doc, 1);

        carousel.handle_event(&mut doc, HostEvent::TouchStart { screen_x: 100.0 });
        carousel.handle_event(&mut doc, HostEvent::TouchEnd { screen_x: 50.0 });
        assert_eq!(carousel.current_index(), 1);

        carousel.handle_event(&mut doc, HostEvent::TouchStart { screen_x: 100.0 });
        carousel.handle_event(&mut doc, HostEvent::TouchEnd { screen_x: 49.0 });
        assert_eq!(carousel.current_index(), 2);

        carousel.handle_event(&mut doc, HostEvent::TouchStart { screen_x: 100.0 });
        carousel.handle_event(&mut doc, HostEvent::TouchEnd { screen_x: 151.0 });
        assert_eq!(carousel.current_index(), 1);
    }

    #[tokio::test]
    async fn test_hover_suspends_and_resumes_timer() {
        let (mut doc, mut carousel) = decorated(3);
        assert!(carousel.auto_advance_active());

        carousel.handle_event(&mut doc, HostEvent::PointerEnter);
        assert!(!carousel.auto_advance_active());
        assert!(carousel.snapshot(&doc).hovered);

        carousel.handle_event(&mut doc, HostEvent::PointerLeave);
        assert!(carousel.auto_advance_active());

        // A stray leave does not schedule a second timer
        let deadline = carousel.timer().deadline();
        carousel.handle_event(&mut doc, HostEvent::PointerLeave);
        assert_eq!(carousel.timer().deadline(), deadline);
    }

    #[tokio::test]
    async fn test_auto_advance_disabled_by_config() {
        let mut doc = Document::parse(&block_html(2)).unwrap();
        let block = doc.find_by_class(doc.root(), "carousel").unwrap();
        let config = CarouselConfig {
            auto_advance: false,
            ..Default::default()
        };
        let mut carousel = Carousel::decorate(&mut doc, block, &config, &ExtractConfig::default())
            .unwrap()
            .unwrap();

        assert!(!carousel.auto_advance_active());
        carousel.handle_event(&mut doc, HostEvent::PointerEnter);
        carousel.handle_event(&mut doc, HostEvent::PointerLeave);
        assert!(!carousel.auto_advance_active());
    }

    #[tokio::test]
    async fn test_dispose_detaches_input() {
        let (mut doc, mut carousel) = decorated(3);
        carousel.dispose();
        carousel.dispose();

        assert!(!carousel.auto_advance_active());
        let next = carousel.controls().next;
        let dispatch = carousel.handle_event(&mut doc, HostEvent::Click { target: next });
        assert_eq!(dispatch, Dispatch::default());
        assert!(!carousel.on_timer_tick(&mut doc));
        carousel.handle_event(&mut doc, HostEvent::PointerLeave);
        assert!(!carousel.auto_advance_active());

        let snap = carousel.snapshot(&doc);
        assert!(snap.disposed);
        assert_eq!(snap.current_index, 0);
        assert_eq!(snap.transitions, 0);
    }

    #[tokio::test]
    async fn test_snapshot_serializes_rendered_state() {
        let (mut doc, mut carousel) = decorated(3);
        carousel.advance(&mut doc);

        let value = serde_json::to_value(carousel.snapshot(&doc)).unwrap();
        assert_eq!(value["current_index"], 1);
        assert_eq!(value["slide_count"], 3);
        assert_eq!(value["track_transform"], "translateX(-100%)");
        assert_eq!(value["active_dot"], 1);
        assert_eq!(value["prev_disabled"], false);
        assert_eq!(value["transitions"], 1);
    }
}
