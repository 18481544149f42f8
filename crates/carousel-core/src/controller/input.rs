use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// Keyboard key as reported by the host (`KeyboardEvent.key`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Input delivered to the carousel by its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// Primary click on `target` (or one of its descendants)
    Click { target: NodeId },
    KeyDown { key: Key },
    TouchStart { screen_x: f64 },
    TouchEnd { screen_x: f64 },
    /// Pointer entered the widget's bounding region
    PointerEnter,
    /// Pointer left the widget's bounding region
    PointerLeave,
    FocusIn,
    FocusOut,
}

/// Horizontal swipe detection between touchstart and touchend
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: Option<f64>,
}

/// Direction of a recognised swipe, in finger movement terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: None,
        }
    }

    pub fn begin(&mut self, screen_x: f64) {
        self.start_x = Some(screen_x);
    }

    /// Finish a gesture; the distance must be strictly above the threshold
    pub fn end(&mut self, screen_x: f64) -> Option<Swipe> {
        let start = self.start_x.take()?;
        let diff = start - screen_x;
        if diff.abs() <= self.threshold_px {
            return None;
        }
        Some(if diff > 0.0 { Swipe::Left } else { Swipe::Right })
    }
}
