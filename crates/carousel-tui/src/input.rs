use carousel_core::{HostEvent, Key};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Press};
use crate::event::AppEvent;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Previous,
    Next,
}

/// Translate a terminal event into the host events the carousel understands
///
/// Returns `None` when the event should end the session.
pub fn handle_event(event: &AppEvent, app: &mut App, keymap: &Keymap) -> Option<Vec<HostEvent>> {
    let events = match event {
        AppEvent::Key(key) => match handle_key_event(*key, keymap) {
            Some(Action::Quit) => return None,
            Some(Action::Previous) => vec![HostEvent::KeyDown { key: Key::ArrowLeft }],
            Some(Action::Next) => vec![HostEvent::KeyDown { key: Key::ArrowRight }],
            None => Vec::new(),
        },
        AppEvent::Mouse(mouse) => handle_mouse_event(*mouse, app),
        AppEvent::FocusGained => vec![HostEvent::FocusIn],
        AppEvent::FocusLost => vec![HostEvent::FocusOut],
        AppEvent::Resize(_, _) | AppEvent::Tick => Vec::new(),
    };
    Some(events)
}

/// Look up the action bound to a key
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Option<Action> {
    keymap
        .get(&KeyBinding::new(key.code, key.modifiers))
        .copied()
}

/// Mouse input: hover tracking, drags as swipes, clicks on controls
///
/// A left press starts a touch at the pressed column; the release ends it.
/// The release also clicks the pressed control, but only when it lands on that
/// same control and the drag stayed within the swipe threshold, so one gesture
/// never yields both a swipe and a click.
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) -> Vec<HostEvent> {
    let mut events = Vec::new();

    let inside = app.hit_map.contains(mouse.column, mouse.row);
    if inside != app.pointer_inside {
        app.pointer_inside = inside;
        events.push(if inside {
            HostEvent::PointerEnter
        } else {
            HostEvent::PointerLeave
        });
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            let screen_x = app.column_to_px(mouse.column);
            app.press = Some(Press {
                screen_x,
                control: app.hit_map.hit(mouse.column, mouse.row),
            });
            events.push(HostEvent::TouchStart { screen_x });
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(press) = app.press.take() else {
                return events;
            };
            let screen_x = app.column_to_px(mouse.column);
            events.push(HostEvent::TouchEnd { screen_x });

            let is_tap =
                (screen_x - press.screen_x).abs() <= app.config.carousel.swipe_threshold_px;
            if let Some(target) = press.control {
                if is_tap && app.hit_map.hit(mouse.column, mouse.row) == Some(target) {
                    events.push(HostEvent::Click { target });
                }
            }
        }
        _ => {}
    }

    events
}
