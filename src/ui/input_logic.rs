//! Pure button-to-event mapping, kept free of GPIO so it runs on the host.

use crate::config::LONG_PRESS_MS;
use crate::ui::{ButtonEvent, InputEvent};

/// Event for `button` released after `held_ms` milliseconds.
///
/// SELECT held for at least `LONG_PRESS_MS` means back.
pub fn classify_press(button: ButtonEvent, held_ms: u64) -> InputEvent {
    match button {
        ButtonEvent::Up => InputEvent::Prev,
        ButtonEvent::Down => InputEvent::Next,
        ButtonEvent::Select if is_long_press(held_ms) => InputEvent::Back,
        ButtonEvent::Select => InputEvent::Select,
    }
}

pub fn is_long_press(held_ms: u64) -> bool {
    held_ms >= LONG_PRESS_MS
}
