//! GPIO button input with async debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - UP     - previous item
//!   - DOWN   - next item
//!   - SELECT - short press confirms, long press goes back
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, measures how long it is held and sends the resulting
//! `InputEvent` to the menu channel.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use crate::config::{BUTTON_DEBOUNCE_MS, LONG_PRESS_MS};
use crate::ui::input_logic::classify_press;
use crate::ui::{ButtonEvent, InputEvent};

/// Depth of the button → menu channel.
pub const EVENT_QUEUE_DEPTH: usize = 4;

pub type EventSender = Sender<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;

/// Run a single button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, then waits for the
/// release. A press held past `LONG_PRESS_MS` is reported as soon as the
/// threshold passes instead of on release.
pub async fn button_task(pin: AnyPin, button: ButtonEvent, tx: &EventSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;
        let pressed_at = Instant::now();

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if btn.is_high() {
            continue;
        }

        let remaining = LONG_PRESS_MS.saturating_sub(BUTTON_DEBOUNCE_MS);
        let held_ms = match with_timeout(
            Duration::from_millis(remaining),
            btn.wait_for_rising_edge(),
        )
        .await
        {
            Ok(()) => pressed_at.elapsed().as_millis(),
            Err(_) => LONG_PRESS_MS,
        };

        let event = classify_press(button, held_ms);
        debug!("button {} held {} ms -> {}", button, held_ms, event);
        tx.send(event).await;

        // Wait for release to avoid repeat triggers.
        if btn.is_low() {
            btn.wait_for_rising_edge().await;
        }
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
    }
}
