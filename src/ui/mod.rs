//! Input and display glue around the menu controller.
//!
//! ## Components
//!
//! - **Input logic**: maps debounced button presses to menu events
//! - **Display**: `RenderSurface` adapter for any embedded-graphics
//!   `DrawTarget`, plus SSD1306 bring-up for the demo firmware
//! - **Buttons**: async GPIO tasks with debouncing and long-press
//!   detection (firmware only)

#[cfg(feature = "embedded")]
pub mod buttons;
pub mod display;
pub mod input_logic;

/// Navigation events the menu understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    Next,
    Prev,
    Select,
    Back,
}

/// Physical buttons (after debouncing).
///
///   - UP/DOWN: move the selection
///   - SELECT: short press confirms, long press goes back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Up,
    Down,
    Select,
}
