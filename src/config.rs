//! Library-wide constants and runtime configuration.
//!
//! Timing parameters, capacities and feedback-tone settings live here so
//! they can be tuned in one place. `MenuConfig` carries the values a host
//! chooses when constructing a `MenuSystem`.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::anim::AnimationForm;
use crate::nav::DisplayMode;
use crate::Error;

// Navigation

/// Default number of nested submenus the history stack can hold.
pub const HISTORY_CAPACITY: usize = 10;

/// Upper bound for a configured history capacity (storage size).
pub const MAX_HISTORY_DEPTH: usize = 16;

/// Maximum label length in bytes; longer labels are truncated.
pub const LABEL_CAPACITY: usize = 24;

/// Title shown while the root menu is open.
pub const ROOT_TITLE: &str = "Root Menu";

/// Title shown when the history entry naming the parent is malformed.
pub const ERROR_TITLE: &str = "ERROR";

// Animation

/// Default slider/decorator animation horizon (ms).
pub const ANIM_DURATION_MS: u16 = 200;

/// Default animation tick interval (ms). ~60 fps.
pub const ANIM_INTERVAL_MS: u16 = 15;

/// A component closer than this to its target (px) snaps onto it.
pub const CONVERGENCE_TOLERANCE: f32 = 0.5;

/// Damping ratio of the spring model.
pub const SPRING_DAMPING: f32 = 0.5;

/// Natural frequency of the spring model (rad/s).
pub const SPRING_FREQUENCY: f32 = 15.0;

/// Largest time step a single tick may integrate (s).
pub const MAX_TICK_DT: f32 = 0.1;

// Layout

/// Gap between the title area and the first item (px).
pub const TITLE_BOTTOM_MARGIN: i32 = 10;

// Feedback tone

/// Short tone on next/prev/select.
pub const SHORT_TONE_MS: u16 = 20;

/// Long tone on back.
pub const LONG_TONE_MS: u16 = 100;

/// Tone pitch (Hz).
pub const TONE_FREQUENCY_HZ: u16 = 1000;

/// Default tone volume.
pub const DEFAULT_VOLUME: u8 = 5;

/// Loudest accepted volume level.
pub const MAX_VOLUME: u8 = 10;

// Input

/// A confirm press held at least this long is treated as back (ms).
pub const LONG_PRESS_MS: u64 = 700;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` are
// picked in `main.rs`. Adjust for your board.
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button SELECT  → P0.24
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   Buzzer (PWM)   → P0.13

/// Per-component replacement for the computed slider rectangle.
///
/// `None` keeps the computed value for that component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderOverride {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SliderOverride {
    /// No component overridden.
    pub const fn none() -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Replace the overridden components of `rect`.
    pub fn apply(&self, rect: Rectangle) -> Rectangle {
        Rectangle::new(
            Point::new(
                self.x.unwrap_or(rect.top_left.x),
                self.y.unwrap_or(rect.top_left.y),
            ),
            Size::new(
                self.width.unwrap_or(rect.size.width),
                self.height.unwrap_or(rect.size.height),
            ),
        )
    }
}

/// Host-selected behaviour of a `MenuSystem`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuConfig {
    /// How the viewport follows the selection.
    pub display_mode: DisplayMode,
    /// Optional fixed slider geometry.
    pub slider_override: SliderOverride,
    /// Numeric model for slider and title-decorator tweens.
    pub animation_form: AnimationForm,
    /// Interpolation horizon (ms).
    pub animation_duration_ms: u16,
    /// Minimum time between animation steps (ms).
    pub animation_interval_ms: u16,
    /// Feedback tone volume, `0..=MAX_VOLUME`.
    pub volume: u8,
    /// Deepest submenu nesting accepted; deeper descents are refused.
    pub history_capacity: usize,
    /// Title drawn at depth 0.
    pub root_title: &'static str,
}

impl MenuConfig {
    pub const fn new() -> Self {
        Self {
            display_mode: DisplayMode::FollowSelection,
            slider_override: SliderOverride::none(),
            animation_form: AnimationForm::Integral,
            animation_duration_ms: ANIM_DURATION_MS,
            animation_interval_ms: ANIM_INTERVAL_MS,
            volume: DEFAULT_VOLUME,
            history_capacity: HISTORY_CAPACITY,
            root_title: ROOT_TITLE,
        }
    }

    pub const fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub const fn with_animation_form(mut self, form: AnimationForm) -> Self {
        self.animation_form = form;
        self
    }

    pub const fn with_timing(mut self, duration_ms: u16, interval_ms: u16) -> Self {
        self.animation_duration_ms = duration_ms;
        self.animation_interval_ms = interval_ms;
        self
    }

    pub const fn with_slider_override(mut self, slider_override: SliderOverride) -> Self {
        self.slider_override = slider_override;
        self
    }

    pub const fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub const fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume;
        self
    }

    pub const fn with_root_title(mut self, title: &'static str) -> Self {
        self.root_title = title;
        self
    }

    /// Check timing and capacity values.
    pub fn validate(&self) -> Result<(), Error> {
        if self.animation_interval_ms == 0
            || self.animation_duration_ms < self.animation_interval_ms
        {
            return Err(Error::InvalidConfig);
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_DEPTH {
            return Err(Error::InvalidConfig);
        }
        if self.volume > MAX_VOLUME {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(MenuConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cfg = MenuConfig::new().with_timing(200, 0);
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn duration_shorter_than_interval_is_rejected() {
        let cfg = MenuConfig::new().with_timing(10, 15);
        assert_eq!(cfg.validate(), Err(Error::InvalidConfig));
        assert_eq!(MenuConfig::new().with_timing(15, 15).validate(), Ok(()));
    }

    #[test]
    fn history_capacity_bounds() {
        assert!(MenuConfig::new().with_history_capacity(0).validate().is_err());
        assert!(MenuConfig::new()
            .with_history_capacity(MAX_HISTORY_DEPTH + 1)
            .validate()
            .is_err());
        assert!(MenuConfig::new()
            .with_history_capacity(MAX_HISTORY_DEPTH)
            .validate()
            .is_ok());
    }

    #[test]
    fn override_replaces_only_set_components() {
        let base = Rectangle::new(Point::new(0, 36), Size::new(72, 16));
        let partial = SliderOverride {
            y: Some(50),
            width: Some(100),
            ..SliderOverride::none()
        };
        let out = partial.apply(base);
        assert_eq!(out.top_left, Point::new(0, 50));
        assert_eq!(out.size, Size::new(100, 16));
        assert!(!partial.is_empty());
        assert_eq!(SliderOverride::none().apply(base), base);
    }
}
