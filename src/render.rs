//! Collaborator traits for drawing and audible feedback, plus the colour
//! and font style the menu draws with.

use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::{PixelColor, Point, RgbColor, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::MAX_VOLUME;

/// Drawing primitives the menu needs from a display.
///
/// Implementations are infallible from the menu's point of view; a
/// backend that can fail drops the error.
pub trait RenderSurface {
    type Color: PixelColor;

    /// Screen size in pixels.
    fn size(&self) -> Size;

    fn fill_screen(&mut self, color: Self::Color) {
        let area = Rectangle::new(Point::zero(), self.size());
        self.fill_rect(area, color);
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Self::Color);

    fn fill_round_rect(&mut self, rect: Rectangle, radius: u32, color: Self::Color);

    /// One-pixel outline of a rounded rectangle.
    fn stroke_round_rect(&mut self, rect: Rectangle, radius: u32, color: Self::Color);

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Self::Color);

    /// Draw `text` with its top-left corner at `top_left`.
    fn draw_text(&mut self, text: &str, top_left: Point, font_size: u8, color: Self::Color);

    fn text_width(&self, text: &str, font_size: u8) -> u32;

    /// Line height of the font selected by `font_size`.
    fn font_height(&self, font_size: u8) -> u32;
}

/// Something that can beep.
pub trait ToneDevice {
    /// Start a tone. Must not block for the tone's duration.
    fn beep(&mut self, duration_ms: u16, frequency_hz: u16, volume: u8);
}

/// Tone device that stays quiet.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl ToneDevice for Silent {
    fn beep(&mut self, _duration_ms: u16, _frequency_hz: u16, _volume: u8) {}
}

/// PWM duty for `volume` (0..=`MAX_VOLUME`), topping out at a square wave.
pub fn tone_duty(max_duty: u16, volume: u8) -> u16 {
    let volume = u32::from(volume.min(MAX_VOLUME));
    (u32::from(max_duty) * volume / (2 * u32::from(MAX_VOLUME))) as u16
}

/// Colours and font sizes used when drawing the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style<C> {
    /// Screen and cleared-area background.
    pub background: C,
    /// Unselected item and title backgrounds.
    pub menu_background: C,
    /// Slider, window and title decorator fill.
    pub highlight: C,
    pub text: C,
    pub selected_text: C,
    pub title: C,
    /// Slider outline and scrollbar track.
    pub border: C,
    pub menu_font_size: u8,
    pub title_font_size: u8,
}

impl<C: Copy> Style<C> {
    pub fn with_font_sizes(mut self, menu: u8, title: u8) -> Self {
        self.menu_font_size = menu.max(1);
        self.title_font_size = title.max(1);
        self
    }
}

impl Style<Rgb565> {
    /// White-on-black colour scheme for TFT panels.
    pub fn dark() -> Self {
        Self {
            background: Rgb565::BLACK,
            menu_background: Rgb565::BLACK,
            highlight: Rgb565::WHITE,
            text: Rgb565::WHITE,
            selected_text: Rgb565::BLACK,
            title: Rgb565::WHITE,
            border: Rgb565::new(15, 31, 15),
            menu_font_size: 1,
            title_font_size: 2,
        }
    }
}

impl Style<BinaryColor> {
    /// Scheme for monochrome OLEDs.
    pub fn monochrome() -> Self {
        Self {
            background: BinaryColor::Off,
            menu_background: BinaryColor::Off,
            highlight: BinaryColor::On,
            text: BinaryColor::On,
            selected_text: BinaryColor::Off,
            title: BinaryColor::On,
            border: BinaryColor::On,
            menu_font_size: 1,
            title_font_size: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sizes_never_zero() {
        let style = Style::dark().with_font_sizes(0, 0);
        assert_eq!(style.menu_font_size, 1);
        assert_eq!(style.title_font_size, 1);
    }

    #[test]
    fn presets_contrast_selection() {
        let dark = Style::dark();
        assert_ne!(dark.highlight, dark.selected_text);
        let mono = Style::monochrome();
        assert_ne!(mono.highlight, mono.selected_text);
    }

    #[test]
    fn duty_scales_with_volume() {
        assert_eq!(tone_duty(1000, 0), 0);
        assert_eq!(tone_duty(1000, 5), 250);
        assert_eq!(tone_duty(1000, MAX_VOLUME), 500);
        assert_eq!(tone_duty(1000, 200), 500);
    }
}
