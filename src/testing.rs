//! Host test doubles: a render surface that records every call and a
//! tone device that remembers every beep.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::render::{RenderSurface, ToneDevice};

/// Glyph cell of the recording surface at font size 1.
pub const GLYPH_W: u32 = 6;
pub const GLYPH_H: u32 = 8;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    FillScreen(Rgb565),
    FillRect(Rectangle, Rgb565),
    FillRoundRect(Rectangle, Rgb565),
    StrokeRoundRect(Rectangle, Rgb565),
    Triangle([Point; 3], Rgb565),
    Text(String, Point, u8, Rgb565),
}

pub struct RecordingSurface {
    pub size: Size,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn take(&mut self) -> Vec<Op> {
        core::mem::take(&mut self.ops)
    }

    pub fn screen_clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::FillScreen(_)))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(text, ..) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has(&self, wanted: &Op) -> bool {
        self.ops.iter().any(|op| op == wanted)
    }
}

impl RenderSurface for RecordingSurface {
    type Color = Rgb565;

    fn size(&self) -> Size {
        self.size
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.ops.push(Op::FillScreen(color));
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) {
        self.ops.push(Op::FillRect(rect, color));
    }

    fn fill_round_rect(&mut self, rect: Rectangle, _radius: u32, color: Rgb565) {
        self.ops.push(Op::FillRoundRect(rect, color));
    }

    fn stroke_round_rect(&mut self, rect: Rectangle, _radius: u32, color: Rgb565) {
        self.ops.push(Op::StrokeRoundRect(rect, color));
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgb565) {
        self.ops.push(Op::Triangle([a, b, c], color));
    }

    fn draw_text(&mut self, text: &str, top_left: Point, font_size: u8, color: Rgb565) {
        self.ops
            .push(Op::Text(text.to_string(), top_left, font_size, color));
    }

    fn text_width(&self, text: &str, font_size: u8) -> u32 {
        text.chars().count() as u32 * GLYPH_W * font_size as u32
    }

    fn font_height(&self, font_size: u8) -> u32 {
        GLYPH_H * font_size as u32
    }
}

#[derive(Default)]
pub struct Beeper {
    pub beeps: Vec<(u16, u16, u8)>,
}

impl ToneDevice for Beeper {
    fn beep(&mut self, duration_ms: u16, frequency_hz: u16, volume: u8) {
        self.beeps.push((duration_ms, frequency_hz, volume));
    }
}
