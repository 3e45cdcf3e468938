//! embedded-graphics backend for the menu, and the SSD1306 OLED wrapper
//! used by the demo firmware.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X8, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use crate::render::RenderSurface;

/// Mono font used for a menu font size.
pub fn font_for(size: u8) -> &'static MonoFont<'static> {
    match size {
        0 | 1 => &FONT_5X8,
        2 => &FONT_6X10,
        3 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

/// [`RenderSurface`] over any `DrawTarget`. Draw errors are dropped.
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn inner(&self) -> &D {
        &self.target
    }

    /// Direct access, e.g. to flush a buffered display.
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> RenderSurface for GraphicsSurface<D>
where
    D: DrawTarget,
{
    type Color = D::Color;

    fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    fn fill_screen(&mut self, color: D::Color) {
        let _ = self.target.clear(color);
    }

    fn fill_rect(&mut self, rect: Rectangle, color: D::Color) {
        let _ = self.target.fill_solid(&rect, color);
    }

    fn fill_round_rect(&mut self, rect: Rectangle, radius: u32, color: D::Color) {
        let _ = RoundedRectangle::with_equal_corners(rect, Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target);
    }

    fn stroke_round_rect(&mut self, rect: Rectangle, radius: u32, color: D::Color) {
        let _ = RoundedRectangle::with_equal_corners(rect, Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target);
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: D::Color) {
        let _ = Triangle::new(a, b, c)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target);
    }

    fn draw_text(&mut self, text: &str, top_left: Point, font_size: u8, color: D::Color) {
        let style = MonoTextStyle::new(font_for(font_size), color);
        let _ = Text::with_baseline(text, top_left, style, Baseline::Top).draw(&mut self.target);
    }

    fn text_width(&self, text: &str, font_size: u8) -> u32 {
        let font = font_for(font_size);
        let glyphs = text.chars().count() as u32;
        if glyphs == 0 {
            return 0;
        }
        glyphs * font.character_size.width + (glyphs - 1) * font.character_spacing
    }

    fn font_height(&self, font_size: u8) -> u32 {
        font_for(font_size).character_size.height
    }
}

#[cfg(feature = "embedded")]
pub use oled::*;

#[cfg(feature = "embedded")]
mod oled {
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::I2CDisplayInterface;
    use ssd1306::Ssd1306;

    use super::GraphicsSurface;

    /// Type alias for the concrete display driver.
    ///
    /// Generic over the I²C implementation so callers pass in their HAL's
    /// I²C peripheral.
    pub type Display<I2C> =
        Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

    /// Initialise the SSD1306, clear it, and wrap it for the menu.
    pub fn init<I2C>(i2c: I2C) -> GraphicsSurface<Display<I2C>>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let _ = display.init();
        display.clear_buffer();
        let _ = display.flush();
        GraphicsSurface::new(display)
    }

    /// Push the frame buffer to the panel.
    pub fn flush<I2C>(surface: &mut GraphicsSurface<Display<I2C>>)
    where
        I2C: embedded_hal::i2c::I2c,
    {
        let _ = surface.inner_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::pixelcolor::BinaryColor;

    use crate::config::MenuConfig;
    use crate::render::{Silent, Style};
    use crate::tree::{MenuItem, MenuTree};
    use crate::MenuSystem;

    fn mock() -> MockDisplay<BinaryColor> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    #[test]
    fn metrics_follow_font_table() {
        let surface = GraphicsSurface::new(mock());
        assert_eq!(surface.font_height(1), 8);
        assert_eq!(surface.font_height(2), 10);
        assert_eq!(surface.font_height(3), 15);
        assert_eq!(surface.font_height(9), 20);
        assert_eq!(surface.text_width("", 1), 0);
        assert_eq!(surface.text_width("abc", 1), 15);
        assert_eq!(surface.text_width("abc", 2), 18);
    }

    #[test]
    fn fills_reach_the_target() {
        let mut surface = GraphicsSurface::new(mock());
        assert_eq!(surface.size(), Size::new(64, 64));
        surface.fill_rect(
            Rectangle::new(Point::new(2, 3), Size::new(4, 2)),
            BinaryColor::On,
        );
        let display = surface.inner();
        assert_eq!(display.get_pixel(Point::new(2, 3)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(5, 4)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(6, 4)), None);
    }

    #[test]
    fn text_is_top_aligned() {
        let mut surface = GraphicsSurface::new(mock());
        surface.draw_text("|", Point::new(0, 10), 1, BinaryColor::On);
        let display = surface.into_inner();
        let lit = display.affected_area();
        assert!(lit.top_left.y >= 10);
        assert!(lit.top_left.y + lit.size.height as i32 <= 18);
    }

    #[test]
    fn menu_renders_on_a_real_draw_target() {
        let mut tree: MenuTree<'_, 8> = MenuTree::new();
        let sub = tree.add_menu([MenuItem::new("Inner")]).unwrap();
        let root = tree
            .add_menu([
                MenuItem::new("Main"),
                MenuItem::new("Setting").with_children(sub),
                MenuItem::new("About"),
            ])
            .unwrap();
        tree.set_root(root).unwrap();

        let mut menu = MenuSystem::new(
            &tree,
            GraphicsSurface::new(mock()),
            Silent,
            MenuConfig::default(),
            Style::monochrome(),
        )
        .unwrap();
        assert_eq!(menu.layout().max_visible, 2);

        let mut now = 0;
        menu.tick(now);
        menu.select_next();
        menu.select();
        while menu.is_animating() || menu.needs_full_redraw() {
            now += 15;
            menu.tick(now);
            assert!(now < 10_000);
        }
        assert_eq!(menu.current_depth(), 1);
        // The title decorator sits lit at its resting place.
        let l = *menu.layout();
        let probe = Point::new(
            l.title_decorator_x + l.title_decorator_size / 2,
            l.title_decorator_y + l.title_decorator_size / 2,
        );
        assert_eq!(
            menu.surface().inner().get_pixel(probe),
            Some(BinaryColor::On)
        );
    }
}
