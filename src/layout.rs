//! Pixel geometry derived from the screen size and font metrics.
//!
//! Everything here is a pure function of its inputs. The menu system
//! recomputes a `Layout` after a font-size change or a rotation and
//! raises its full-repaint flag afterwards.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::TITLE_BOTTOM_MARGIN;

/// All derived geometry for one screen/font combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub screen_width: i32,
    pub screen_height: i32,

    // Title
    pub title_area_height: i32,
    pub title_text_x: i32,
    pub title_text_y: i32,
    pub title_decorator_x: i32,
    pub title_decorator_y: i32,
    pub title_decorator_size: i32,

    // Items
    pub item_height: i32,
    pub item_spacing: i32,
    pub items_area_y: i32,
    pub items_x_offset: i32,
    pub item_text_x_padding: i32,
    pub item_text_y_offset: i32,
    pub item_corner_radius: i32,
    pub item_border_offset: i32,
    pub item_arrow_width: i32,
    pub item_arrow_margin: i32,
    pub item_min_width: i32,
    pub item_max_width: i32,
    pub item_decorator_width: i32,
    pub item_decorator_height: i32,

    /// Rows that fit below the title, never less than one.
    pub max_visible: usize,

    // Scrollbar track
    pub scrollbar_x: i32,
    pub scrollbar_y: i32,
    pub scrollbar_width: i32,
    pub scrollbar_height: i32,
}

fn scale(value: i32, factor: f32) -> i32 {
    (value as f32 * factor) as i32
}

impl Layout {
    /// Derive the geometry for a `screen` of the given size, with the
    /// menu and title fonts `menu_font_height`/`title_font_height` pixels
    /// tall.
    pub fn compute(screen: Size, menu_font_height: u32, title_font_height: u32) -> Self {
        let w = screen.width as i32;
        let h = screen.height as i32;
        let title_font = title_font_height as i32;
        let menu_font = menu_font_height as i32;

        let title_pad = (title_font / 3).max(5);
        let title_area_height = title_font + 2 * title_pad;
        let title_text_x = scale(w, 0.08);
        let title_text_y = title_pad + (title_area_height - title_font) / 2;

        let title_decorator_size = scale(w, 0.05);
        let title_decorator_x = (title_text_x / 2 - title_decorator_size / 2).max(2);
        let title_decorator_y = title_text_y + title_font / 2 - title_decorator_size / 2;

        let item_pad = (menu_font / 2).max(4);
        let item_height = menu_font + 2 * item_pad;
        let item_spacing = (item_height / 4).max(5);
        let items_area_y = title_area_height + TITLE_BOTTOM_MARGIN;
        let items_x_offset = 0;

        let item_corner_radius = (item_height / 4).max(4);
        let item_decorator_width = scale(w, 0.03);

        let row = item_height + item_spacing;
        let max_visible = if row > 0 {
            ((h - title_area_height) / row).max(1) as usize
        } else {
            1
        };

        let scrollbar_width = scale(w, 0.02).max(3);
        let scrollbar_margin = scale(w, 0.015).max(3);

        Self {
            screen_width: w,
            screen_height: h,
            title_area_height,
            title_text_x,
            title_text_y,
            title_decorator_x,
            title_decorator_y,
            title_decorator_size,
            item_height,
            item_spacing,
            items_area_y,
            items_x_offset,
            item_text_x_padding: scale(w, 0.04),
            item_text_y_offset: item_pad,
            item_corner_radius,
            item_border_offset: (item_corner_radius / 4).max(1),
            item_arrow_width: scale(menu_font, 0.6).max(8),
            item_arrow_margin: scale(w, 0.04).max(3),
            item_min_width: scale(w, 0.3),
            item_max_width: w - items_x_offset - scale(w, 0.05),
            item_decorator_width,
            item_decorator_height: (item_decorator_width / 5).max(1),
            max_visible,
            scrollbar_x: w - scrollbar_width - scrollbar_margin,
            scrollbar_y: items_area_y + scrollbar_margin,
            scrollbar_width,
            scrollbar_height: h - items_area_y - 2 * scrollbar_margin,
        }
    }

    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width.max(0) as u32, self.screen_height.max(0) as u32)
    }

    /// Distance between the tops of two consecutive rows.
    pub fn row_pitch(&self) -> i32 {
        self.item_height + self.item_spacing
    }

    /// Top of the visible row `row` (0 = first visible).
    pub fn row_y(&self, row: usize) -> i32 {
        self.items_area_y + row as i32 * self.row_pitch()
    }

    /// Width of an item whose label measures `text_width` pixels.
    pub fn item_width(&self, text_width: u32, has_children: bool) -> i32 {
        let mut width = text_width as i32 + 2 * self.item_text_x_padding;
        if has_children {
            width += self.item_arrow_width + self.item_text_x_padding / 2;
        }
        width.max(self.item_min_width).min(self.item_max_width)
    }

    /// Rectangle the slider parks at when the open menu has no items.
    pub fn placeholder_slider(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.items_x_offset, self.items_area_y),
            Size::new(
                scale(self.item_max_width, 0.8).max(0) as u32,
                self.item_height.max(0) as u32,
            ),
        )
    }

    /// Target rectangle of the window sequence.
    pub fn window_rect(&self) -> Rectangle {
        Rectangle::new(
            Point::new(scale(self.screen_width, 0.05), scale(self.screen_height, 0.25)),
            Size::new(
                scale(self.screen_width, 0.9).max(0) as u32,
                scale(self.screen_height, 0.5).max(0) as u32,
            ),
        )
    }

    /// Menu area below the title.
    pub fn body_rect(&self) -> Rectangle {
        Rectangle::new(
            Point::new(0, self.title_area_height),
            Size::new(
                self.screen_width.max(0) as u32,
                (self.screen_height - self.title_area_height).max(0) as u32,
            ),
        )
    }

    pub fn title_rect(&self) -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(
                self.screen_width.max(0) as u32,
                self.title_area_height.max(0) as u32,
            ),
        )
    }

    /// Whether a menu of `item_count` entries needs a scrollbar.
    pub fn needs_scrollbar(&self, item_count: usize) -> bool {
        self.max_visible > 0 && item_count > self.max_visible
    }

    /// Smallest thumb for a menu of `item_count` entries.
    ///
    /// Held within 8% and 50% of the track; a track shorter than that
    /// floor gets `max(track / 2, 10)`.
    pub fn thumb_min_height(&self, item_count: usize) -> i32 {
        let track = self.scrollbar_height;
        let ratio = if item_count == 0 {
            1.0
        } else {
            self.max_visible as f32 / item_count as f32
        };
        let min = scale(track, 0.08).max(scale(track, ratio).min(scale(track, 0.5)));
        if track < min {
            (track / 2).max(10)
        } else {
            min
        }
    }

    /// Scrollbar track rectangle.
    pub fn scrollbar_track(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.scrollbar_x, self.scrollbar_y),
            Size::new(
                self.scrollbar_width.max(0) as u32,
                self.scrollbar_height.max(0) as u32,
            ),
        )
    }

    /// Thumb rectangle for a viewport starting at `start`, or `None` when
    /// every item fits on screen.
    pub fn scrollbar_thumb(&self, item_count: usize, start: usize) -> Option<Rectangle> {
        if !self.needs_scrollbar(item_count) {
            return None;
        }
        let track = self.scrollbar_height;
        let proportional = track * self.max_visible as i32 / item_count as i32;
        let thumb = self.thumb_min_height(item_count).max(proportional);
        let travel = track - thumb;
        let overflow = (item_count - self.max_visible) as i32;
        let y = self.scrollbar_y + travel * start.min(item_count - self.max_visible) as i32 / overflow;
        Some(Rectangle::new(
            Point::new(self.scrollbar_x, y),
            Size::new(self.scrollbar_width.max(0) as u32, thumb.max(0) as u32),
        ))
    }
}
