//! Drawing routines of the menu controller.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use super::MenuSystem;
use crate::render::{RenderSurface, ToneDevice};
use crate::tree::MenuItem;

impl<'a, S, T, const N: usize> MenuSystem<'a, S, T, N>
where
    S: RenderSurface,
    T: ToneDevice,
{
    /// Clear the screen and paint every element once.
    pub(super) fn draw_full(&mut self) {
        let background = self.style.background;
        self.surface.fill_screen(background);
        self.need_full_redraw = true;

        self.draw_title(true);
        for index in self.nav.visible() {
            if index == self.nav.selected() {
                // The slider paints this row.
                let slot = self.slot_rect(index);
                self.surface.fill_rect(slot, background);
            } else {
                self.draw_item(index);
            }
        }
        self.draw_scrollbar();
        self.draw_animated_element();

        self.drawn.selected = Some(self.nav.selected());
        self.drawn.start = Some(self.nav.start());
        self.drawn.slider = Some(self.slider_frame());
        self.need_full_redraw = false;
        self.scroll_pending = false;
        debug!("full repaint");
    }

    /// Incremental repaint when the viewport is unchanged.
    pub(super) fn draw_changes(&mut self) {
        self.draw_title(false);
        if self.drawn.selected != Some(self.nav.selected()) {
            self.erase_last_frame();
            self.redraw_previous_selection();
        }
        self.draw_animated_element();
        self.drawn.selected = Some(self.nav.selected());
        self.drawn.slider = Some(self.slider_frame());
    }

    /// One animation frame: erase the old slider, repair the row it
    /// uncovered, paint the slider at its new place.
    pub(super) fn draw_animated_frame(&mut self) {
        self.erase_last_frame();
        self.redraw_previous_selection();
        self.draw_animated_element();
        self.drawn.slider = Some(self.slider_frame());
    }

    /// Title text (when changed or `force`d) and the decorator.
    pub(super) fn draw_title(&mut self, force: bool) {
        let title = self.title();
        if force || self.need_full_redraw || self.drawn.title != Some(title) {
            let area = self.layout.title_rect();
            self.surface.fill_rect(area, self.style.menu_background);
            let origin = Point::new(self.layout.title_text_x, self.layout.title_text_y);
            self.surface
                .draw_text(title, origin, self.style.title_font_size, self.style.title);
            self.drawn.title = Some(title);
        }

        let side = self.layout.title_decorator_size.max(0) as u32;
        let decorator = Rectangle::new(
            Point::new(self.decorator.pixel(), self.layout.title_decorator_y),
            Size::new(side, side),
        );
        self.surface
            .fill_round_rect(decorator, side / 3, self.style.highlight);
    }

    fn erase_last_frame(&mut self) {
        if let Some(last) = self.drawn.slider {
            self.surface.fill_rect(last, self.style.background);
        }
    }

    /// Repaint the row that was selected when the screen was last drawn,
    /// now unselected, if it is still on screen.
    fn redraw_previous_selection(&mut self) {
        let Some(previous) = self.drawn.selected else {
            return;
        };
        if previous != self.nav.selected()
            && self.drawn.start == Some(self.nav.start())
            && self.nav.is_visible(previous)
        {
            self.draw_item(previous);
        }
    }

    fn draw_animated_element(&mut self) {
        if self.window_open {
            self.draw_window();
        } else {
            self.draw_slider();
        }
    }

    /// An unselected row.
    fn draw_item(&mut self, index: usize) {
        let tree = self.tree;
        let Some(item) = tree.entry(self.nav.menu(), index) else {
            return;
        };
        let row = index.saturating_sub(self.nav.start());
        let rect = self.item_rect(index, row);
        self.surface.fill_round_rect(
            rect,
            self.layout.item_corner_radius as u32,
            self.style.menu_background,
        );
        self.draw_item_content(item, rect, self.style.text);
    }

    fn draw_slider(&mut self) {
        let tree = self.tree;
        let Some(item) = tree.entry(self.nav.menu(), self.nav.selected()) else {
            return;
        };
        let rect = self.slider.rect();
        self.draw_highlight_box(rect);
        self.draw_item_content(item, rect, self.style.selected_text);
    }

    fn draw_window(&mut self) {
        let rect = self.slider.rect();
        self.draw_highlight_box(rect);
    }

    fn draw_highlight_box(&mut self, rect: Rectangle) {
        let radius = self.layout.item_corner_radius;
        let border = self.layout.item_border_offset;
        self.surface
            .fill_round_rect(rect, radius as u32, self.style.highlight);
        self.surface.stroke_round_rect(
            rect.offset(border),
            (radius + border) as u32,
            self.style.border,
        );
    }

    /// Bar, label and (for submenus) arrow of `item` inside `rect`.
    fn draw_item_content(&mut self, item: &MenuItem<'_>, rect: Rectangle, color: S::Color) {
        let l = self.layout;
        let x = rect.top_left.x;
        let y = rect.top_left.y;
        let w = rect.size.width as i32;
        let h = rect.size.height as i32;

        let bar = Rectangle::new(
            Point::new(x + 2, y + h / 2 - l.item_decorator_height / 2),
            Size::new(
                l.item_decorator_width.max(0) as u32,
                l.item_decorator_height.max(0) as u32,
            ),
        );
        self.surface.fill_rect(bar, color);

        let font = self.style.menu_font_size;
        let font_h = self.surface.font_height(font) as i32;
        let text_y = y + l.item_text_y_offset + (h - 2 * l.item_text_y_offset - font_h) / 2;
        let text_x = x + l.item_decorator_width + l.item_text_x_padding;
        self.surface
            .draw_text(item.label(), Point::new(text_x, text_y), font, color);

        if item.has_children() {
            let half = l.item_arrow_width / 2;
            let tip_x = x + w - l.item_arrow_margin;
            let back_x = tip_x - half;
            let mid_y = y + h / 2;
            self.surface.fill_triangle(
                Point::new(tip_x, mid_y),
                Point::new(back_x, mid_y - half),
                Point::new(back_x, mid_y + half),
                color,
            );
        }
    }

    fn draw_scrollbar(&mut self) {
        let Some(thumb) = self
            .layout
            .scrollbar_thumb(self.nav.menu().len(), self.nav.start())
        else {
            return;
        };
        let track = self.layout.scrollbar_track();
        self.surface.fill_rect(track, self.style.border);
        self.surface.fill_rect(thumb, self.style.highlight);
    }

    /// Unselected geometry of `index` drawn at visible `row`.
    pub(super) fn item_rect(&self, index: usize, row: usize) -> Rectangle {
        let l = &self.layout;
        let width = match self.tree.entry(self.nav.menu(), index) {
            Some(item) => {
                let text = self
                    .surface
                    .text_width(item.label(), self.style.menu_font_size);
                l.item_width(text, item.has_children())
            }
            None => l.item_min_width,
        };
        Rectangle::new(
            Point::new(l.items_x_offset, l.row_y(row)),
            Size::new(width.max(0) as u32, l.item_height.max(0) as u32),
        )
    }

    /// Row `index` including its border margin.
    fn slot_rect(&self, index: usize) -> Rectangle {
        let row = index.saturating_sub(self.nav.start());
        self.item_rect(index, row)
            .offset(self.layout.item_border_offset)
    }

    /// Area covered by the slider or window, border included.
    fn slider_frame(&self) -> Rectangle {
        self.slider.rect().offset(self.layout.item_border_offset)
    }
}
