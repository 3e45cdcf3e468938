//! The menu controller.
//!
//! [`MenuSystem`] ties the navigator, the two tweens and the redraw
//! scheduler together. Input calls mutate navigation state and arm
//! tweens; [`MenuSystem::tick`] advances the tweens and issues the draw
//! calls, never more than one kind of repaint per tick:
//!
//! - while a tween is running only the animated element is repainted,
//!   after erasing its previous rectangle;
//! - once everything is at rest, a pending full repaint is honoured.

mod draw;

use embedded_graphics::primitives::Rectangle;

use crate::anim::{rect_components, AnimationForm, Motion, Tween};
use crate::config::{
    MenuConfig, SliderOverride, ERROR_TITLE, LONG_TONE_MS, MAX_VOLUME, SHORT_TONE_MS,
    TONE_FREQUENCY_HZ,
};
use crate::layout::Layout;
use crate::nav::{DisplayMode, Navigator, SliderMove};
use crate::render::{RenderSurface, Style, ToneDevice};
use crate::tree::{ActionResult, MenuTree};
use crate::ui::InputEvent;
use crate::Error;

/// Coarse controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavState {
    /// Nothing pending.
    Idle,
    /// The viewport just scrolled; the next repaint is a full one.
    Scrolling,
    /// Slider or title decorator in flight.
    Animating,
    /// The window sequence owns the screen; only back is accepted.
    OperationBanned,
}

/// What was on screen after the last draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Snapshot<'a> {
    selected: Option<usize>,
    start: Option<usize>,
    title: Option<&'a str>,
    /// Last slider/window rectangle, inflated by the border offset.
    slider: Option<Rectangle>,
}

impl Snapshot<'_> {
    /// Forget the menu content but keep the slider rectangle, which is
    /// still on screen and must be erased by the next animated frame.
    fn forget_content(&mut self) {
        self.selected = None;
        self.start = None;
        self.title = None;
    }
}

pub struct MenuSystem<'a, S, T, const N: usize>
where
    S: RenderSurface,
    T: ToneDevice,
{
    tree: &'a MenuTree<'a, N>,
    surface: S,
    tone: T,
    config: MenuConfig,
    style: Style<S::Color>,
    layout: Layout,
    nav: Navigator,
    slider: Tween<4>,
    decorator: Tween<1>,
    window_open: bool,
    banned: bool,
    scroll_pending: bool,
    need_full_redraw: bool,
    drawn: Snapshot<'a>,
    now_ms: u64,
}

impl<'a, S, T, const N: usize> MenuSystem<'a, S, T, N>
where
    S: RenderSurface,
    T: ToneDevice,
{
    /// Build a controller showing the root of `tree`. Nothing is drawn
    /// until the first [`tick`](Self::tick) or [`draw`](Self::draw).
    pub fn new(
        tree: &'a MenuTree<'a, N>,
        surface: S,
        tone: T,
        config: MenuConfig,
        style: Style<S::Color>,
    ) -> Result<Self, Error> {
        config.validate()?;
        let style = style.with_font_sizes(style.menu_font_size, style.title_font_size);
        let layout = Layout::compute(
            surface.size(),
            surface.font_height(style.menu_font_size),
            surface.font_height(style.title_font_size),
        );
        let nav = Navigator::new(
            tree.root(),
            layout.max_visible,
            config.display_mode,
            config.history_capacity,
        );

        let mut menu = Self {
            tree,
            surface,
            tone,
            config,
            style,
            layout,
            nav,
            slider: Tween::new([0.0; 4]),
            decorator: Tween::new([layout.title_decorator_x as f32]),
            window_open: false,
            banned: false,
            scroll_pending: false,
            need_full_redraw: true,
            drawn: Snapshot::default(),
            now_ms: 0,
        };
        menu.slider.snap(rect_components(menu.resting_slider()));
        info!(
            "menu ready: {} root items, {} visible",
            tree.root().len(),
            layout.max_visible
        );
        Ok(menu)
    }

    // Navigation

    pub fn select_next(&mut self) {
        if self.refuse_when_banned() {
            return;
        }
        let moved = self.nav.select_next();
        self.apply_move(moved);
    }

    pub fn select_prev(&mut self) {
        if self.refuse_when_banned() {
            return;
        }
        let moved = self.nav.select_prev();
        self.apply_move(moved);
    }

    /// Confirm the selected item: run its action, then open its children.
    pub fn select(&mut self) {
        if self.refuse_when_banned() {
            return;
        }
        let tree = self.tree;
        let Some(item) = tree.entry(self.nav.menu(), self.nav.selected()) else {
            return;
        };
        self.beep(SHORT_TONE_MS);

        if let Some(action) = item.action() {
            match action.invoke() {
                ActionResult::None => {}
                ActionResult::OpenWindow => {
                    self.open_window();
                    return;
                }
                ActionResult::Back => {
                    self.back();
                    return;
                }
                ActionResult::SetAnimationForm(form) => self.set_animation_form(form),
                ActionResult::Redraw => self.need_full_redraw = true,
            }
        }

        if let Some(children) = item.children() {
            if !self.nav.descend(children) {
                debug!(
                    "descent refused at depth {} (capacity {})",
                    self.nav.depth(),
                    self.nav.capacity()
                );
                return;
            }
            debug!("entered '{}' at depth {}", item.label(), self.nav.depth());
            self.settle_after_level_change(self.layout.screen_width as f32);
        }
    }

    /// Close the window sequence, or return to the parent menu.
    pub fn back(&mut self) {
        if self.window_open {
            self.window_open = false;
            self.banned = false;
            self.beep(LONG_TONE_MS);
            let target = self.resting_slider();
            self.slider.arm(rect_components(target), self.now_ms);
            info!("window sequence closed");
            return;
        }
        if self.nav.depth() == 0 {
            return;
        }
        self.beep(LONG_TONE_MS);
        self.nav.ascend();
        debug!("back to depth {}", self.nav.depth());
        self.settle_after_level_change(-(self.layout.title_decorator_size as f32));
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Next => self.select_next(),
            InputEvent::Prev => self.select_prev(),
            InputEvent::Select => self.select(),
            InputEvent::Back => self.back(),
        }
    }

    // Redraw scheduling

    /// Advance animations to `now_ms` and repaint what changed.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        let motion = self.motion();
        let mut animated = false;

        let before = self.slider.rect();
        let progress = self.slider.tick(now_ms, &motion);
        if progress.stepped() {
            if self.slider.rect() != before {
                self.draw_animated_frame();
                animated = true;
            }
            if !self.slider.is_active() {
                trace!("slider settled");
                self.need_full_redraw = true;
            }
        }

        let progress = self.decorator.tick(now_ms, &motion);
        if progress.stepped() {
            self.draw_title(true);
            animated = true;
            if !self.decorator.is_active() {
                trace!("title decorator settled");
                self.need_full_redraw = true;
            }
        }

        if !animated && !self.is_animating() && self.need_full_redraw {
            self.draw_full();
        }
    }

    /// Paint whatever differs from the last frame. Use once after
    /// construction if the first tick is far away.
    pub fn draw(&mut self) {
        if self.need_full_redraw || self.drawn.start != Some(self.nav.start()) {
            self.draw_full();
        } else {
            self.draw_changes();
        }
    }

    /// Request a complete repaint; done now when idle, otherwise as soon
    /// as the running animation settles.
    pub fn force_redraw(&mut self) {
        self.need_full_redraw = true;
        if !self.is_animating() {
            self.draw_full();
        }
    }

    // Queries

    pub fn current_depth(&self) -> usize {
        self.nav.depth()
    }

    pub fn current_selection_index(&self) -> usize {
        self.nav.selected()
    }

    pub fn viewport_start(&self) -> usize {
        self.nav.start()
    }

    pub fn state(&self) -> NavState {
        if self.banned {
            NavState::OperationBanned
        } else if self.is_animating() {
            NavState::Animating
        } else if self.scroll_pending {
            NavState::Scrolling
        } else {
            NavState::Idle
        }
    }

    pub fn is_animating(&self) -> bool {
        self.slider.is_active() || self.decorator.is_active()
    }

    pub fn is_operation_banned(&self) -> bool {
        self.banned
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.need_full_redraw
    }

    /// Slider rectangle as currently drawn.
    pub fn slider_rect(&self) -> Rectangle {
        self.slider.rect()
    }

    pub fn slider_target(&self) -> Rectangle {
        self.slider.target_rect()
    }

    pub fn title_decorator_x(&self) -> i32 {
        self.decorator.pixel()
    }

    /// Title for the current level.
    pub fn title(&self) -> &'a str {
        match self.nav.parent() {
            None => self.config.root_title,
            Some(parent) => self
                .tree
                .entry(parent.menu, parent.selected)
                .map(|item| item.label())
                .unwrap_or(ERROR_TITLE),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn style(&self) -> &Style<S::Color> {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tone(&self) -> &T {
        &self.tone
    }

    pub fn tone_mut(&mut self) -> &mut T {
        &mut self.tone
    }

    // Settings

    /// Switch viewport policy. The slider jumps to its new place.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.config.display_mode = mode;
        self.nav.set_mode(mode);
        if !self.window_open {
            self.slider.snap(rect_components(self.resting_slider()));
        }
        self.need_full_redraw = true;
        debug!("display mode {}", mode);
    }

    pub fn set_slider_override(&mut self, slider_override: SliderOverride) {
        self.config.slider_override = slider_override;
        if !self.window_open && !self.nav.menu().is_empty() {
            let target = self.resting_slider();
            self.slider.arm(rect_components(target), self.now_ms);
        }
    }

    pub fn set_animation_form(&mut self, form: AnimationForm) {
        self.config.animation_form = form;
        debug!("animation form {}", form);
    }

    pub fn set_animation_duration(&mut self, duration_ms: u16) -> Result<(), Error> {
        let config = self.config.with_timing(duration_ms, self.config.animation_interval_ms);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_animation_interval(&mut self, interval_ms: u16) -> Result<(), Error> {
        let config = self.config.with_timing(self.config.animation_duration_ms, interval_ms);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Feedback volume, clamped to `0..=MAX_VOLUME`; 0 mutes.
    pub fn set_volume(&mut self, volume: u8) {
        self.config.volume = volume.min(MAX_VOLUME);
    }

    pub fn set_background_color(&mut self, color: S::Color) {
        self.style.background = color;
        self.need_full_redraw = true;
    }

    pub fn set_menu_background_color(&mut self, color: S::Color) {
        self.style.menu_background = color;
        self.need_full_redraw = true;
    }

    pub fn set_highlight_color(&mut self, color: S::Color) {
        self.style.highlight = color;
        self.need_full_redraw = true;
    }

    pub fn set_text_color(&mut self, color: S::Color) {
        self.style.text = color;
        self.need_full_redraw = true;
    }

    pub fn set_selected_text_color(&mut self, color: S::Color) {
        self.style.selected_text = color;
        self.need_full_redraw = true;
    }

    pub fn set_title_color(&mut self, color: S::Color) {
        self.style.title = color;
        self.need_full_redraw = true;
    }

    pub fn set_border_color(&mut self, color: S::Color) {
        self.style.border = color;
        self.need_full_redraw = true;
    }

    pub fn set_menu_font_size(&mut self, size: u8) {
        self.style.menu_font_size = size.max(1);
        self.relayout();
    }

    pub fn set_title_font_size(&mut self, size: u8) {
        self.style.title_font_size = size.max(1);
        self.relayout();
    }

    /// Replace every colour and font size at once.
    pub fn set_style(&mut self, style: Style<S::Color>) {
        self.style = style.with_font_sizes(style.menu_font_size, style.title_font_size);
        self.relayout();
    }

    /// Recompute geometry from the surface size and fonts, e.g. after a
    /// rotation.
    pub fn relayout(&mut self) {
        self.layout = Layout::compute(
            self.surface.size(),
            self.surface.font_height(self.style.menu_font_size),
            self.surface.font_height(self.style.title_font_size),
        );
        self.nav.refit(self.layout.max_visible);

        let rest_x = self.layout.title_decorator_x as f32;
        if self.decorator.is_active() {
            self.decorator.arm([rest_x], self.now_ms);
        } else {
            self.decorator.snap([rest_x]);
        }
        if self.window_open {
            let window = self.layout.window_rect();
            self.slider.arm(rect_components(window), self.now_ms);
        } else {
            self.slider.snap(rect_components(self.resting_slider()));
        }

        self.drawn.slider = None;
        self.need_full_redraw = true;
        info!(
            "layout {}x{}: {} rows visible",
            self.layout.screen_width,
            self.layout.screen_height,
            self.layout.max_visible
        );
    }

    // Internals

    fn motion(&self) -> Motion {
        Motion {
            form: self.config.animation_form,
            duration_ms: self.config.animation_duration_ms,
            interval_ms: self.config.animation_interval_ms,
        }
    }

    fn refuse_when_banned(&self) -> bool {
        if self.banned {
            trace!("input ignored while the window is open");
        }
        self.banned
    }

    fn beep(&mut self, duration_ms: u16) {
        if self.config.volume > 0 {
            self.tone
                .beep(duration_ms, TONE_FREQUENCY_HZ, self.config.volume);
        }
    }

    fn apply_move(&mut self, moved: SliderMove) {
        match moved {
            SliderMove::None => {}
            SliderMove::Tween => {
                self.beep(SHORT_TONE_MS);
                let target = self.resting_slider();
                self.slider.arm(rect_components(target), self.now_ms);
            }
            SliderMove::Snap => {
                self.beep(SHORT_TONE_MS);
                self.slider.snap(rect_components(self.resting_slider()));
                self.scroll_pending = true;
                self.need_full_redraw = true;
            }
        }
    }

    fn open_window(&mut self) {
        let window = self.layout.window_rect();
        self.slider.arm(rect_components(window), self.now_ms);
        self.window_open = true;
        self.banned = true;
        info!("window sequence opened");
    }

    /// Common tail of descend/ascend: retarget the slider, restart the
    /// decorator from `decorator_from`, schedule a full repaint.
    fn settle_after_level_change(&mut self, decorator_from: f32) {
        let target = self.resting_slider();
        if self.nav.menu().is_empty() {
            self.slider.snap(rect_components(target));
        } else {
            self.slider.arm(rect_components(target), self.now_ms);
        }
        self.decorator.launch(
            [decorator_from],
            [self.layout.title_decorator_x as f32],
            self.now_ms,
        );
        self.drawn.forget_content();
        self.need_full_redraw = true;
    }

    /// Where the slider belongs for the current selection.
    fn resting_slider(&self) -> Rectangle {
        if self.nav.menu().is_empty() {
            return self.layout.placeholder_slider();
        }
        self.slider_rect_for(self.nav.selected())
    }

    fn slider_rect_for(&self, index: usize) -> Rectangle {
        let row = match self.nav.mode() {
            DisplayMode::FixedTop => 0,
            DisplayMode::FollowSelection => index.saturating_sub(self.nav.start()),
        };
        let base = self.item_rect(index, row);
        self.config.slider_override.apply(base)
    }
}
