//! Integration tests for the public menu API: a realistic tree driven
//! the way the firmware drives it.

use std::cell::Cell;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use tft_menu::ui::input_logic::classify_press;
use tft_menu::ui::{ButtonEvent, InputEvent};
use tft_menu::{
    ActionResult, AnimationForm, Command, FnAction, MenuConfig, MenuItem, MenuSystem, MenuTree,
    NavState, RenderSurface, Style, ToneDevice,
};

/// Counts draw calls and keeps the drawn strings.
#[derive(Default)]
struct Screen {
    clears: usize,
    shapes: usize,
    texts: Vec<String>,
}

impl RenderSurface for Screen {
    type Color = Rgb565;

    fn size(&self) -> Size {
        Size::new(160, 128)
    }

    fn fill_screen(&mut self, _color: Rgb565) {
        self.clears += 1;
    }

    fn fill_rect(&mut self, _rect: Rectangle, _color: Rgb565) {
        self.shapes += 1;
    }

    fn fill_round_rect(&mut self, _rect: Rectangle, _radius: u32, _color: Rgb565) {
        self.shapes += 1;
    }

    fn stroke_round_rect(&mut self, _rect: Rectangle, _radius: u32, _color: Rgb565) {
        self.shapes += 1;
    }

    fn fill_triangle(&mut self, _a: Point, _b: Point, _c: Point, _color: Rgb565) {
        self.shapes += 1;
    }

    fn draw_text(&mut self, text: &str, _top_left: Point, _font_size: u8, _color: Rgb565) {
        self.texts.push(text.to_string());
    }

    fn text_width(&self, text: &str, font_size: u8) -> u32 {
        text.len() as u32 * 6 * u32::from(font_size)
    }

    fn font_height(&self, font_size: u8) -> u32 {
        8 * u32::from(font_size)
    }
}

#[derive(Default)]
struct Tones(Vec<u16>);

impl ToneDevice for Tones {
    fn beep(&mut self, duration_ms: u16, _frequency_hz: u16, _volume: u8) {
        self.0.push(duration_ms);
    }
}

static STABLE: Command = Command(ActionResult::SetAnimationForm(AnimationForm::Integral));
static BOUNCE: Command = Command(ActionResult::SetAnimationForm(AnimationForm::Spring));
static BACK: Command = Command(ActionResult::Back);
static OPEN_WINDOW: Command = Command(ActionResult::OpenWindow);

fn demo_tree() -> MenuTree<'static, 16> {
    let mut tree = MenuTree::new();
    let form = tree
        .add_menu([
            MenuItem::new("Stable").with_action(&STABLE),
            MenuItem::new("Bounce").with_action(&BOUNCE),
            MenuItem::new("Back").with_action(&BACK),
        ])
        .unwrap();
    let para = tree
        .add_menu([
            MenuItem::new("Delay Time").with_action(&OPEN_WINDOW),
            MenuItem::new("Step").with_action(&OPEN_WINDOW),
            MenuItem::new("Back").with_action(&BACK),
        ])
        .unwrap();
    let animation = tree
        .add_menu([
            MenuItem::new("Form").with_children(form),
            MenuItem::new("Para").with_children(para),
            MenuItem::new("Back").with_action(&BACK),
        ])
        .unwrap();
    let setting = tree
        .add_menu([
            MenuItem::new("Animation").with_children(animation),
            MenuItem::new("Buzz vol").with_action(&OPEN_WINDOW),
            MenuItem::new("Back").with_action(&BACK),
        ])
        .unwrap();
    let root = tree
        .add_menu([
            MenuItem::new("Main"),
            MenuItem::new("Setting").with_children(setting),
        ])
        .unwrap();
    tree.set_root(root).unwrap();
    tree
}

fn run_until_idle<const N: usize>(menu: &mut MenuSystem<'_, Screen, Tones, N>, now: &mut u64) {
    for _ in 0..1000 {
        *now += 15;
        menu.tick(*now);
        if menu.state() == NavState::Idle && !menu.needs_full_redraw() {
            return;
        }
    }
    panic!("menu kept animating");
}

#[test]
fn walk_into_form_and_switch_to_spring() {
    let tree = demo_tree();
    let mut menu = MenuSystem::new(
        &tree,
        Screen::default(),
        Tones::default(),
        MenuConfig::default(),
        Style::dark(),
    )
    .unwrap();
    let mut now = 0;
    run_until_idle(&mut menu, &mut now);
    assert_eq!(menu.title(), "Root Menu");

    for event in [InputEvent::Next, InputEvent::Select] {
        menu.handle(event);
        run_until_idle(&mut menu, &mut now);
    }
    assert_eq!(menu.current_depth(), 1);
    assert_eq!(menu.title(), "Setting");

    menu.handle(InputEvent::Select);
    run_until_idle(&mut menu, &mut now);
    menu.handle(InputEvent::Select);
    run_until_idle(&mut menu, &mut now);
    assert_eq!(menu.current_depth(), 3);
    assert_eq!(menu.title(), "Form");

    menu.handle(InputEvent::Next);
    menu.handle(InputEvent::Select);
    assert_eq!(menu.config().animation_form, AnimationForm::Spring);
    assert_eq!(menu.current_depth(), 3);
    run_until_idle(&mut menu, &mut now);

    // The item labelled "Back" leaves the submenu like a long press.
    menu.handle(InputEvent::Next);
    menu.handle(InputEvent::Select);
    run_until_idle(&mut menu, &mut now);
    assert_eq!(menu.current_depth(), 2);
    assert_eq!(menu.title(), "Animation");
    assert_eq!(menu.current_selection_index(), 0);
    assert!(menu.surface().texts.iter().any(|t| t == "Para"));
}

#[test]
fn window_blocks_navigation_until_back() {
    let tree = demo_tree();
    let mut menu = MenuSystem::new(
        &tree,
        Screen::default(),
        Tones::default(),
        MenuConfig::default(),
        Style::dark(),
    )
    .unwrap();
    let mut now = 0;
    menu.handle(InputEvent::Next);
    menu.handle(InputEvent::Select);
    run_until_idle(&mut menu, &mut now);
    menu.handle(InputEvent::Next);
    run_until_idle(&mut menu, &mut now);

    menu.handle(InputEvent::Select);
    assert!(menu.is_window_open());
    assert_eq!(menu.state(), NavState::OperationBanned);
    while menu.is_animating() {
        now += 15;
        menu.tick(now);
        assert!(now < 60_000, "window never finished opening");
    }
    assert_eq!(menu.state(), NavState::OperationBanned);

    menu.handle(InputEvent::Prev);
    menu.handle(InputEvent::Select);
    assert_eq!(menu.current_selection_index(), 1);
    assert_eq!(menu.current_depth(), 1);

    let long = classify_press(ButtonEvent::Select, 900);
    assert_eq!(long, InputEvent::Back);
    menu.handle(long);
    assert!(!menu.is_window_open());
    assert!(!menu.is_operation_banned());
    run_until_idle(&mut menu, &mut now);
    assert_eq!(menu.current_depth(), 1);
    assert_eq!(menu.slider_rect(), menu.slider_target());
}

#[test]
fn closures_run_on_select() {
    let hits = Cell::new(0);
    let count = FnAction(|| {
        hits.set(hits.get() + 1);
        ActionResult::None
    });
    let mut tree: MenuTree<'_, 4> = MenuTree::new();
    let root = tree
        .add_menu([MenuItem::new("Count").with_action(&count), MenuItem::new("Idle")])
        .unwrap();
    tree.set_root(root).unwrap();

    let mut menu = MenuSystem::new(
        &tree,
        Screen::default(),
        Tones::default(),
        MenuConfig::default().with_volume(0),
        Style::dark(),
    )
    .unwrap();
    menu.select();
    menu.select();
    menu.select_next();
    menu.select();
    assert_eq!(hits.get(), 2);
    assert!(menu.tone().0.is_empty());
}

#[test]
fn back_at_root_is_silent() {
    let tree = demo_tree();
    let mut menu = MenuSystem::new(
        &tree,
        Screen::default(),
        Tones::default(),
        MenuConfig::default(),
        Style::dark(),
    )
    .unwrap();
    menu.handle(InputEvent::Back);
    assert_eq!(menu.current_depth(), 0);
    assert!(menu.tone().0.is_empty());

    menu.handle(InputEvent::Next);
    menu.handle(InputEvent::Select);
    menu.handle(InputEvent::Back);
    assert_eq!(menu.current_depth(), 0);
    assert_eq!(menu.current_selection_index(), 1);
    assert_eq!(menu.tone().0, [20, 20, 100]);
}

#[test]
fn first_tick_paints_the_whole_screen() {
    let tree = demo_tree();
    let mut menu = MenuSystem::new(
        &tree,
        Screen::default(),
        Tones::default(),
        MenuConfig::default(),
        Style::dark(),
    )
    .unwrap();
    menu.tick(0);
    let screen = menu.surface();
    assert_eq!(screen.clears, 1);
    assert!(screen.shapes > 0);
    for label in ["Root Menu", "Main", "Setting"] {
        assert!(screen.texts.iter().any(|t| t == label), "missing {label}");
    }
}
