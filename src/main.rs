//! Demo firmware: nRF52840 + SSD1306 OLED + three buttons + piezo.
//!
//! ## Architecture
//!
//! ```text
//!  [UP/DOWN/SELECT] --button tasks--> [event channel] --+
//!                                                        v
//!  [ticker, every animation interval] -----------> [menu loop] --> SSD1306
//!                                                        |
//!                                                        +------> buzzer
//! ```
//!
//! The menu loop owns the controller: it applies input events as they
//! arrive, advances animations on every tick, flushes the frame buffer
//! and lets the buzzer stop finished tones.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tft_menu::buzzer::Buzzer;
use tft_menu::config::ANIM_INTERVAL_MS;
use tft_menu::ui::buttons::{self, EventSender, EVENT_QUEUE_DEPTH};
use tft_menu::ui::{display, ButtonEvent, InputEvent};
use tft_menu::{
    ActionResult, AnimationForm, Command, MenuConfig, MenuItem, MenuSystem, MenuTree, Style,
};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Room for every item of the demo tree.
const TREE_CAPACITY: usize = 16;

type DemoTree = MenuTree<'static, TREE_CAPACITY>;

static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH> = Channel::new();
static TREE: StaticCell<DemoTree> = StaticCell::new();

static STABLE: Command = Command(ActionResult::SetAnimationForm(AnimationForm::Integral));
static BOUNCE: Command = Command(ActionResult::SetAnimationForm(AnimationForm::Spring));
static BACK: Command = Command(ActionResult::Back);
static OPEN_WINDOW: Command = Command(ActionResult::OpenWindow);

/// Main
/// Setting
///   Animation
///     Form: Stable / Bounce / Back
///     Para: Delay Time / Step / Back
///     Back
///   Buzz vol
///   Back
fn build_tree(tree: &mut DemoTree) -> Result<(), tft_menu::Error> {
    let form = tree.add_menu([
        MenuItem::new("Stable").with_action(&STABLE),
        MenuItem::new("Bounce").with_action(&BOUNCE),
        MenuItem::new("Back").with_action(&BACK),
    ])?;
    let para = tree.add_menu([
        MenuItem::new("Delay Time").with_action(&OPEN_WINDOW),
        MenuItem::new("Step").with_action(&OPEN_WINDOW),
        MenuItem::new("Back").with_action(&BACK),
    ])?;
    let animation = tree.add_menu([
        MenuItem::new("Form").with_children(form),
        MenuItem::new("Para").with_children(para),
        MenuItem::new("Back").with_action(&BACK),
    ])?;
    let setting = tree.add_menu([
        MenuItem::new("Animation").with_children(animation),
        MenuItem::new("Buzz vol").with_action(&OPEN_WINDOW),
        MenuItem::new("Back").with_action(&BACK),
    ])?;
    let root = tree.add_menu([
        MenuItem::new("Main"),
        MenuItem::new("Setting").with_children(setting),
    ])?;
    tree.set_root(root)
}

#[embassy_executor::task(pool_size = 3)]
async fn button(pin: AnyPin, kind: ButtonEvent, tx: EventSender) -> ! {
    buttons::button_task(pin, kind, &tx).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tft-menu demo starting");

    let p = embassy_nrf::init(Default::default());

    // Display: SDA = P0.26, SCL = P0.27.
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let surface = display::init(i2c);

    // Buzzer on P0.13.
    let buzzer = Buzzer::new(SimplePwm::new_1ch(p.PWM0, p.P0_13));

    let tree = TREE.init(MenuTree::new());
    unwrap!(build_tree(tree));
    let tree: &'static DemoTree = tree;

    let mut menu = unwrap!(MenuSystem::new(
        tree,
        surface,
        buzzer,
        MenuConfig::default(),
        Style::monochrome(),
    ));

    let tx = EVENTS.sender();
    unwrap!(spawner.spawn(button(p.P0_11.degrade(), ButtonEvent::Up, tx)));
    unwrap!(spawner.spawn(button(p.P0_12.degrade(), ButtonEvent::Down, tx)));
    unwrap!(spawner.spawn(button(p.P0_24.degrade(), ButtonEvent::Select, tx)));
    info!("menu ready, {} items", tree.len());

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(ANIM_INTERVAL_MS)));
    loop {
        match select(EVENTS.receive(), ticker.next()).await {
            Either::First(event) => {
                info!("input {}", event);
                menu.handle(event);
            }
            Either::Second(()) => {}
        }
        menu.tick(Instant::now().as_millis());
        display::flush(menu.surface_mut());
        menu.tone_mut().poll();
    }
}
