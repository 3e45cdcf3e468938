//! Hierarchical menu controller for small TFT/OLED screens.
//!
//! The crate is `no_std` and split so that everything except the board
//! glue runs on the host:
//!
//! - `tree`: static menu definition (labels, actions, submenus)
//! - `nav`: selection, viewport and history state machine
//! - `anim`: integral and spring tweens driving the slider and title
//!   decorator
//! - `layout`: geometry derived from screen and font metrics
//! - `menu`: the controller tying it together, with incremental redraws
//! - `render`: the drawing and tone traits the controller talks to
//! - `ui`: button mapping and the embedded-graphics backend
//!
//! Usage: `cargo test --lib` on the host. The demo firmware in `main.rs`
//! needs `--features embedded` and the thumbv7em target.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod anim;
#[cfg(feature = "embedded")]
pub mod buzzer;
pub mod config;
pub mod error;
pub mod layout;
pub mod menu;
pub mod nav;
pub mod render;
pub mod tree;
pub mod ui;

#[cfg(test)]
mod testing;

pub use anim::AnimationForm;
pub use config::{MenuConfig, SliderOverride};
pub use error::Error;
pub use layout::Layout;
pub use menu::{MenuSystem, NavState};
pub use nav::DisplayMode;
pub use render::{RenderSurface, Silent, Style, ToneDevice};
pub use tree::{ActionResult, Command, FnAction, ItemId, MenuAction, MenuItem, MenuRef, MenuTree};
pub use ui::InputEvent;
