//! Unified error type for tft-menu.
//!
//! Only construction and configuration can fail; runtime navigation
//! absorbs out-of-range input as a silent no-op. Variants carry no
//! dynamic data so the enum stays `Copy` and `alloc`-free.

use core::fmt;

/// Top-level error type used across the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Menu tree
    /// The item arena has no room for the requested sibling array.
    TreeFull,

    /// An item id does not refer to an item in the arena.
    UnknownItem,

    /// A sibling-array reference points outside the arena.
    InvalidMenu,

    // Configuration
    /// Tick interval is zero, duration is shorter than the interval, or
    /// the history capacity or volume is out of range.
    InvalidConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::TreeFull => "menu tree arena is full",
            Error::UnknownItem => "unknown menu item",
            Error::InvalidMenu => "menu range outside the arena",
            Error::InvalidConfig => "invalid menu configuration",
        };
        f.write_str(msg)
    }
}
