//! Navigation state: open menu, selection, viewport and history.
//!
//! Pure bookkeeping with no drawing or timing; the menu system turns each
//! outcome into slider animation and redraw requests.

use core::ops::Range;

use heapless::Vec;

use crate::config::MAX_HISTORY_DEPTH;
use crate::tree::MenuRef;

/// How the viewport follows the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Scroll by the minimum needed to keep the selection visible.
    FollowSelection,
    /// Pin the selection to the first visible row.
    FixedTop,
}

/// How the slider should reach the new selection after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SliderMove {
    /// Nothing changed.
    None,
    /// Selection moved within the viewport; animate.
    Tween,
    /// The viewport scrolled; jump.
    Snap,
}

/// Position saved when descending into a submenu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HistoryEntry {
    pub menu: MenuRef,
    pub selected: usize,
    pub start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigator {
    menu: MenuRef,
    selected: usize,
    start: usize,
    max_visible: usize,
    mode: DisplayMode,
    history: Vec<HistoryEntry, MAX_HISTORY_DEPTH>,
    capacity: usize,
}

impl Navigator {
    /// Start at the first item of `root`. `capacity` is the deepest
    /// nesting accepted, capped at `MAX_HISTORY_DEPTH`.
    pub fn new(root: MenuRef, max_visible: usize, mode: DisplayMode, capacity: usize) -> Self {
        Self {
            menu: root,
            selected: 0,
            start: 0,
            max_visible: max_visible.max(1),
            mode,
            history: Vec::new(),
            capacity: capacity.min(MAX_HISTORY_DEPTH),
        }
    }

    pub fn menu(&self) -> MenuRef {
        self.menu
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Entry the current menu was opened from, if any.
    pub fn parent(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// Indices currently on screen.
    pub fn visible(&self) -> Range<usize> {
        let end = (self.start + self.max_visible).min(self.menu.len());
        self.start.min(end)..end
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible().contains(&index)
    }

    pub fn select_next(&mut self) -> SliderMove {
        if self.selected + 1 >= self.menu.len() {
            return SliderMove::None;
        }
        self.selected += 1;
        match self.mode {
            DisplayMode::FixedTop => {
                self.start = self.selected;
                SliderMove::Snap
            }
            DisplayMode::FollowSelection => {
                if self.selected >= self.start + self.max_visible {
                    self.start = self.selected + 1 - self.max_visible;
                    SliderMove::Snap
                } else {
                    SliderMove::Tween
                }
            }
        }
    }

    pub fn select_prev(&mut self) -> SliderMove {
        if self.selected == 0 || self.menu.is_empty() {
            return SliderMove::None;
        }
        self.selected -= 1;
        match self.mode {
            DisplayMode::FixedTop => {
                self.start = self.selected;
                SliderMove::Snap
            }
            DisplayMode::FollowSelection => {
                if self.selected < self.start {
                    self.start = self.selected;
                    SliderMove::Snap
                } else {
                    SliderMove::Tween
                }
            }
        }
    }

    /// Open `child`, remembering the current position. Refused (returns
    /// `false`) once the history holds `capacity` entries.
    pub fn descend(&mut self, child: MenuRef) -> bool {
        if self.history.len() >= self.capacity {
            return false;
        }
        let entry = HistoryEntry {
            menu: self.menu,
            selected: self.selected,
            start: self.start,
        };
        if self.history.push(entry).is_err() {
            return false;
        }
        self.menu = child;
        self.selected = 0;
        self.start = 0;
        true
    }

    /// Return to the parent menu. `false` at the root.
    pub fn ascend(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        self.menu = entry.menu;
        self.selected = entry.selected.min(entry.menu.len().saturating_sub(1));
        self.start = entry.start;
        self.fit();
        true
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        self.fit();
    }

    /// Adopt a new row capacity after a layout change.
    pub fn refit(&mut self, max_visible: usize) {
        self.max_visible = max_visible.max(1);
        self.fit();
    }

    /// Re-establish the viewport invariant for the active mode.
    fn fit(&mut self) {
        match self.mode {
            DisplayMode::FixedTop => self.start = self.selected,
            DisplayMode::FollowSelection => {
                if self.selected >= self.start + self.max_visible {
                    self.start = self.selected + 1 - self.max_visible;
                } else if self.selected < self.start {
                    self.start = self.selected;
                }
                let len = self.menu.len();
                if self.start > 0 && self.start + self.max_visible > len {
                    self.start = len.saturating_sub(self.max_visible);
                }
            }
        }
    }
}
