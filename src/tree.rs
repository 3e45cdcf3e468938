//! Menu tree stored as an arena of items.
//!
//! Each sibling array ("menu") is a contiguous run of items in the arena,
//! addressed by a [`MenuRef`]. Parent items point at their child run, so
//! the whole tree lives in one fixed-capacity `heapless::Vec` and is wired
//! once at startup.

use core::fmt;

use heapless::{String, Vec};

use crate::anim::AnimationForm;
use crate::config::LABEL_CAPACITY;
use crate::Error;

/// Index of an item in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ItemId(pub u16);

/// A sibling array: `len` consecutive arena items starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuRef {
    start: u16,
    len: u16,
}

impl MenuRef {
    /// A menu with no items.
    pub const EMPTY: MenuRef = MenuRef { start: 0, len: 0 };

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arena id of the `index`-th entry.
    pub fn item(&self, index: usize) -> Option<ItemId> {
        if index < self.len() {
            Some(ItemId(self.start + index as u16))
        } else {
            None
        }
    }

    fn end(&self) -> usize {
        self.start as usize + self.len as usize
    }
}

/// What an item's action asks the menu to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionResult {
    /// Nothing beyond the action's own side effects.
    None,
    /// Open the exclusive window sequence.
    OpenWindow,
    /// Leave the current submenu.
    Back,
    /// Switch the tween model.
    SetAnimationForm(AnimationForm),
    /// Repaint everything on the next idle tick.
    Redraw,
}

/// Capability invoked when an item is confirmed.
pub trait MenuAction {
    fn invoke(&self) -> ActionResult;
}

/// Action that always yields the same result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command(pub ActionResult);

impl MenuAction for Command {
    fn invoke(&self) -> ActionResult {
        self.0
    }
}

/// Action backed by a closure.
pub struct FnAction<F>(pub F);

impl<F> MenuAction for FnAction<F>
where
    F: Fn() -> ActionResult,
{
    fn invoke(&self) -> ActionResult {
        (self.0)()
    }
}

/// One entry of a menu.
#[derive(Clone)]
pub struct MenuItem<'a> {
    label: String<LABEL_CAPACITY>,
    action: Option<&'a dyn MenuAction>,
    children: Option<MenuRef>,
}

impl<'a> MenuItem<'a> {
    /// Item with no action and no children. Labels longer than
    /// `LABEL_CAPACITY` bytes are cut at a character boundary.
    pub fn new(label: &str) -> Self {
        let mut text = String::new();
        for ch in label.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        Self {
            label: text,
            action: None,
            children: None,
        }
    }

    pub fn with_action(mut self, action: &'a dyn MenuAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_children(mut self, children: MenuRef) -> Self {
        self.children = Some(children);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action(&self) -> Option<&'a dyn MenuAction> {
        self.action
    }

    pub fn children(&self) -> Option<MenuRef> {
        self.children
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}

impl fmt::Debug for MenuItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label.as_str())
            .field("action", &self.action.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Arena holding up to `N` items across every menu.
pub struct MenuTree<'a, const N: usize> {
    items: Vec<MenuItem<'a>, N>,
    root: MenuRef,
}

impl<'a, const N: usize> MenuTree<'a, N> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            root: MenuRef::EMPTY,
        }
    }

    /// Append one sibling array. On overflow nothing is kept.
    pub fn add_menu<I>(&mut self, items: I) -> Result<MenuRef, Error>
    where
        I: IntoIterator<Item = MenuItem<'a>>,
    {
        let start = self.items.len();
        if start > u16::MAX as usize {
            return Err(Error::TreeFull);
        }
        for item in items {
            if let Some(children) = item.children {
                if let Err(e) = self.check(children) {
                    self.items.truncate(start);
                    return Err(e);
                }
            }
            if self.items.push(item).is_err() || self.items.len() > u16::MAX as usize {
                self.items.truncate(start);
                warn!("menu tree full at {} items", start);
                return Err(Error::TreeFull);
            }
        }
        let menu = MenuRef {
            start: start as u16,
            len: (self.items.len() - start) as u16,
        };
        trace!("added menu of {} items at {}", menu.len, menu.start);
        Ok(menu)
    }

    /// Make `parent` open `children` when selected.
    pub fn set_children(&mut self, parent: ItemId, children: MenuRef) -> Result<(), Error> {
        self.check(children)?;
        let item = self
            .items
            .get_mut(parent.0 as usize)
            .ok_or(Error::UnknownItem)?;
        item.children = Some(children);
        Ok(())
    }

    pub fn set_root(&mut self, root: MenuRef) -> Result<(), Error> {
        self.check(root)?;
        self.root = root;
        Ok(())
    }

    pub fn root(&self) -> MenuRef {
        self.root
    }

    pub fn item(&self, id: ItemId) -> Option<&MenuItem<'a>> {
        self.items.get(id.0 as usize)
    }

    /// The `index`-th entry of `menu`.
    pub fn entry(&self, menu: MenuRef, index: usize) -> Option<&MenuItem<'a>> {
        menu.item(index).and_then(|id| self.item(id))
    }

    /// Total items across all menus.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check(&self, menu: MenuRef) -> Result<(), Error> {
        if menu.end() <= self.items.len() {
            Ok(())
        } else {
            Err(Error::InvalidMenu)
        }
    }
}

impl<const N: usize> Default for MenuTree<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
