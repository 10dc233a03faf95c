//! Focusable handles registered by the rendering layer.

use std::cell::Cell;
use std::rc::Rc;

/// A per-slot handle the controller can focus or unfocus.
///
/// The rendering layer owns what focus actually means (a terminal focus flag,
/// a DOM element, a native widget). When the controller focuses slot N it
/// marks that handle focused and every other registered handle unfocused.
pub trait SlotFocus {
    fn set_focused(&self, focused: bool);
}

impl<T: SlotFocus + ?Sized> SlotFocus for Rc<T> {
    fn set_focused(&self, focused: bool) {
        (**self).set_focused(focused);
    }
}

/// Minimal shared focus flag for hosts without a focus system of their own.
#[derive(Debug, Clone, Default)]
pub struct SharedFocusFlag(Rc<Cell<bool>>);

impl SharedFocusFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_focused(&self) -> bool {
        self.0.get()
    }
}

impl SlotFocus for SharedFocusFlag {
    fn set_focused(&self, focused: bool) {
        self.0.set(focused);
    }
}

/// Index of the first focused flag, if any.
pub fn focused_index(flags: &[SharedFocusFlag]) -> Option<usize> {
    flags.iter().position(SharedFocusFlag::is_focused)
}
