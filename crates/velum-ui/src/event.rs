//! Event kinds and the per-event state block.
//!
//! Native platform events are translated by the platform driver into the
//! closed set of [`Event`] kinds below, together with an [`EventData`]
//! payload. The [`Ui`](crate::Ui) context applies the payload to its
//! [`EventState`] before routing, so widget code can query event
//! attributes (position, button, key, modifiers) through accessors
//! instead of carrying a context argument through every `handle` call.

use bitflags::bitflags;
use velum_core::geometry::Rect;

/// The closed set of toolkit events a widget can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Placeholder before any event has been dispatched.
    NoEvent,
    /// Mouse button went down over a window.
    Press,
    /// Mouse button released; delivered to the captured widget if any.
    Release,
    /// Pointer motion with no capture active.
    Move,
    /// Pointer motion while a widget holds the capture.
    Drag,
    /// Literal keystroke, delivered along the focus chain.
    KeyDown,
    /// Key released; focus chain only, never promoted to a shortcut.
    KeyUp,
    /// Mnemonic search after an unconsumed keystroke.
    Shortcut,
    /// Pointer entered a window (or a widget, during probes).
    Enter,
    /// Pointer left a window or widget.
    Leave,
    /// The platform gave a window keyboard focus.
    Focus,
    /// The platform took keyboard focus away.
    Unfocus,
    /// Widget became visible; lifecycle hook, not the window-system call.
    Show,
    /// Widget became invisible.
    Hide,
    /// The user asked a window to close.
    Close,
    /// Widget subtree became active.
    Activate,
    /// Widget subtree became inactive.
    Deactivate,
    /// Scroll wheel or trackpad scroll.
    MouseWheel,
    /// Drag-and-drop payload entered a window.
    DndEnter,
    /// Drag-and-drop payload moved within a window.
    DndDrag,
    /// Drag-and-drop payload left without dropping.
    DndLeave,
    /// Drag-and-drop payload was dropped.
    DndRelease,
    /// Escape hatch for native/system events the toolkit does not model.
    Other(u32),
}

/// Mouse button that triggered a press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Logical key identity for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    F(u8),
    Shift,
    Control,
    Alt,
    Super,
    CapsLock,
}

impl Key {
    /// The same key with the letter case swapped, if it is a letter.
    /// Used to retry unconsumed keystrokes as case-insensitive mnemonics.
    pub fn swap_case(self) -> Option<Key> {
        match self {
            Key::Char(c) if c.is_alphabetic() => {
                let swapped = if c.is_uppercase() {
                    c.to_lowercase().next()?
                } else {
                    c.to_uppercase().next()?
                };
                (swapped != c).then_some(Key::Char(swapped))
            }
            _ => None,
        }
    }
}

bitflags! {
    /// Modifier and button state at the time of the current event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const SHIFT       = 0b0000_0000_0001;
        const CAPS_LOCK   = 0b0000_0000_0010;
        const CTRL        = 0b0000_0000_0100;
        const ALT         = 0b0000_0000_1000;
        const NUM_LOCK    = 0b0000_0001_0000;
        const META        = 0b0000_0010_0000;
        const SCROLL_LOCK = 0b0000_0100_0000;
        const BUTTON1     = 0b0000_1000_0000;
        const BUTTON2     = 0b0001_0000_0000;
        const BUTTON3     = 0b0010_0000_0000;
    }
}

impl Modifiers {
    pub fn any_button(&self) -> bool {
        self.intersects(Self::BUTTON1 | Self::BUTTON2 | Self::BUTTON3)
    }
}

/// Attributes of the event currently being dispatched.
///
/// `x`/`y` are relative to the window the event is routed through; the
/// dispatcher re-bases them while descending into nested windows.
#[derive(Debug, Clone)]
pub struct EventState {
    pub(crate) event: Event,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) x_root: i32,
    pub(crate) y_root: i32,
    pub(crate) dx: i32,
    pub(crate) dy: i32,
    pub(crate) button: MouseButton,
    pub(crate) clicks: i32,
    pub(crate) is_click: bool,
    pub(crate) key: Option<Key>,
    pub(crate) original_key: Option<Key>,
    pub(crate) text: String,
    pub(crate) modifiers: Modifiers,
    pub(crate) clipboard: Option<String>,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            event: Event::NoEvent,
            x: 0,
            y: 0,
            x_root: 0,
            y_root: 0,
            dx: 0,
            dy: 0,
            button: MouseButton::Left,
            clicks: 0,
            is_click: false,
            key: None,
            original_key: None,
            text: String::new(),
            modifiers: Modifiers::empty(),
            clipboard: None,
        }
    }
}

impl EventState {
    /// True if the current pointer position falls inside `rect`.
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }
}

/// Payload attached to a translated native event by the platform driver.
#[derive(Debug, Clone, Default)]
pub struct EventData {
    pub x: i32,
    pub y: i32,
    pub x_root: i32,
    pub y_root: i32,
    pub dx: i32,
    pub dy: i32,
    pub button: Option<MouseButton>,
    pub key: Option<Key>,
    pub clicks: i32,
    pub text: String,
    pub modifiers: Modifiers,
    pub clipboard: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_case_letters() {
        assert_eq!(Key::Char('a').swap_case(), Some(Key::Char('A')));
        assert_eq!(Key::Char('Z').swap_case(), Some(Key::Char('z')));
    }

    #[test]
    fn test_swap_case_non_letters() {
        assert_eq!(Key::Char('3').swap_case(), None);
        assert_eq!(Key::Escape.swap_case(), None);
        assert_eq!(Key::F(1).swap_case(), None);
    }

    #[test]
    fn test_any_button() {
        assert!(!Modifiers::SHIFT.any_button());
        assert!((Modifiers::SHIFT | Modifiers::BUTTON1).any_button());
        assert!(Modifiers::BUTTON3.any_button());
    }

    #[test]
    fn test_state_inside_uses_window_relative_coords() {
        let state = EventState {
            x: 12,
            y: 8,
            ..Default::default()
        };
        assert!(state.inside(&Rect::new(10, 5, 10, 10)));
        assert!(!state.inside(&Rect::new(20, 5, 10, 10)));
    }
}
