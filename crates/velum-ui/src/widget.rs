//! The widget behavior trait and per-widget flags.

use bitflags::bitflags;

use crate::context::Ui;
use crate::event::Event;
use crate::tree::WidgetId;

bitflags! {
    /// Per-widget state flags stored on the tree node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u16 {
        /// The widget itself is deactivated (events and shortcuts skip it).
        const INACTIVE       = 0b0000_0001;
        /// The widget itself is hidden.
        const INVISIBLE      = 0b0000_0010;
        /// Display-only widget; never receives events or focus.
        const OUTPUT         = 0b0000_0100;
        /// The widget may take keyboard focus.
        const VISIBLE_FOCUS  = 0b0000_1000;
        /// The user changed the widget's value since the last callback.
        const CHANGED        = 0b0001_0000;
        /// The label carries an underlined mnemonic character.
        const SHORTCUT_LABEL = 0b0010_0000;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        WidgetFlags::VISIBLE_FOCUS
    }
}

/// Behavior of a widget, attached to a tree node.
///
/// The core never inspects drawing; it only routes events through this
/// trait and asks for the window capability. Implementations keep their
/// own state behind interior mutability (`Cell`/`RefCell`) because event
/// delivery may legitimately re-enter the same widget: a press handler
/// that offers itself the focus receives the resulting `Focus` probe
/// before the press handler returns.
///
/// Any `WidgetId` held across a call into `ui` (including `self_id`) may
/// have been invalidated by the time the call returns; re-check with
/// [`Ui::exists`] or hold a [`WidgetTracker`](crate::watch::WidgetTracker)
/// before touching it again.
pub trait Widget: 'static {
    /// Handle one event. Return `true` to consume it.
    fn handle(&self, ui: &mut Ui, self_id: WidgetId, event: Event) -> bool {
        let _ = (ui, self_id, event);
        false
    }

    /// Called when the widget transitions to visible.
    fn on_show(&self, ui: &mut Ui, self_id: WidgetId) {
        let _ = (ui, self_id);
    }

    /// Called when the widget transitions to hidden.
    fn on_hide(&self, ui: &mut Ui, self_id: WidgetId) {
        let _ = (ui, self_id);
    }

    /// Window capability probe; replaces a numeric type-tag comparison.
    fn is_window(&self) -> bool {
        false
    }
}
