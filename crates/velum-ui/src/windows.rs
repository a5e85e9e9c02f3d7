//! Registry of shown top-level windows.
//!
//! Entries are kept in recency order: the front entry is the window that
//! most recently received an event, except while a modal window is
//! active, in which case lookups leave the order untouched so the modal
//! stack stays intact. Entry creation and removal belong to the window
//! show/hide lifecycle; the registry only stores and orders.

use indexmap::IndexMap;

use crate::damage::Region;
use crate::tree::WidgetId;

/// Opaque handle of a native platform window, assigned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// One shown top-level window.
#[derive(Debug)]
pub struct WindowEntry {
    pub widget: WidgetId,
    pub native: NativeHandle,
    /// Fine-grained damage accumulated since the last flush.
    pub region: Option<Region>,
    /// Set until the platform reports the first expose; flush skips the
    /// window (and keeps the global damage flag raised) until then.
    pub wait_for_expose: bool,
}

#[derive(Default)]
pub struct WindowRegistry {
    entries: IndexMap<NativeHandle, WindowEntry>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register a newly shown window at the front of the order.
    pub fn add(&mut self, widget: WidgetId, native: NativeHandle) {
        if self.entries.contains_key(&native) {
            return;
        }
        self.entries.shift_insert(
            0,
            native,
            WindowEntry {
                widget,
                native,
                region: None,
                wait_for_expose: true,
            },
        );
    }

    /// Drop the entry of a hidden/destroyed window, if present.
    pub fn remove_widget(&mut self, widget: WidgetId) {
        if let Some(index) = self.index_of_widget(widget) {
            self.entries.shift_remove_index(index);
        }
    }

    /// Map a native handle back to its window and promote the entry to
    /// the front, unless a modal window is active, to avoid disturbing
    /// the modal ordering.
    pub fn find(&mut self, native: NativeHandle, modal_active: bool) -> Option<WidgetId> {
        let index = self.entries.get_index_of(&native)?;
        if index != 0 && !modal_active {
            self.entries.move_index(index, 0);
            return self.entries.get_index(0).map(|(_, e)| e.widget);
        }
        self.entries.get_index(index).map(|(_, e)| e.widget)
    }

    /// Promote a shown window to the front. No-op for unregistered
    /// windows and while a modal window is active.
    pub fn set_first(&mut self, widget: WidgetId, modal_active: bool) {
        let Some(native) = self.entry(widget).map(|e| e.native) else {
            return;
        };
        self.find(native, modal_active);
    }

    /// Most recently interacted-with window (the topmost modal one while
    /// a modal window is shown).
    pub fn first(&self) -> Option<WidgetId> {
        self.entries.get_index(0).map(|(_, e)| e.widget)
    }

    /// The window after `widget` in recency order.
    pub fn next(&self, widget: WidgetId) -> Option<WidgetId> {
        let index = self.index_of_widget(widget)?;
        self.entries.get_index(index + 1).map(|(_, e)| e.widget)
    }

    pub fn shown(&self, widget: WidgetId) -> bool {
        self.index_of_widget(widget).is_some()
    }

    pub fn entry(&self, widget: WidgetId) -> Option<&WindowEntry> {
        self.entries.values().find(|e| e.widget == widget)
    }

    pub fn entry_mut(&mut self, widget: WidgetId) -> Option<&mut WindowEntry> {
        self.entries.values_mut().find(|e| e.widget == widget)
    }

    pub fn entry_by_native(&self, native: NativeHandle) -> Option<&WindowEntry> {
        self.entries.get(&native)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.values()
    }

    pub fn iter_widgets(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.entries.values().map(|e| e.widget)
    }

    fn index_of_widget(&self, widget: WidgetId) -> Option<usize> {
        self.entries.values().position(|e| e.widget == widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::WidgetTree;
    use crate::widgets::Window;
    use std::rc::Rc;
    use velum_core::geometry::Rect;

    fn two_windows() -> (WindowRegistry, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new();
        let a = tree.insert(Rc::new(Window::new()), Rect::new(0, 0, 100, 100));
        let b = tree.insert(Rc::new(Window::new()), Rect::new(0, 0, 100, 100));
        let mut registry = WindowRegistry::new();
        registry.add(a, NativeHandle(1));
        registry.add(b, NativeHandle(2));
        (registry, a, b)
    }

    #[test]
    fn test_add_puts_newest_first() {
        let (registry, a, b) = two_windows();
        assert_eq!(registry.first(), Some(b));
        assert_eq!(registry.next(b), Some(a));
        assert_eq!(registry.next(a), None);
    }

    #[test]
    fn test_find_promotes_without_modal() {
        let (mut registry, a, b) = two_windows();
        assert_eq!(registry.find(NativeHandle(1), false), Some(a));
        assert_eq!(registry.first(), Some(a));
        assert_eq!(registry.next(a), Some(b));
    }

    #[test]
    fn test_find_keeps_order_under_modal() {
        let (mut registry, a, b) = two_windows();
        assert_eq!(registry.find(NativeHandle(1), true), Some(a));
        assert_eq!(registry.first(), Some(b));
        assert_eq!(registry.next(b), Some(a));
    }

    #[test]
    fn test_set_first_ignores_unshown() {
        let (mut registry, a, b) = two_windows();
        registry.remove_widget(a);
        registry.set_first(a, false);
        assert_eq!(registry.first(), Some(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_unknown_native() {
        let (mut registry, _a, b) = two_windows();
        assert_eq!(registry.find(NativeHandle(9), false), None);
        assert_eq!(registry.first(), Some(b));
    }
}
