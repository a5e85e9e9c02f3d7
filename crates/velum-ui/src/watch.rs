//! Deferred widget deletion and the handle-watch registry.
//!
//! Callbacks may destroy any widget, including the one currently being
//! delivered to. Two mechanisms make that safe:
//!
//! - [`Ui::delete_widget`] hides a widget immediately but defers the
//!   actual destruction to the top of the next event-loop wait, so no
//!   dispatch in flight can reach freed state.
//! - The watch registry lets a caller park a widget handle in a shared
//!   cell before invoking user code; if the widget dies, the cell is
//!   nulled. [`WidgetTracker`] wraps register/release as an RAII guard.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::context::Ui;
use crate::tree::WidgetId;

/// A watched widget handle. Reads `None` once the widget is destroyed.
pub type WatchHandle = Rc<Cell<Option<WidgetId>>>;

/// Flat list of watched handle cells.
#[derive(Default, Clone)]
pub struct WatchList {
    cells: Rc<RefCell<Vec<WatchHandle>>>,
}

impl WatchList {
    /// Create and register a new watched cell for `id`.
    pub fn watch(&self, id: WidgetId) -> WatchHandle {
        let cell: WatchHandle = Rc::new(Cell::new(Some(id)));
        self.register(&cell);
        cell
    }

    /// Register an existing cell. Registering the same cell twice is
    /// harmless.
    pub fn register(&self, cell: &WatchHandle) {
        let mut cells = self.cells.borrow_mut();
        if cells.iter().any(|c| Rc::ptr_eq(c, cell)) {
            return;
        }
        cells.push(cell.clone());
    }

    /// Stop watching a cell. Releasing a cell that was never registered
    /// is harmless.
    pub fn release(&self, cell: &WatchHandle) {
        self.cells.borrow_mut().retain(|c| !Rc::ptr_eq(c, cell));
    }

    /// Null every registered cell that refers to `id`. Called on widget
    /// destruction.
    pub fn clear(&self, id: WidgetId) {
        for cell in self.cells.borrow().iter() {
            if cell.get() == Some(id) {
                cell.set(None);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }
}

/// RAII guard around a watched handle: registers on construction,
/// releases on drop.
///
/// ```ignore
/// let tracker = ui.tracker(button);
/// ui.do_callback(button);            // may destroy `button`
/// if tracker.exists() {
///     ui.redraw(tracker.widget().unwrap());
/// }
/// ```
pub struct WidgetTracker {
    list: WatchList,
    cell: WatchHandle,
}

impl WidgetTracker {
    pub fn new(ui: &Ui, id: WidgetId) -> Self {
        let list = ui.watch.clone();
        let cell = list.watch(id);
        Self { list, cell }
    }

    /// The tracked widget, or `None` if it has been destroyed.
    pub fn widget(&self) -> Option<WidgetId> {
        self.cell.get()
    }

    pub fn deleted(&self) -> bool {
        self.cell.get().is_none()
    }

    pub fn exists(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Drop for WidgetTracker {
    fn drop(&mut self) {
        self.list.release(&self.cell);
    }
}

impl Ui {
    /// Park `id` in a watched cell; the cell reads `None` after the
    /// widget is destroyed. Pair with [`Ui::release_watch`], or use
    /// [`Ui::tracker`] for the RAII form.
    pub fn watch_widget(&self, id: WidgetId) -> WatchHandle {
        self.watch.watch(id)
    }

    pub fn release_watch(&self, cell: &WatchHandle) {
        self.watch.release(cell);
    }

    pub fn tracker(&self, id: WidgetId) -> WidgetTracker {
        WidgetTracker::new(self, id)
    }

    /// Schedule a widget for destruction at the next safe point.
    ///
    /// The widget is hidden immediately (a shown window is unmapped even
    /// if iconified), so it receives no further events; its storage is
    /// reclaimed at the top of the next [`Ui::wait`]. Scheduling the
    /// same widget twice destroys it once.
    pub fn delete_widget(&mut self, id: WidgetId) {
        if !self.tree.exists(id) {
            return;
        }
        if self.tree.visible_r(id) {
            self.hide_widget(id);
        }
        if self.tree.is_window(id) && self.windows.shown(id) {
            self.unmap_window(id);
        }
        if !self.pending_delete.contains(&id) {
            self.pending_delete.push(id);
        }
    }

    /// Destroy widgets previously scheduled with [`Ui::delete_widget`],
    /// in the order they were scheduled. Runs at the top of every wait;
    /// applications normally never call it directly.
    pub fn do_widget_deletion(&mut self) {
        let pending = std::mem::take(&mut self.pending_delete);
        for id in pending {
            self.destroy_widget(id);
        }
    }

    /// Destroy a widget and its subtree immediately.
    ///
    /// Children are destroyed first, depth-first. Every process-wide
    /// reference into the subtree (focus, capture, grab, modal, tooltip,
    /// registry entry, watched handles) is cleared before the storage is
    /// reclaimed.
    pub fn destroy_widget(&mut self, id: WidgetId) {
        if !self.tree.exists(id) {
            return;
        }
        let children = self.tree.children(id).to_vec();
        for child in children {
            self.destroy_widget(child);
        }

        // detach before throwing focus so nothing lands on the parent
        self.tree.remove_from_parent(id);
        self.windows.remove_widget(id);
        if self.tree.contains(id, self.modal) {
            self.modal = None;
        }
        if self.tree.contains(id, self.grab) {
            self.set_grab(None);
        }
        self.throw_focus(id);
        self.watch.clear(id);
        self.tree.remove(id);
    }
}
