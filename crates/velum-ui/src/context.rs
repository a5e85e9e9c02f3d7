//! The event-loop context.
//!
//! [`Ui`] owns every piece of process-wide toolkit state: the widget
//! tree, the window registry, focus/capture state, the current event's
//! attributes, damage bookkeeping, the deletion and watch registries and
//! the platform driver. All of it is mutated from the single event
//! thread; other threads may only call the driver's wake primitive.

use std::collections::VecDeque;
use std::rc::Rc;

use velum_core::geometry::Rect;

use crate::dispatch::{DispatchFn, EventHandler, SystemHandler};
use crate::driver::{PlatformDriver, TimeoutHandler};
use crate::event::{Event, EventState, Key, Modifiers, MouseButton};
use crate::headless::HeadlessDriver;
use crate::tooltip::Tooltip;
use crate::tree::{WidgetId, WidgetTree};
use crate::watch::WatchList;
use crate::widget::{Widget, WidgetFlags};
use crate::windows::{NativeHandle, WindowRegistry};

pub(crate) const FOREVER: f64 = 1e20;

/// Callback run once per loop iteration, just before the blocking wait.
/// The `usize` token distinguishes registrations sharing a function.
pub type CheckHandler = fn(&mut Ui, usize);

/// Runtime-tunable toolkit options.
#[derive(Debug, Clone)]
pub struct UiOptions {
    /// Widgets may take keyboard focus at all. Off turns the toolkit
    /// into a pointer-only surface.
    pub visible_focus: bool,
    /// Deliver belowmouse transitions to the tooltip hooks.
    pub show_tooltips: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            visible_focus: true,
            show_tooltips: true,
        }
    }
}

/// The toolkit core. One per process, owned by the main thread.
pub struct Ui {
    pub(crate) tree: WidgetTree,
    pub(crate) windows: WindowRegistry,
    pub(crate) state: EventState,

    pub(crate) focus: Option<WidgetId>,
    pub(crate) pushed: Option<WidgetId>,
    pub(crate) belowmouse: Option<WidgetId>,
    pub(crate) grab: Option<WidgetId>,
    pub(crate) modal: Option<WidgetId>,
    /// Window the platform last reported keyboard focus in.
    pub(crate) focus_window: Option<WidgetId>,
    /// Window the platform last reported the pointer in.
    pub(crate) mouse_window: Option<WidgetId>,
    /// While set, belowmouse transitions send `DndLeave` instead of
    /// `Leave`.
    pub(crate) dnd_active: bool,

    pub(crate) damage_pending: bool,

    pub(crate) handlers: Vec<EventHandler>,
    pub(crate) system_handlers: Vec<SystemHandler>,
    pub(crate) dispatch_override: Option<DispatchFn>,
    pub(crate) checks: Vec<(CheckHandler, usize)>,
    pub(crate) checks_running: bool,

    pub(crate) pending_delete: Vec<WidgetId>,
    pub(crate) watch: WatchList,
    pub(crate) tooltip: Tooltip,
    pub(crate) options: UiOptions,
    pub(crate) read_queue: VecDeque<WidgetId>,

    pub(crate) driver: Box<dyn PlatformDriver>,
}

impl Ui {
    pub fn new(driver: Box<dyn PlatformDriver>) -> Self {
        Self {
            tree: WidgetTree::new(),
            windows: WindowRegistry::new(),
            state: EventState::default(),
            focus: None,
            pushed: None,
            belowmouse: None,
            grab: None,
            modal: None,
            focus_window: None,
            mouse_window: None,
            dnd_active: false,
            damage_pending: false,
            handlers: Vec::new(),
            system_handlers: Vec::new(),
            dispatch_override: None,
            checks: Vec::new(),
            checks_running: false,
            pending_delete: Vec::new(),
            watch: WatchList::default(),
            tooltip: Tooltip::default(),
            options: UiOptions::default(),
            read_queue: VecDeque::new(),
            driver,
        }
    }

    /// A context driven by the in-memory [`HeadlessDriver`].
    pub fn headless() -> Self {
        Self::new(Box::new(HeadlessDriver::new()))
    }

    /// Downcast access to the concrete driver.
    pub fn driver_mut<T: PlatformDriver + 'static>(&mut self) -> Option<&mut T> {
        self.driver.as_any_mut().downcast_mut::<T>()
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut UiOptions {
        &mut self.options
    }

    // ---- tree construction facade ----------------------------------

    pub fn add_widget(&mut self, behavior: impl Widget, rect: Rect) -> WidgetId {
        self.tree.insert(Rc::new(behavior), rect)
    }

    pub fn add_widget_rc(&mut self, behavior: Rc<dyn Widget>, rect: Rect) -> WidgetId {
        self.tree.insert(behavior, rect)
    }

    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) {
        self.tree.add_child(parent, child);
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn exists(&self, id: WidgetId) -> bool {
        self.tree.exists(id)
    }

    pub fn rect(&self, id: WidgetId) -> Rect {
        self.tree.rect(id)
    }

    /// Move/resize without triggering a repaint.
    pub fn resize(&mut self, id: WidgetId, rect: Rect) {
        self.tree.set_rect(id, rect);
    }

    /// Move/resize and redraw if the geometry actually changed.
    pub fn damage_resize(&mut self, id: WidgetId, rect: Rect) -> bool {
        if self.tree.rect(id) == rect {
            return false;
        }
        self.tree.set_rect(id, rect);
        self.redraw(id);
        true
    }

    /// Install the widget's default-action callback.
    pub fn set_callback(
        &mut self,
        id: WidgetId,
        callback: impl Fn(&mut Ui, WidgetId) + 'static,
    ) {
        if let Some(node) = self.tree.get_mut(id) {
            node.callback = Some(Rc::new(callback));
        }
    }

    pub fn set_flag(&mut self, id: WidgetId, flag: WidgetFlags, on: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            if on {
                node.flags |= flag;
            } else {
                node.flags &= !flag;
            }
        }
    }

    /// Widgets a default-action callback was requested for but none was
    /// installed; consumed oldest-first.
    pub fn read_queue(&mut self) -> Option<WidgetId> {
        self.read_queue.pop_front()
    }

    // ---- widget lifecycle ------------------------------------------

    /// Make a hidden widget visible again and notify it.
    pub fn show_widget(&mut self, id: WidgetId) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        if !node.flags.contains(WidgetFlags::INVISIBLE) {
            return;
        }
        node.flags &= !WidgetFlags::INVISIBLE;
        if self.tree.visible_r(id) {
            self.redraw(id);
            self.deliver(Event::Show, id);
            // keep keyboard focus working if it was parked inside
            if self.tree.contains(id, self.focus) {
                if let Some(focus) = self.focus {
                    self.take_focus(focus);
                }
            }
        }
    }

    /// Hide a widget and release every process-wide reference into it.
    pub fn hide_widget(&mut self, id: WidgetId) {
        if self.tree.visible_r(id) {
            if let Some(node) = self.tree.get_mut(id) {
                node.flags |= WidgetFlags::INVISIBLE;
            }
            // the parent owns the vacated pixels
            if let Some(parent) = self.tree.parent(id) {
                self.redraw(parent);
            }
            self.deliver(Event::Hide, id);
            if self.tree.is_window(id) && self.windows.shown(id) {
                self.unmap_window(id);
            }
            self.throw_focus(id);
        } else if let Some(node) = self.tree.get_mut(id) {
            node.flags |= WidgetFlags::INVISIBLE;
        }
    }

    /// Reactivate a widget subtree.
    pub fn activate(&mut self, id: WidgetId) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        if !node.flags.contains(WidgetFlags::INACTIVE) {
            return;
        }
        node.flags &= !WidgetFlags::INACTIVE;
        if self.tree.active_r(id) {
            self.redraw(id);
            self.deliver(Event::Activate, id);
            if self.tree.contains(id, self.focus) {
                if let Some(focus) = self.focus {
                    self.take_focus(focus);
                }
            }
        }
    }

    /// Deactivate a widget subtree; events and shortcuts skip it.
    pub fn deactivate(&mut self, id: WidgetId) {
        if self.tree.active_r(id) {
            if let Some(node) = self.tree.get_mut(id) {
                node.flags |= WidgetFlags::INACTIVE;
            }
            self.redraw(id);
            self.deliver(Event::Deactivate, id);
            self.throw_focus(id);
        } else if let Some(node) = self.tree.get_mut(id) {
            node.flags |= WidgetFlags::INACTIVE;
        }
    }

    // ---- window lifecycle ------------------------------------------

    /// Register a shown top-level window under its native handle.
    pub fn map_window(&mut self, id: WidgetId, native: NativeHandle) {
        if !self.tree.is_window(id) {
            return;
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.flags &= !WidgetFlags::INVISIBLE;
        }
        self.windows.add(id, native);
        self.redraw(id);
        self.fix_focus();
    }

    /// Remove a window from the shown registry.
    pub fn unmap_window(&mut self, id: WidgetId) {
        self.windows.remove_widget(id);
        if self.modal == Some(id) {
            self.modal = None;
        }
        if self.tree.contains(id, self.focus_window) {
            self.focus_window = None;
        }
        if self.tree.contains(id, self.mouse_window) {
            self.mouse_window = None;
        }
        self.fix_focus();
    }

    /// The platform delivered the first expose for this window; flushes
    /// may now reach it.
    pub fn expose_window(&mut self, id: WidgetId) {
        if let Some(entry) = self.windows.entry_mut(id) {
            entry.wait_for_expose = false;
        }
    }

    pub fn shown(&self, id: WidgetId) -> bool {
        self.windows.shown(id)
    }

    pub fn first_window(&self) -> Option<WidgetId> {
        self.windows.first()
    }

    pub fn next_window(&self, id: WidgetId) -> Option<WidgetId> {
        self.windows.next(id)
    }

    /// Promote a shown window to the front of the registry order.
    pub fn set_first_window(&mut self, id: WidgetId) {
        self.windows.set_first(id, self.modal.is_some());
    }

    pub fn window_native(&self, id: WidgetId) -> Option<NativeHandle> {
        self.windows.entry(id).map(|e| e.native)
    }

    // ---- event state queries ---------------------------------------

    pub fn event(&self) -> Event {
        self.state.event
    }

    pub fn event_x(&self) -> i32 {
        self.state.x
    }

    pub fn event_y(&self) -> i32 {
        self.state.y
    }

    pub fn event_x_root(&self) -> i32 {
        self.state.x_root
    }

    pub fn event_y_root(&self) -> i32 {
        self.state.y_root
    }

    pub fn event_dx(&self) -> i32 {
        self.state.dx
    }

    pub fn event_dy(&self) -> i32 {
        self.state.dy
    }

    pub fn event_button(&self) -> MouseButton {
        self.state.button
    }

    pub fn event_clicks(&self) -> i32 {
        self.state.clicks
    }

    pub fn event_is_click(&self) -> bool {
        self.state.is_click
    }

    pub fn event_key(&self) -> Option<Key> {
        self.state.key
    }

    /// The key as the platform reported it, before any case-swapped
    /// shortcut retry.
    pub fn event_original_key(&self) -> Option<Key> {
        self.state.original_key
    }

    pub fn event_text(&self) -> &str {
        &self.state.text
    }

    pub fn event_modifiers(&self) -> Modifiers {
        self.state.modifiers
    }

    pub fn event_clipboard(&self) -> Option<&str> {
        self.state.clipboard.as_deref()
    }

    /// True if the current event position falls inside `rect`.
    pub fn event_inside(&self, rect: &Rect) -> bool {
        self.state.inside(rect)
    }

    /// True if the current event position falls inside the widget.
    pub fn event_inside_widget(&self, id: WidgetId) -> bool {
        self.tree.exists(id) && self.state.inside(&self.tree.rect(id))
    }

    // ---- checks -----------------------------------------------------

    /// Register a check callback, run once per loop iteration just
    /// before the display is flushed and the loop blocks.
    pub fn add_check(&mut self, handler: CheckHandler, token: usize) {
        self.checks.insert(0, (handler, token));
    }

    /// Removing a check that no longer exists is harmless.
    pub fn remove_check(&mut self, handler: CheckHandler, token: usize) {
        self.checks.retain(|&(h, t)| !(h == handler && t == token));
    }

    pub fn has_check(&self, handler: CheckHandler, token: usize) -> bool {
        self.checks.iter().any(|&(h, t)| h == handler && t == token)
    }

    /// Run pending checks. Checks may add or remove checks and call
    /// back into the loop; a nested run is a no-op and a check removed
    /// by an earlier check in the same round is skipped.
    pub fn run_checks(&mut self) {
        if self.checks_running {
            return;
        }
        self.checks_running = true;
        let snapshot = self.checks.clone();
        for (handler, token) in snapshot {
            if self.checks.iter().any(|&(h, t)| h == handler && t == token) {
                handler(self, token);
            }
        }
        self.checks_running = false;
    }

    // ---- timeouts (forwarded to the driver) ------------------------

    pub fn add_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize) {
        self.driver.add_timeout(delay, handler, token);
    }

    pub fn repeat_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize) {
        self.driver.repeat_timeout(delay, handler, token);
    }

    pub fn has_timeout(&self, handler: TimeoutHandler, token: usize) -> bool {
        self.driver.has_timeout(handler, token)
    }

    pub fn remove_timeout(&mut self, handler: TimeoutHandler, token: usize) {
        self.driver.remove_timeout(handler, token);
    }

    // ---- the loop ---------------------------------------------------

    /// One loop iteration: destroy scheduled widgets, run checks, flush
    /// damage, block up to `timeout` seconds, then run due timers and
    /// dispatch everything the driver queued. Returns the time waited.
    pub fn wait_for(&mut self, timeout: f64) -> f64 {
        self.do_widget_deletion();
        self.run_checks();
        self.flush();
        let waited = self.driver.wait(timeout);
        for (handler, token) in self.driver.take_due_timeouts() {
            handler(self, token);
        }
        for raw in self.driver.drain() {
            self.dispatch_raw(raw);
        }
        waited
    }

    /// Wait for something to happen. Returns `true` while any window is
    /// shown.
    pub fn wait(&mut self) -> bool {
        if self.windows.is_empty() {
            return false;
        }
        self.wait_for(FOREVER);
        !self.windows.is_empty()
    }

    /// Run until the last window is hidden.
    pub fn run(&mut self) {
        while !self.windows.is_empty() {
            self.wait_for(FOREVER);
        }
    }

    /// Process whatever is pending without blocking. Returns `true`
    /// while any window is shown.
    pub fn check(&mut self) -> bool {
        self.wait_for(0.0);
        !self.windows.is_empty()
    }

    /// True if [`check`](Self::check) would do anything, without calling
    /// any callbacks.
    pub fn ready(&self) -> bool {
        self.driver.ready()
    }

    /// Push accumulated damage out through the driver. Windows still
    /// waiting for their first expose keep the damage flag raised and
    /// are skipped.
    pub fn flush(&mut self) {
        if self.damage_pending {
            self.damage_pending = false;
            let shown: Vec<(WidgetId, NativeHandle)> = self
                .windows
                .iter()
                .map(|e| (e.widget, e.native))
                .collect();
            for (widget, native) in shown {
                let waiting = self
                    .windows
                    .entry(widget)
                    .map(|e| e.wait_for_expose)
                    .unwrap_or(false);
                if waiting {
                    self.damage_pending = true;
                    continue;
                }
                if !self.tree.visible_r(widget) {
                    continue;
                }
                let damage = self.damage(widget);
                if !damage.is_empty() {
                    let region = self
                        .windows
                        .entry_mut(widget)
                        .and_then(|e| e.region.take());
                    self.driver.flush_window(native, region.as_ref());
                    self.clear_damage(widget);
                }
                // drop regions of windows that did not use them
                if let Some(entry) = self.windows.entry_mut(widget) {
                    entry.region = None;
                }
            }
        }
        self.driver.flush();
    }
}
