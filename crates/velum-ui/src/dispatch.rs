//! The default event dispatcher.
//!
//! [`Ui::handle`] is the single entry point for translated native
//! events. An installed dispatch override sees every event first and
//! decides whether to forward to [`Ui::handle_default`]; this is the
//! hook for cross-cutting concerns such as containing panics from
//! application callbacks. Dispatch itself never fails: an event nobody
//! wants simply comes back as "not handled".

use crate::context::Ui;
use crate::driver::RawEvent;
use crate::event::{Event, EventData, Key};
use crate::tree::WidgetId;
use crate::widget::WidgetFlags;

/// Fallback handler for events no widget consumed. Most recently added
/// runs first.
pub type EventHandler = fn(&mut Ui, Event) -> bool;

/// Interceptor for raw native/system events, keyed by the driver's
/// opaque code. Runs before any translation-based dispatch.
pub type SystemHandler = fn(&mut Ui, u32) -> bool;

/// Replacement dispatch entry point installed with [`Ui::set_dispatch`].
pub type DispatchFn = fn(&mut Ui, Event, Option<WidgetId>) -> bool;

impl Ui {
    /// Install a function to parse unrecognized events. Handlers run
    /// most-recent-first until one claims the event; they also see
    /// shortcuts no widget consumed.
    pub fn add_handler(&mut self, handler: EventHandler) {
        self.handlers.insert(0, handler);
    }

    /// Removing a handler that was never added is harmless.
    pub fn remove_handler(&mut self, handler: EventHandler) {
        self.handlers.retain(|&h| h != handler);
    }

    /// Install an interceptor for raw system events.
    pub fn add_system_handler(&mut self, handler: SystemHandler) {
        self.system_handlers.insert(0, handler);
    }

    pub fn remove_system_handler(&mut self, handler: SystemHandler) {
        self.system_handlers.retain(|&h| h != handler);
    }

    /// Install or clear the dispatch override. With an override set it
    /// is up to the override to call [`Ui::handle_default`]; one that
    /// does not forward silently drops the event.
    pub fn set_dispatch(&mut self, dispatch: Option<DispatchFn>) {
        self.dispatch_override = dispatch;
    }

    pub fn dispatch(&self) -> Option<DispatchFn> {
        self.dispatch_override
    }

    /// Route one translated native event, applying its payload to the
    /// queryable event state first.
    pub fn dispatch_raw(&mut self, raw: RawEvent) -> bool {
        if let Event::Other(code) = raw.event {
            if self.send_system_handlers(code) {
                return true;
            }
        }
        self.apply_event_data(raw.event, raw.data);
        let Some(window) = self.windows.find(raw.window, self.modal.is_some()) else {
            tracing::warn!(native = ?raw.window, event = ?raw.event, "event for unknown window");
            return false;
        };
        self.handle(raw.event, Some(window))
    }

    /// Handle an event from the window system, via the dispatch
    /// override when one is installed.
    pub fn handle(&mut self, event: Event, window: Option<WidgetId>) -> bool {
        if let Some(dispatch) = self.dispatch_override {
            dispatch(self, event, window)
        } else {
            self.handle_default(event, window)
        }
    }

    /// The default per-kind routing. See the module docs of
    /// [`crate::focus`] for the enter/leave and focus side of the
    /// contract.
    pub fn handle_default(&mut self, event: Event, window: Option<WidgetId>) -> bool {
        self.state.event = event;
        tracing::trace!(?event, ?window, "dispatch");

        let mut event = event;
        // the widget the common tail will deliver to
        let mut target = window;

        match event {
            Event::Close => {
                let Some(win) = window else { return false };
                if self.grab.is_some()
                    || (self.modal.is_some() && Some(win) != self.modal)
                {
                    return false;
                }
                self.do_callback(win);
                return true;
            }

            // lifecycle hooks, not the window-system calls
            Event::Show => {
                let Some(win) = window else { return false };
                self.show_widget(win);
                return true;
            }
            Event::Hide => {
                let Some(win) = window else { return false };
                self.hide_widget(win);
                return true;
            }

            Event::Press => {
                let Some(win) = window else { return false };
                let wi = if let Some(grab) = self.grab {
                    grab
                } else {
                    if self.modal.is_some() && Some(win) != self.modal {
                        return false;
                    }
                    win
                };
                self.pushed = Some(wi);
                self.tooltip.current = Some(wi);
                if self.send_event(Event::Press, wi, window) {
                    return true;
                }
                // raise windows that are clicked on
                self.set_first_window(win);
                if let Some(native) = self.window_native(win) {
                    self.driver.raise(native);
                }
                return true;
            }

            Event::DndEnter | Event::DndDrag => {
                self.dnd_active = true;
                // plain delivery to the window via the common tail
            }
            Event::DndLeave => {
                self.dnd_active = true;
                self.set_belowmouse(None);
                self.dnd_active = false;
                return true;
            }
            Event::DndRelease => {
                target = self.belowmouse;
            }

            Event::Move | Event::Drag => {
                // should already be set, but just in case
                self.mouse_window = window;
                if let Some(pushed) = self.pushed {
                    let wi = self.grab.unwrap_or(pushed);
                    event = Event::Drag;
                    self.state.event = event;
                    target = Some(wi);
                    // captured motion goes through the common tail
                } else {
                    let mut wi = window;
                    if self.modal.is_some() && wi != self.modal {
                        wi = None;
                    }
                    if self.grab.is_some() {
                        wi = self.grab;
                    }
                    let previous = self.belowmouse;
                    let ret = match wi {
                        Some(w) => self.send_event(event, w, window),
                        None => false,
                    };
                    if previous != self.belowmouse {
                        let belowmouse = self.belowmouse;
                        self.tooltip_enter(belowmouse);
                    }
                    return ret;
                }
            }

            Event::Release => {
                let wi = if let Some(grab) = self.grab {
                    self.pushed = None; // must be clear before the callback runs
                    grab
                } else if let Some(pushed) = self.pushed {
                    self.pushed = None;
                    pushed
                } else if self.modal.is_some() && window != self.modal {
                    return false;
                } else {
                    let Some(win) = window else { return false };
                    win
                };
                let ret = self.send_event(Event::Release, wi, window);
                self.fix_focus();
                return ret;
            }

            Event::Unfocus => {
                self.focus_window = None;
                self.fix_focus();
                return true;
            }
            Event::Focus => {
                self.focus_window = window;
                self.fix_focus();
                return true;
            }

            Event::KeyUp => {
                // focus may have moved since the matching key-down;
                // "deliver to whoever holds focus now" is close enough,
                // and key-ups never become shortcuts
                let mut cursor = self.grab.or(self.focus);
                while let Some(w) = cursor {
                    if self.send_event(Event::KeyUp, w, window) {
                        return true;
                    }
                    cursor = self.tree.parent(w);
                }
                return false;
            }

            Event::KeyDown => {
                self.tooltip_enter(None);
                self.focus_window = window;

                // literal keystroke along the focus chain
                let mut cursor = self.grab.or(self.focus);
                while let Some(w) = cursor {
                    if self.send_event(Event::KeyDown, w, window) {
                        return true;
                    }
                    cursor = self.tree.parent(w);
                }

                // retry as a shortcut
                if self.handle(Event::Shortcut, window) {
                    return true;
                }

                // retry once more with the letter case swapped, so
                // mnemonics match regardless of shift state
                let Some(swapped) = self.state.key.and_then(Key::swap_case) else {
                    return false;
                };
                self.state.original_key = self.state.key;
                self.state.key = Some(swapped);
                if let Key::Char(c) = swapped {
                    self.state.text = c.to_string();
                }
                self.state.event = Event::Shortcut;
                return self.handle_shortcut(window);
            }

            Event::Shortcut => return self.handle_shortcut(window),

            Event::Enter => {
                self.mouse_window = window;
                self.fix_focus();
                let belowmouse = self.belowmouse;
                self.tooltip_enter(belowmouse);
                return true;
            }
            Event::Leave => {
                if self.pushed.is_none() {
                    self.set_belowmouse(None);
                    self.tooltip_enter(None);
                }
                if window.is_some() && window == self.mouse_window {
                    self.mouse_window = None;
                    self.fix_focus();
                }
                return true;
            }

            Event::MouseWheel => {
                let Some(win) = window else { return false };
                self.focus_window = window;
                // the grab gets first refusal, unless it is the modal
                // window or the event window (those come next anyway)
                if let Some(grab) = self.grab {
                    if Some(grab) != self.modal
                        && grab != win
                        && self.send_event(Event::MouseWheel, grab, window)
                    {
                        return true;
                    }
                }
                // modal delivery is terminal whether or not it consumes
                if let Some(modal) = self.modal {
                    self.send_event(Event::MouseWheel, modal, window);
                    return true;
                }
                if self.send_event(Event::MouseWheel, win, window) {
                    return true;
                }
                return self.send_handlers(Event::MouseWheel);
            }

            _ => {}
        }

        // common tail: deliver to the chosen target, then offer the
        // event to the registered handlers
        if let Some(wi) = target {
            if self.send_event(event, wi, window) {
                self.dnd_active = false;
                return true;
            }
        }
        self.dnd_active = false;
        self.send_handlers(event)
    }

    /// The shortcut search. Starts at the first active ancestor of the
    /// hover target (disabled subtrees never see shortcuts), walks up
    /// that chain, then asks the registered handlers, and finally treats
    /// Escape as an implicit close of the modal or event window.
    fn handle_shortcut(&mut self, window: Option<WidgetId>) -> bool {
        self.state.event = Event::Shortcut;

        if let Some(grab) = self.grab {
            if self.send_event(Event::Shortcut, grab, window) {
                return true;
            }
            return self.send_handlers(Event::Shortcut);
        }

        let mut wi = self.find_active(self.belowmouse);
        if wi.is_none() {
            wi = self.modal.or(window);
        } else if let Some(w) = wi {
            // a background window's widget is hovered: the front window
            // gets a chance at the shortcut before the hovered chain
            let first = self.first_window();
            if self.tree.window_of(w) != first {
                if let Some(front) = first {
                    if self.send_event(Event::Shortcut, front, Some(front)) {
                        return true;
                    }
                }
            }
        }

        let mut cursor = wi;
        while let Some(w) = cursor {
            let enclosing = self.tree.window_of(w);
            if self.send_event(Event::Shortcut, w, enclosing) {
                return true;
            }
            cursor = self.tree.parent(w);
        }

        if self.send_handlers(Event::Shortcut) {
            return true;
        }

        // make the escape key close windows
        if self.state.key == Some(Key::Escape) {
            if let Some(target) = self.modal.or(window) {
                self.do_callback(target);
                return true;
            }
        }

        false
    }

    /// First `active_r` widget at or above `from`: an active widget all
    /// of whose ancestors are active too. `None` if the whole chain is
    /// disabled somewhere above.
    fn find_active(&self, from: Option<WidgetId>) -> Option<WidgetId> {
        let mut found = None;
        let mut cursor = from;
        while let Some(w) = cursor {
            if self.tree.active(w) {
                if found.is_none() {
                    found = Some(w);
                }
            } else {
                found = None;
            }
            cursor = self.tree.parent(w);
        }
        found
    }

    /// Call a widget's `handle`, after re-basing the event coordinates
    /// for nested windows. `window` is the outermost window the event
    /// was posted to.
    pub(crate) fn send_event(
        &mut self,
        event: Event,
        to: WidgetId,
        window: Option<WidgetId>,
    ) -> bool {
        let (mut dx, mut dy) = match window {
            Some(w) => {
                let rect = self.tree.rect(w);
                (rect.x, rect.y)
            }
            None => (0, 0),
        };
        let mut cursor = Some(to);
        while let Some(w) = cursor {
            if self.tree.is_window(w) {
                let rect = self.tree.rect(w);
                dx -= rect.x;
                dy -= rect.y;
            }
            cursor = self.tree.parent(w);
        }
        let save_x = self.state.x;
        let save_y = self.state.y;
        let save_event = self.state.event;
        self.state.x += dx;
        self.state.y += dy;
        self.state.event = event;
        let ret = match self.tree.behavior(to) {
            Some(behavior) => behavior.handle(self, to, event),
            None => false,
        };
        self.state.event = save_event;
        self.state.x = save_x;
        self.state.y = save_y;
        ret
    }

    /// Deliver an event to a widget as-is, without coordinate
    /// translation. Used for probes and lifecycle notifications.
    pub(crate) fn deliver(&mut self, event: Event, to: WidgetId) -> bool {
        let save_event = self.state.event;
        self.state.event = event;
        let ret = match self.tree.behavior(to) {
            Some(behavior) => behavior.handle(self, to, event),
            None => false,
        };
        self.state.event = save_event;
        ret
    }

    pub(crate) fn send_handlers(&mut self, event: Event) -> bool {
        let snapshot = self.handlers.clone();
        for handler in snapshot {
            if handler(self, event) {
                return true;
            }
        }
        false
    }

    pub(crate) fn send_system_handlers(&mut self, code: u32) -> bool {
        let snapshot = self.system_handlers.clone();
        for handler in snapshot {
            if handler(self, code) {
                return true;
            }
        }
        false
    }

    /// Run the widget's default-action callback. Without an installed
    /// callback the widget is queued for [`Ui::read_queue`]. The widget
    /// may destroy itself from inside the callback.
    pub fn do_callback(&mut self, id: WidgetId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match node.callback.clone() {
            Some(callback) => {
                let tracker = self.tracker(id);
                callback(self, id);
                if tracker.exists() {
                    if let Some(node) = self.tree.get_mut(id) {
                        node.flags &= !WidgetFlags::CHANGED;
                    }
                }
            }
            None => self.read_queue.push_back(id),
        }
    }

    fn apply_event_data(&mut self, event: Event, data: EventData) {
        if data.clipboard.is_some() {
            self.state.clipboard = data.clipboard;
        }
        match event {
            Event::Press
            | Event::Release
            | Event::Move
            | Event::Drag
            | Event::MouseWheel
            | Event::Enter
            | Event::Leave
            | Event::DndEnter
            | Event::DndDrag
            | Event::DndLeave
            | Event::DndRelease => {
                self.state.x = data.x;
                self.state.y = data.y;
                self.state.x_root = data.x_root;
                self.state.y_root = data.y_root;
                self.state.modifiers = data.modifiers;
                match event {
                    Event::Press => {
                        if let Some(button) = data.button {
                            self.state.button = button;
                        }
                        self.state.clicks = data.clicks;
                        self.state.is_click = true;
                    }
                    Event::Release => {
                        if let Some(button) = data.button {
                            self.state.button = button;
                        }
                    }
                    Event::Move | Event::Drag => {
                        self.state.is_click = false;
                    }
                    Event::MouseWheel => {
                        self.state.dx = data.dx;
                        self.state.dy = data.dy;
                    }
                    Event::DndRelease => {
                        if !data.text.is_empty() {
                            self.state.text = data.text;
                        }
                    }
                    _ => {}
                }
            }
            Event::KeyDown | Event::KeyUp | Event::Shortcut => {
                self.state.modifiers = data.modifiers;
                self.state.key = data.key;
                self.state.original_key = data.key;
                self.state.text = data.text;
            }
            _ => {}
        }
    }
}
