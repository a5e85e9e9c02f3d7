//! Focus, capture and modality transitions.
//!
//! The setters here only *notify on the way out*: changing focus sends
//! `Unfocus` to the previous holder and its unshared ancestors, changing
//! belowmouse sends `Leave` the same way, and neither sends the matching
//! `Focus`/`Enter` to the new target. Offering an event to the new
//! target first, and committing only if it accepts, is the caller's
//! job ([`Ui::take_focus`], the dispatcher's Enter probes).

use crate::context::Ui;
use crate::event::Event;
use crate::tree::WidgetId;
use crate::widget::WidgetFlags;

impl Ui {
    /// Widget receiving keyboard events.
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Widget holding the mouse capture since the last press.
    pub fn pushed(&self) -> Option<WidgetId> {
        self.pushed
    }

    /// Widget under the pointer (the highlight target).
    pub fn belowmouse(&self) -> Option<WidgetId> {
        self.belowmouse
    }

    /// Window receiving all events exclusively, if any.
    pub fn grab(&self) -> Option<WidgetId> {
        self.grab
    }

    /// Topmost modal window, if any.
    pub fn modal(&self) -> Option<WidgetId> {
        self.modal
    }

    /// Whether the widget may accept keyboard focus at all.
    pub fn visible_focus(&self, id: WidgetId) -> bool {
        self.options.visible_focus
            && self.tree.flags(id).contains(WidgetFlags::VISIBLE_FOCUS)
    }

    /// Move keyboard focus. A no-op while a grab is active or when the
    /// target refuses focus by flag. The previous holder and each of its
    /// ancestors not containing the new target get one `Unfocus`, in
    /// child-to-parent order; the new target gets nothing from this call.
    pub fn set_focus(&mut self, target: Option<WidgetId>) {
        if let Some(id) = target {
            if !self.visible_focus(id) {
                return;
            }
        }
        if self.grab.is_some() {
            return;
        }
        let previous = self.focus;
        if target == previous {
            return;
        }
        tracing::debug!(?previous, ?target, "focus change");
        self.focus = target;

        // keep the platform's focus window in step, or fix_focus would
        // immediately revert the change
        if let Some(id) = target {
            if let Some(win) = self.tree.top_window(id) {
                if self.focus_window != Some(win) {
                    if let Some(native) = self.window_native(win) {
                        self.driver.take_focus(native);
                    }
                    self.focus_window = Some(win);
                }
            }
        }

        let mut cursor = previous;
        while let Some(p) = cursor {
            if target.is_some_and(|t| self.tree.contains(p, Some(t))) {
                break;
            }
            self.deliver(Event::Unfocus, p);
            cursor = self.tree.parent(p);
        }
    }

    /// Change the highlight target. Same notification contract as
    /// [`set_focus`](Self::set_focus), with `Leave` (or `DndLeave`
    /// during a drag-and-drop) on the way out.
    pub fn set_belowmouse(&mut self, target: Option<WidgetId>) {
        if self.grab.is_some() {
            return;
        }
        let previous = self.belowmouse;
        if target == previous {
            return;
        }
        self.belowmouse = target;
        let leave = if self.dnd_active {
            Event::DndLeave
        } else {
            Event::Leave
        };
        let mut cursor = previous;
        while let Some(p) = cursor {
            if target.is_some_and(|t| self.tree.contains(p, Some(t))) {
                break;
            }
            self.deliver(leave, p);
            cursor = self.tree.parent(p);
        }
    }

    /// Set the capture target directly. Drag and release events go here
    /// until the next release clears it.
    pub fn set_pushed(&mut self, target: Option<WidgetId>) {
        self.pushed = target;
    }

    /// Route every event exclusively to one window (menus use this).
    /// Acquires the system grab on the first transition; clearing it
    /// releases the grab and resynchronizes focus.
    pub fn set_grab(&mut self, target: Option<WidgetId>) {
        match target {
            Some(win) => {
                if self.grab.is_none() {
                    self.driver.capture(true);
                }
                self.grab = Some(win);
            }
            None => {
                if self.grab.is_some() {
                    self.driver.capture(false);
                    // flush in case the grabbing code loops before waiting
                    self.driver.flush();
                    self.grab = None;
                    self.fix_focus();
                }
            }
        }
    }

    /// Set or clear the topmost modal window.
    pub fn set_modal(&mut self, target: Option<WidgetId>) {
        self.modal = target;
        self.fix_focus();
    }

    /// Offer keyboard focus to a widget. Delivers a `Focus` probe and
    /// commits the change only if the widget consumes it (or claimed
    /// focus for a descendant itself).
    pub fn take_focus(&mut self, id: WidgetId) -> bool {
        if !self.tree.takes_events(id) {
            return false;
        }
        if !self.visible_focus(id) {
            return false;
        }
        if !self.deliver(Event::Focus, id) {
            return false;
        }
        if self.tree.contains(id, self.focus) {
            return true;
        }
        self.set_focus(Some(id));
        true
    }

    /// Drop every process-wide reference into a subtree that no longer
    /// wants events (hidden, deactivated or dying), then resynchronize.
    pub(crate) fn throw_focus(&mut self, id: WidgetId) {
        if self.tree.contains(id, self.pushed) {
            self.pushed = None;
        }
        if self.tree.contains(id, self.belowmouse) {
            self.belowmouse = None;
        }
        if self.tree.contains(id, self.focus) {
            self.focus = None;
        }
        if Some(id) == self.focus_window {
            self.focus_window = None;
        }
        if Some(id) == self.tooltip.current {
            self.tooltip.current = None;
        }
        if Some(id) == self.mouse_window {
            self.mouse_window = None;
        }
        self.tooltip_exit(id);
        self.fix_focus();
    }

    /// Restore the focus/belowmouse invariants from the platform-echo
    /// state. Callable any time state might be stale; does nothing while
    /// a grab is active.
    pub fn fix_focus(&mut self) {
        if self.grab.is_some() {
            return;
        }

        // keyboard focus follows the platform focus window, overridden
        // by the modal window
        match self.focus_window.filter(|w| self.tree.exists(*w)) {
            Some(fw) => {
                // widgets must not mistake the probe for a keystroke
                let saved = self.state.key.take();
                let mut target = self.tree.root_of(fw);
                if let Some(m) = self.modal {
                    target = m;
                }
                if !self.tree.contains(target, self.focus)
                    && !self.take_focus(target)
                {
                    self.set_focus(Some(target));
                }
                self.state.key = saved;
            }
            None => self.set_focus(None),
        }

        // the belowmouse side only moves while nothing is captured
        if self.pushed.is_some() {
            return;
        }
        match self.mouse_window.filter(|w| self.tree.exists(*w)) {
            Some(mw) => {
                let target = self.modal.unwrap_or(mw);
                if !self.tree.contains(target, self.belowmouse) {
                    self.deliver(Event::Enter, target);
                    if !self.tree.contains(target, self.belowmouse) {
                        self.set_belowmouse(Some(target));
                    }
                } else {
                    // synthetic move keeps nested enter/leave state fresh
                    let rect = self.tree.rect(mw);
                    self.state.x = self.state.x_root - rect.x;
                    self.state.y = self.state.y_root - rect.y;
                    self.deliver(Event::Move, target);
                }
            }
            None => {
                self.set_belowmouse(None);
                self.tooltip_enter(None);
            }
        }
    }
}
