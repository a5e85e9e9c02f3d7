//! Hook points for an external tooltip subsystem.
//!
//! The core only reports belowmouse transitions; what a tooltip looks
//! like, when it appears and where it goes are entirely up to the
//! installed hooks. Both hooks default to no-ops.

use crate::context::Ui;
use crate::tree::WidgetId;

/// Called when the pointer settles over a new widget (`None` when it
/// leaves every widget).
pub type TooltipEnter = fn(&mut Ui, Option<WidgetId>);
/// Called when a widget that may own a tooltip goes away.
pub type TooltipExit = fn(&mut Ui, WidgetId);

fn enter_nothing(_: &mut Ui, _: Option<WidgetId>) {}
fn exit_nothing(_: &mut Ui, _: WidgetId) {}

pub struct Tooltip {
    /// Widget the tooltip machinery is currently tracking.
    pub(crate) current: Option<WidgetId>,
    pub(crate) enter: TooltipEnter,
    pub(crate) exit: TooltipExit,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            current: None,
            enter: enter_nothing,
            exit: exit_nothing,
        }
    }
}

impl Ui {
    /// Install the tooltip hooks. Passing the previous hooks back
    /// restores them; there is no stacking.
    pub fn set_tooltip_hooks(&mut self, enter: TooltipEnter, exit: TooltipExit) {
        self.tooltip.enter = enter;
        self.tooltip.exit = exit;
    }

    /// Widget the tooltip subsystem is tracking.
    pub fn tooltip_current(&self) -> Option<WidgetId> {
        self.tooltip.current
    }

    pub fn set_tooltip_current(&mut self, id: Option<WidgetId>) {
        self.tooltip.current = id;
    }

    pub(crate) fn tooltip_enter(&mut self, id: Option<WidgetId>) {
        if !self.options.show_tooltips {
            return;
        }
        let enter = self.tooltip.enter;
        enter(self, id);
    }

    pub(crate) fn tooltip_exit(&mut self, id: WidgetId) {
        let exit = self.tooltip.exit;
        exit(self, id);
    }
}
