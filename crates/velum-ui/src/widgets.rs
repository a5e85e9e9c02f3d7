//! Minimal widget behaviors.
//!
//! Real widget sets (buttons, inputs, menus) live outside the core;
//! these three exist so the toolkit has a vocabulary for its own
//! machinery: a passive box, a container that routes pointer events to
//! its children, and the top-level window kind.

use crate::context::Ui;
use crate::event::Event;
use crate::tree::WidgetId;
use crate::widget::Widget;

/// A passive rectangle. Consumes nothing.
pub struct Frame;

impl Widget for Frame {}

/// Route a pointer event to the topmost child under the pointer.
/// Children of window kind are skipped; the dispatcher reaches nested
/// windows through the registry, not through their parents.
fn route_to_child(ui: &mut Ui, parent: WidgetId, event: Event) -> bool {
    let children: Vec<WidgetId> = ui.tree().children(parent).to_vec();
    for child in children.into_iter().rev() {
        if ui.tree().is_window(child) || !ui.tree().takes_events(child) {
            continue;
        }
        if ui.event_inside_widget(child) && ui.deliver(event, child) {
            // a consumed press moves the capture from the window down
            // to the widget that actually took it
            if event == Event::Press
                && ui.pushed().is_some()
                && !ui.tree().contains(child, ui.pushed())
            {
                ui.set_pushed(Some(child));
            }
            return true;
        }
    }
    false
}

/// A plain container: pointer events go to the child under the pointer,
/// everything else is declined.
pub struct Group;

impl Widget for Group {
    fn handle(&self, ui: &mut Ui, self_id: WidgetId, event: Event) -> bool {
        match event {
            Event::Press | Event::Release | Event::Move | Event::Drag | Event::MouseWheel => {
                route_to_child(ui, self_id, event)
            }
            _ => false,
        }
    }
}

/// A top-level window. The window-system side (mapping, native handle)
/// is the application's business via [`Ui::map_window`]; the behavior
/// here only routes pointer events into the tree below it.
pub struct Window;

impl Window {
    pub fn new() -> Self {
        Window
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Window {
    fn handle(&self, ui: &mut Ui, self_id: WidgetId, event: Event) -> bool {
        match event {
            Event::Press | Event::Release | Event::Move | Event::Drag | Event::MouseWheel => {
                route_to_child(ui, self_id, event)
            }
            _ => false,
        }
    }

    fn is_window(&self) -> bool {
        true
    }
}
