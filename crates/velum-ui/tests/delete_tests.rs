//! Deferred deletion and the watch registry: idempotent scheduling,
//! destruction at the safe point, handle nulling and tracker RAII.

use std::cell::Cell;
use std::rc::Rc;

use velum_ui::{Event, HeadlessDriver, NativeHandle, Rect, Ui, Widget, Window};

/// Counts how many times the behavior is dropped, i.e. how many times
/// the widget is actually destroyed.
struct DropCounter {
    drops: Rc<Cell<u32>>,
}

impl Widget for DropCounter {}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_schedule_delete_twice_destroys_once() {
    let mut ui = Ui::headless();
    let drops = Rc::new(Cell::new(0));
    let widget = ui.add_widget(
        DropCounter {
            drops: drops.clone(),
        },
        Rect::new(0, 0, 10, 10),
    );

    ui.delete_widget(widget);
    ui.delete_widget(widget);
    assert!(ui.exists(widget), "storage lives until the safe point");
    assert_eq!(drops.get(), 0);

    ui.wait_for(0.0);
    assert!(!ui.exists(widget));
    assert_eq!(drops.get(), 1);

    // deleting a dead handle is a no-op
    ui.delete_widget(widget);
    ui.wait_for(0.0);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_delete_hides_immediately() {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));

    ui.delete_widget(window);
    assert!(ui.exists(window));
    assert!(!ui.tree().visible_r(window));
    assert!(!ui.shown(window), "a shown window is unmapped right away");

    ui.wait_for(0.0);
    assert!(!ui.exists(window));
}

#[test]
fn test_watched_handle_reads_none_after_destruction() {
    let mut ui = Ui::headless();
    let widget = ui.add_widget(velum_ui::Frame, Rect::new(0, 0, 10, 10));

    let handle = ui.watch_widget(widget);
    assert_eq!(handle.get(), Some(widget));

    ui.delete_widget(widget);
    ui.wait_for(0.0);
    assert_eq!(handle.get(), None);
    ui.release_watch(&handle);
}

#[test]
fn test_released_handle_is_left_untouched() {
    let mut ui = Ui::headless();
    let widget = ui.add_widget(velum_ui::Frame, Rect::new(0, 0, 10, 10));

    let handle = ui.watch_widget(widget);
    ui.release_watch(&handle);

    ui.delete_widget(widget);
    ui.wait_for(0.0);
    // stale by design: the registry no longer knows about this cell
    assert_eq!(handle.get(), Some(widget));
    assert!(!ui.exists(widget));
}

#[test]
fn test_tracker_guards_across_destruction() {
    let mut ui = Ui::headless();
    let widget = ui.add_widget(velum_ui::Frame, Rect::new(0, 0, 10, 10));

    let tracker = ui.tracker(widget);
    assert!(tracker.exists());
    assert_eq!(tracker.widget(), Some(widget));

    ui.destroy_widget(widget);
    assert!(tracker.deleted());
    assert_eq!(tracker.widget(), None);
}

#[test]
fn test_destroy_is_recursive_and_invalidates_children() {
    let mut ui = Ui::headless();
    let parent_drops = Rc::new(Cell::new(0));
    let child_drops = Rc::new(Cell::new(0));
    let parent = ui.add_widget(
        DropCounter {
            drops: parent_drops.clone(),
        },
        Rect::new(0, 0, 100, 100),
    );
    let child = ui.add_widget(
        DropCounter {
            drops: child_drops.clone(),
        },
        Rect::new(10, 10, 20, 20),
    );
    ui.add_child(parent, child);

    ui.destroy_widget(parent);
    assert_eq!(parent_drops.get(), 1);
    assert_eq!(child_drops.get(), 1);
    assert!(!ui.exists(parent));
    assert!(!ui.exists(child));
}

#[test]
fn test_callback_may_delete_its_own_widget() {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));
    ui.set_callback(window, |ui, id| ui.delete_widget(id));

    // the close path runs the callback, which schedules the deletion
    assert!(ui.handle(Event::Close, Some(window)));
    assert!(!ui.tree().visible_r(window));

    ui.wait_for(0.0);
    assert!(!ui.exists(window));
}

#[test]
fn test_destroy_clears_process_wide_references() {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));
    let child = ui.add_widget(velum_ui::Frame, Rect::new(10, 10, 20, 20));
    ui.add_child(window, child);

    ui.set_focus(Some(child));
    ui.set_pushed(Some(child));
    ui.set_belowmouse(Some(child));
    ui.set_modal(Some(window));
    ui.set_grab(Some(window));

    ui.destroy_widget(window);

    assert_eq!(ui.focus(), None);
    assert_eq!(ui.modal(), None);
    assert_eq!(ui.grab(), None);
    assert_eq!(ui.pushed(), None);
    assert_eq!(ui.belowmouse(), None);
    assert!(!ui.driver_mut::<HeadlessDriver>().unwrap().captured());
    assert!(!ui.exists(window));
    assert!(!ui.exists(child));
}
