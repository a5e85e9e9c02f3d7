//! Event-loop plumbing: check callbacks, driver timeouts and loop
//! termination.

use std::cell::{Cell, RefCell};

use velum_ui::{NativeHandle, Rect, Ui, WidgetId, Window};

thread_local! {
    static ORDER: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    static QUIT_TARGET: Cell<Option<WidgetId>> = const { Cell::new(None) };
}

fn record_first(_: &mut Ui, _: usize) {
    ORDER.with(|o| o.borrow_mut().push("first"));
}

fn record_second(_: &mut Ui, _: usize) {
    ORDER.with(|o| o.borrow_mut().push("second"));
}

fn remove_self(ui: &mut Ui, token: usize) {
    ORDER.with(|o| o.borrow_mut().push("remove_self"));
    ui.remove_check(remove_self, token);
}

fn nested_run(ui: &mut Ui, _: usize) {
    ORDER.with(|o| o.borrow_mut().push("nested"));
    // a check calling back into the loop must not recurse into checks
    ui.run_checks();
}

#[test]
fn test_checks_run_most_recent_first_each_iteration() {
    let mut ui = Ui::headless();
    ORDER.with(|o| o.borrow_mut().clear());

    ui.add_check(record_first, 0);
    ui.add_check(record_second, 0);
    assert!(ui.has_check(record_first, 0));

    ui.wait_for(0.0);
    ORDER.with(|o| assert_eq!(*o.borrow(), vec!["second", "first"]));

    // checks persist across iterations until removed
    ui.wait_for(0.0);
    ORDER.with(|o| {
        assert_eq!(*o.borrow(), vec!["second", "first", "second", "first"]);
    });

    ui.remove_check(record_first, 0);
    assert!(!ui.has_check(record_first, 0));
}

#[test]
fn test_check_may_remove_itself() {
    let mut ui = Ui::headless();
    ORDER.with(|o| o.borrow_mut().clear());

    ui.add_check(remove_self, 3);
    ui.wait_for(0.0);
    ui.wait_for(0.0);

    ORDER.with(|o| assert_eq!(*o.borrow(), vec!["remove_self"]));
    assert!(!ui.has_check(remove_self, 3));
}

#[test]
fn test_nested_check_run_is_a_noop() {
    let mut ui = Ui::headless();
    ORDER.with(|o| o.borrow_mut().clear());

    ui.add_check(nested_run, 0);
    ui.run_checks();

    ORDER.with(|o| assert_eq!(*o.borrow(), vec!["nested"]));
}

fn fire(_: &mut Ui, token: usize) {
    ORDER.with(|o| o.borrow_mut().push(if token == 1 { "t1" } else { "t2" }));
}

#[test]
fn test_timeouts_fire_through_wait() {
    let mut ui = Ui::headless();
    ORDER.with(|o| o.borrow_mut().clear());

    ui.add_timeout(0.5, fire, 1);
    ui.add_timeout(2.0, fire, 2);
    assert!(ui.has_timeout(fire, 1));

    ui.wait_for(1.0);
    ORDER.with(|o| assert_eq!(*o.borrow(), vec!["t1"]));
    assert!(!ui.has_timeout(fire, 1));
    assert!(ui.has_timeout(fire, 2));

    ui.wait_for(5.0);
    ORDER.with(|o| assert_eq!(*o.borrow(), vec!["t1", "t2"]));
}

#[test]
fn test_remove_timeout_before_it_fires() {
    let mut ui = Ui::headless();
    ORDER.with(|o| o.borrow_mut().clear());

    ui.add_timeout(0.5, fire, 1);
    ui.remove_timeout(fire, 1);
    ui.wait_for(1.0);

    ORDER.with(|o| assert!(o.borrow().is_empty()));
    // removing again is harmless
    ui.remove_timeout(fire, 1);
}

fn quit(ui: &mut Ui, _: usize) {
    if let Some(window) = QUIT_TARGET.with(|t| t.get()) {
        ui.hide_widget(window);
    }
}

#[test]
fn test_run_ends_when_the_last_window_hides() {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));
    QUIT_TARGET.with(|t| t.set(Some(window)));

    ui.add_timeout(0.25, quit, 0);
    ui.run();

    assert!(ui.first_window().is_none());
    assert!(!ui.tree().visible_r(window));
    assert!(ui.exists(window), "hiding is not destroying");
}

#[test]
fn test_wait_returns_false_with_no_windows() {
    let mut ui = Ui::headless();
    assert!(!ui.wait());
    assert!(!ui.check());
}
