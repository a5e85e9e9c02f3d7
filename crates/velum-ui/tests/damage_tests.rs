//! Damage accumulation and the flush step: clipping, child-bit
//! propagation, whole-window collapse and expose gating.

use velum_ui::{Damage, Frame, HeadlessDriver, NativeHandle, Rect, Ui, WidgetId, Window};

/// A mapped, exposed, freshly flushed window with one plain child.
fn mapped_ui() -> (Ui, WidgetId, WidgetId) {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));
    ui.expose_window(window);
    let child = ui.add_widget(Frame, Rect::new(10, 10, 20, 20));
    ui.add_child(window, child);
    ui.flush();
    ui.driver_mut::<HeadlessDriver>().unwrap().clear_recordings();
    (ui, window, child)
}

#[test]
fn test_full_cover_rect_equals_whole_widget_damage() {
    let (mut ui_a, window_a, child_a) = mapped_ui();
    let (mut ui_b, window_b, child_b) = mapped_ui();

    ui_a.damage_rect(child_a, Damage::EXPOSE, Rect::new(10, 10, 20, 20));
    ui_b.damage_widget(child_b, Damage::EXPOSE);

    assert_eq!(ui_a.damage(child_a), ui_b.damage(child_b));
    assert_eq!(ui_a.damage(window_a), ui_b.damage(window_b));
    assert_eq!(ui_a.window_region(window_a), ui_b.window_region(window_b));
    assert_eq!(ui_a.damage_pending(), ui_b.damage_pending());
}

#[test]
fn test_child_damage_propagates_child_bit_to_window() {
    let (mut ui, window, child) = mapped_ui();
    let inner = ui.add_widget(Frame, Rect::new(12, 12, 5, 5));
    ui.add_child(child, inner);

    ui.damage_rect(inner, Damage::EXPOSE, Rect::new(12, 12, 5, 5));

    assert!(ui.damage(inner).contains(Damage::EXPOSE));
    assert_eq!(ui.damage(child), Damage::CHILD);
    assert_eq!(ui.damage(window), Damage::CHILD);
    assert!(ui.damage_pending());
    let region = ui.window_region(window).expect("fine-grained region");
    assert_eq!(region.bounds(), Rect::new(12, 12, 5, 5));
}

#[test]
fn test_damage_rect_is_clipped_to_the_window() {
    let (mut ui, window, child) = mapped_ui();

    ui.damage_rect(child, Damage::EXPOSE, Rect::new(-10, -10, 15, 15));
    let region = ui.window_region(window).expect("clipped region");
    assert_eq!(region.bounds(), Rect::new(0, 0, 5, 5));
}

#[test]
fn test_out_of_bounds_damage_is_discarded() {
    let (mut ui, window, child) = mapped_ui();

    ui.damage_rect(child, Damage::EXPOSE, Rect::new(200, 200, 10, 10));
    assert!(!ui.damage_pending());
    assert!(ui.window_region(window).is_none());
    assert!(ui.damage(window).is_empty());
}

#[test]
fn test_window_covering_rect_collapses_to_whole_window() {
    let (mut ui, window, child) = mapped_ui();

    ui.damage_rect(child, Damage::EXPOSE, Rect::new(0, 0, 100, 100));
    assert!(ui.window_region(window).is_none(), "region replaced by whole-window path");
    assert!(ui.damage_pending());
    assert!(!ui.damage(window).is_empty());
}

#[test]
fn test_redraw_window_discards_fine_grained_region() {
    let (mut ui, window, child) = mapped_ui();

    ui.damage_rect(child, Damage::EXPOSE, Rect::new(10, 10, 5, 5));
    assert!(ui.window_region(window).is_some());

    ui.redraw(window);
    assert!(ui.window_region(window).is_none());
    assert!(ui.damage(window).contains(Damage::ALL));
}

#[test]
fn test_flush_delivers_region_and_clears_state() {
    let (mut ui, window, child) = mapped_ui();

    ui.damage_rect(child, Damage::EXPOSE, Rect::new(10, 10, 5, 5));
    ui.flush();

    let driver = ui.driver_mut::<HeadlessDriver>().unwrap();
    assert_eq!(driver.flushed().len(), 1);
    let (native, region) = &driver.flushed()[0];
    assert_eq!(*native, NativeHandle(1));
    assert_eq!(region.as_ref().map(|r| r.bounds()), Some(Rect::new(10, 10, 5, 5)));

    assert!(!ui.damage_pending());
    assert!(ui.damage(window).is_empty());
    assert!(ui.window_region(window).is_none());

    // nothing dirty: the next flush touches no window
    ui.flush();
    assert_eq!(
        ui.driver_mut::<HeadlessDriver>().unwrap().flushed().len(),
        1
    );
}

#[test]
fn test_whole_window_damage_flushes_without_region() {
    let (mut ui, window, _child) = mapped_ui();

    ui.redraw(window);
    ui.flush();

    let driver = ui.driver_mut::<HeadlessDriver>().unwrap();
    assert_eq!(driver.flushed().len(), 1);
    assert!(driver.flushed()[0].1.is_none());
}

#[test]
fn test_flush_skips_windows_awaiting_expose() {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 100, 100));
    ui.map_window(window, NativeHandle(1));
    // mapping marks the whole window dirty, but it was never exposed
    ui.flush();

    let driver = ui.driver_mut::<HeadlessDriver>().unwrap();
    assert!(driver.flushed().is_empty());
    assert!(ui.damage_pending(), "damage stays pending until the expose");

    ui.expose_window(window);
    ui.flush();
    assert_eq!(
        ui.driver_mut::<HeadlessDriver>().unwrap().flushed().len(),
        1
    );
}

#[test]
fn test_flush_skips_invisible_windows() {
    let (mut ui, window, _child) = mapped_ui();

    ui.redraw(window);
    ui.set_flag(window, velum_ui::WidgetFlags::INVISIBLE, true);
    ui.flush();

    let driver = ui.driver_mut::<HeadlessDriver>().unwrap();
    assert!(driver.flushed().is_empty());
}
