use criterion::{Criterion, black_box, criterion_group, criterion_main};
use velum_ui::{
    Event, EventData, Frame, Group, HeadlessDriver, NativeHandle, RawEvent, Rect, Ui, Window,
};

fn deep_ui(depth: usize) -> Ui {
    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 800, 600));
    ui.map_window(window, NativeHandle(1));
    ui.expose_window(window);
    let mut parent = window;
    for _ in 0..depth {
        let group = ui.add_widget(Group, Rect::new(0, 0, 800, 600));
        ui.add_child(parent, group);
        parent = group;
    }
    let leaf = ui.add_widget(Frame, Rect::new(10, 10, 50, 50));
    ui.add_child(parent, leaf);
    ui
}

fn pointer_event(x: i32, y: i32) -> EventData {
    EventData {
        x,
        y,
        x_root: x,
        y_root: y,
        ..Default::default()
    }
}

fn bench_move_dispatch(c: &mut Criterion) {
    let mut ui = deep_ui(16);
    c.bench_function("dispatch_move_depth16", |b| {
        b.iter(|| {
            black_box(ui.dispatch_raw(RawEvent {
                window: NativeHandle(1),
                event: Event::Move,
                data: pointer_event(20, 20),
            }))
        })
    });
}

fn bench_press_release(c: &mut Criterion) {
    let mut ui = deep_ui(8);
    c.bench_function("dispatch_press_release_depth8", |b| {
        b.iter(|| {
            ui.dispatch_raw(RawEvent {
                window: NativeHandle(1),
                event: Event::Press,
                data: pointer_event(20, 20),
            });
            ui.dispatch_raw(RawEvent {
                window: NativeHandle(1),
                event: Event::Release,
                data: pointer_event(20, 20),
            });
            ui.driver_mut::<HeadlessDriver>().unwrap().clear_recordings();
        })
    });
}

criterion_group!(benches, bench_move_dispatch, bench_press_release);
criterion_main!(benches);
