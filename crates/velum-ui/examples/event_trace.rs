//! Drive the toolkit core with a synthetic event stream.
//!
//! No window system involved: events are pushed into the headless
//! driver the way a platform backend would queue translated native
//! events, then pumped through the regular wait/dispatch loop.

use std::cell::Cell;
use std::rc::Rc;

use velum_ui::{
    Event, EventData, HeadlessDriver, NativeHandle, Rect, Ui, Widget, WidgetId, Window,
};

struct ClickCounter {
    clicks: Rc<Cell<u32>>,
}

impl Widget for ClickCounter {
    fn handle(&self, ui: &mut Ui, self_id: WidgetId, event: Event) -> bool {
        match event {
            Event::Press => true,
            Event::Release => {
                self.clicks.set(self.clicks.get() + 1);
                ui.do_callback(self_id);
                true
            }
            _ => false,
        }
    }
}

fn pointer(x: i32, y: i32) -> EventData {
    EventData {
        x,
        y,
        x_root: x,
        y_root: y,
        ..Default::default()
    }
}

fn main() {
    velum_core::logging::init();

    let mut ui = Ui::headless();
    let window = ui.add_widget(Window::new(), Rect::new(0, 0, 320, 240));
    ui.map_window(window, NativeHandle(1));
    ui.expose_window(window);

    let clicks = Rc::new(Cell::new(0));
    let button = ui.add_widget(
        ClickCounter {
            clicks: clicks.clone(),
        },
        Rect::new(40, 40, 120, 32),
    );
    ui.add_child(window, button);

    // a click on the button, a click on empty space, some motion
    let driver = ui.driver_mut::<HeadlessDriver>().unwrap();
    driver.push(NativeHandle(1), Event::Enter, pointer(50, 50));
    driver.push(NativeHandle(1), Event::Press, pointer(50, 50));
    driver.push(NativeHandle(1), Event::Release, pointer(50, 50));
    driver.push(NativeHandle(1), Event::Move, pointer(300, 200));
    driver.push(NativeHandle(1), Event::Press, pointer(300, 200));
    driver.push(NativeHandle(1), Event::Release, pointer(300, 200));

    while ui.ready() {
        ui.check();
    }

    println!("button clicked {} time(s)", clicks.get());
    while let Some(widget) = ui.read_queue() {
        println!("default action requested for {widget:?}");
    }

    ui.hide_widget(window);
}
