//! Velum UI - event dispatch, focus and damage core of a widget toolkit
//!
//! This crate is the platform-independent heart of the toolkit: it takes
//! translated native events from a [`PlatformDriver`], routes them
//! through an arena-backed widget tree with focus, capture ("grab") and
//! modality semantics, tracks per-widget damage, and schedules safe
//! widget destruction across re-entrant callbacks.
//!
//! - Event routing with a closed event vocabulary and an installable
//!   dispatch override
//! - Process-wide focus / pushed / belowmouse / grab / modal state with
//!   an invariant-restoring `fix_focus`
//! - Recency-ordered registry of shown top-level windows
//! - Damage bitmasks plus per-window dirty regions, flushed once per
//!   loop iteration
//! - Deferred deletion and watched handles for callback-safe destruction
//!
//! ## Quick Start
//!
//! ```
//! use velum_ui::{Event, NativeHandle, Rect, Ui, Window};
//!
//! let mut ui = Ui::headless();
//! let window = ui.add_widget(Window::new(), Rect::new(0, 0, 640, 480));
//! ui.map_window(window, NativeHandle(1));
//!
//! // events normally arrive through the driver; synthetic dispatch
//! // works the same way
//! ui.handle(Event::Press, Some(window));
//! assert_eq!(ui.pushed(), Some(window));
//! ```

pub mod context;
pub mod damage;
pub mod dispatch;
pub mod driver;
pub mod event;
pub mod focus;
pub mod headless;
pub mod tooltip;
pub mod tree;
pub mod watch;
pub mod widget;
pub mod widgets;
pub mod windows;

pub use context::{CheckHandler, Ui, UiOptions};
pub use damage::{Damage, Region};
pub use dispatch::{DispatchFn, EventHandler, SystemHandler};
pub use driver::{PlatformDriver, RawEvent, TimeoutHandler};
pub use event::{Event, EventData, EventState, Key, Modifiers, MouseButton};
pub use headless::HeadlessDriver;
pub use tooltip::{TooltipEnter, TooltipExit};
pub use tree::{WidgetId, WidgetTree};
pub use watch::{WatchHandle, WatchList, WidgetTracker};
pub use widget::{Widget, WidgetFlags};
pub use widgets::{Frame, Group, Window};
pub use windows::{NativeHandle, WindowEntry, WindowRegistry};

// Re-export common types from the core layer
pub use velum_core::geometry::{Point, Rect};
