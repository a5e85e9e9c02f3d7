//! The platform driver boundary.
//!
//! Everything platform-specific sits behind [`PlatformDriver`]: blocking
//! for events, translating native events into [`RawEvent`]s, pointer
//! capture, raising windows, timers and the final flush of a window's
//! damage to the screen. The core never calls a windowing API directly.

use std::any::Any;

use crate::damage::Region;
use crate::event::{Event, EventData};
use crate::windows::NativeHandle;

/// A translated native event, queued by the driver until the core
/// drains it.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub window: NativeHandle,
    pub event: Event,
    pub data: EventData,
}

/// Timer callback. The `usize` token distinguishes registrations that
/// share a function, and removal matches on the (function, token) pair.
pub type TimeoutHandler = fn(&mut crate::context::Ui, usize);

/// Services the toolkit core requires from the platform layer.
///
/// Implementations are single-threaded like the core itself; the only
/// method another thread may rely on is [`wake`](Self::wake), which must
/// merely cause a blocked [`wait`](Self::wait) to return early.
pub trait PlatformDriver {
    /// Block until an event, timer or wake arrives, or `timeout`
    /// seconds pass. Returns the time actually waited.
    fn wait(&mut self, timeout: f64) -> f64;

    /// True if a call to [`wait`](Self::wait) would return immediately.
    fn ready(&self) -> bool;

    /// Take every event queued since the last drain, in arrival order.
    fn drain(&mut self) -> Vec<RawEvent>;

    /// Timer callbacks that came due during the last wait.
    fn take_due_timeouts(&mut self) -> Vec<(TimeoutHandler, usize)>;

    fn add_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize);

    /// Like [`add_timeout`](Self::add_timeout), but measured from when
    /// the previous deadline fired rather than from now, so periodic
    /// timers do not drift.
    fn repeat_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize);

    fn has_timeout(&self, handler: TimeoutHandler, token: usize) -> bool;

    /// Removing a timeout that no longer exists is harmless. Removes
    /// every matching registration.
    fn remove_timeout(&mut self, handler: TimeoutHandler, token: usize);

    /// Acquire or release the system pointer/keyboard grab.
    fn capture(&mut self, active: bool) {
        let _ = active;
    }

    /// Bring a window to the top of the native stacking order.
    fn raise(&mut self, native: NativeHandle) {
        let _ = native;
    }

    /// Ask the platform to move keyboard focus to a window.
    fn take_focus(&mut self, native: NativeHandle) {
        let _ = native;
    }

    /// Push one window's accumulated damage to the screen. `region` is
    /// `None` when the whole window repaints.
    fn flush_window(&mut self, native: NativeHandle, region: Option<&Region>);

    /// Flush any buffered output to the display server.
    fn flush(&mut self) {}

    /// Wake the main thread out of a blocking wait. The one entry point
    /// other threads may use.
    fn wake(&mut self) {}

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
