//! In-memory platform driver.
//!
//! Drives the toolkit without any window system: events are pushed by
//! the application (or a test) and time is a simulated clock that only
//! advances inside [`wait`](PlatformDriver::wait). Capture, raise and
//! flush calls are recorded so tests can assert on them.

use std::any::Any;
use std::collections::VecDeque;

use crate::damage::Region;
use crate::driver::{PlatformDriver, RawEvent, TimeoutHandler};
use crate::event::{Event, EventData};
use crate::windows::NativeHandle;

struct TimeoutEntry {
    deadline: f64,
    handler: TimeoutHandler,
    token: usize,
}

#[derive(Default)]
pub struct HeadlessDriver {
    now: f64,
    last_fire: f64,
    queue: VecDeque<RawEvent>,
    timeouts: Vec<TimeoutEntry>,
    due: Vec<(TimeoutHandler, usize)>,
    captured: bool,
    raised: Vec<NativeHandle>,
    focused: Vec<NativeHandle>,
    flushed: Vec<(NativeHandle, Option<Region>)>,
    woken: bool,
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a translated event for the next drain.
    pub fn push(&mut self, window: NativeHandle, event: Event, data: EventData) {
        self.queue.push_back(RawEvent {
            window,
            event,
            data,
        });
    }

    /// Simulated time since the driver was created, in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Whether the system grab is currently held.
    pub fn captured(&self) -> bool {
        self.captured
    }

    /// Windows raised so far, in call order.
    pub fn raised(&self) -> &[NativeHandle] {
        &self.raised
    }

    /// Windows the platform was asked to focus, in call order.
    pub fn focused(&self) -> &[NativeHandle] {
        &self.focused
    }

    /// Window flushes performed so far, with the region each carried.
    pub fn flushed(&self) -> &[(NativeHandle, Option<Region>)] {
        &self.flushed
    }

    pub fn clear_recordings(&mut self) {
        self.raised.clear();
        self.focused.clear();
        self.flushed.clear();
    }

    fn next_deadline(&self) -> Option<f64> {
        self.timeouts
            .iter()
            .map(|t| t.deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    fn collect_due(&mut self) {
        if self.timeouts.iter().any(|t| t.deadline <= self.now) {
            self.last_fire = self.now;
        }
        let mut i = 0;
        while i < self.timeouts.len() {
            if self.timeouts[i].deadline <= self.now {
                let entry = self.timeouts.remove(i);
                self.due.push((entry.handler, entry.token));
            } else {
                i += 1;
            }
        }
    }
}

impl PlatformDriver for HeadlessDriver {
    fn wait(&mut self, timeout: f64) -> f64 {
        if self.woken {
            self.woken = false;
            return 0.0;
        }
        if !self.queue.is_empty() {
            return 0.0;
        }
        let waited = match self.next_deadline() {
            Some(deadline) => (deadline - self.now).max(0.0).min(timeout),
            None => timeout,
        };
        self.now += waited;
        self.collect_due();
        waited
    }

    fn ready(&self) -> bool {
        !self.queue.is_empty()
            || self.woken
            || self.timeouts.iter().any(|t| t.deadline <= self.now)
    }

    fn drain(&mut self) -> Vec<RawEvent> {
        self.queue.drain(..).collect()
    }

    fn take_due_timeouts(&mut self) -> Vec<(TimeoutHandler, usize)> {
        std::mem::take(&mut self.due)
    }

    fn add_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize) {
        self.timeouts.push(TimeoutEntry {
            deadline: self.now + delay,
            handler,
            token,
        });
    }

    fn repeat_timeout(&mut self, delay: f64, handler: TimeoutHandler, token: usize) {
        self.timeouts.push(TimeoutEntry {
            deadline: self.last_fire + delay,
            handler,
            token,
        });
    }

    fn has_timeout(&self, handler: TimeoutHandler, token: usize) -> bool {
        self.timeouts
            .iter()
            .any(|t| t.handler == handler && t.token == token)
    }

    fn remove_timeout(&mut self, handler: TimeoutHandler, token: usize) {
        self.timeouts
            .retain(|t| !(t.handler == handler && t.token == token));
    }

    fn capture(&mut self, active: bool) {
        self.captured = active;
    }

    fn raise(&mut self, native: NativeHandle) {
        self.raised.push(native);
    }

    fn take_focus(&mut self, native: NativeHandle) {
        self.focused.push(native);
    }

    fn flush_window(&mut self, native: NativeHandle, region: Option<&Region>) {
        self.flushed.push((native, region.cloned()));
    }

    fn wake(&mut self) {
        self.woken = true;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
