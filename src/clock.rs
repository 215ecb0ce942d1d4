/// Cooperative timer registry.
///
/// `Clock` maps small integer event ids to a callback, a delay and an
/// absolute next-due timestamp. Nothing runs on its own: the owner calls
/// `make_step` from its loop and every event whose due time has passed fires
/// once, in registration order, and is rescheduled `delay` seconds after the
/// step's timestamp.
///
/// Callbacks receive `&mut T`, a context owned by the caller and lent to the
/// clock for the duration of a step. This keeps the monitor state out of the
/// clock without shared ownership.
///
/// There is no catch-up: an event that is several periods overdue still
/// fires only once per step.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// Event identifier.
pub type EventId = u32;

/// Callback invoked when an event fires.
pub type Callback<T, R> = Box<dyn FnMut(&mut T) -> R>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("event {0} is not registered with the clock")]
    UnknownEvent(EventId),
}

// ---------------------------------------------------------------------------
// Time sources
// ---------------------------------------------------------------------------

/// Source of "now" for the clock and the day/night policy.
pub trait TimeSource {
    /// Whole seconds since the Unix epoch.
    fn now(&self) -> i64;

    /// Local wall-clock time of day.
    fn local_time(&self) -> NaiveTime;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Hand-driven time for tests and simulations. The stored datetime is used
/// both as local time of day and, read as UTC, as the epoch timestamp.
#[derive(Debug)]
pub struct ManualTime {
    current: Cell<NaiveDateTime>,
}

impl ManualTime {
    pub fn new(start: NaiveDateTime) -> Rc<Self> {
        Rc::new(Self {
            current: Cell::new(start),
        })
    }

    pub fn advance(&self, seconds: i64) {
        self.current
            .set(self.current.get() + chrono::Duration::seconds(seconds));
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.current.set(at);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> i64 {
        self.current.get().and_utc().timestamp()
    }

    fn local_time(&self) -> NaiveTime {
        self.current.get().time()
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

struct ScheduledEvent<T, R> {
    callback: Callback<T, R>,
    /// Seconds between firings; `<= 0` leaves the event disarmed.
    delay: i64,
    /// Absolute due time; 0 means disarmed.
    next_due: i64,
}

pub struct Clock<T, R> {
    // Vec rather than a map: firing order is registration order.
    events: Vec<(EventId, ScheduledEvent<T, R>)>,
    time: Rc<dyn TimeSource>,
}

impl<T, R> Clock<T, R> {
    /// Clock driven by the system time.
    pub fn new() -> Self {
        Self::with_time_source(Rc::new(WallClock))
    }

    pub fn with_time_source(time: Rc<dyn TimeSource>) -> Self {
        Self {
            events: Vec::new(),
            time,
        }
    }

    /// Current Unix timestamp in whole seconds.
    pub fn now(&self) -> i64 {
        self.time.now()
    }

    pub fn time_source(&self) -> Rc<dyn TimeSource> {
        Rc::clone(&self.time)
    }

    /// Registers `event`, replacing any previous registration under the same
    /// id (which keeps its original position in the firing order).
    ///
    /// A positive `delay` arms the event `delay` seconds from now; zero or a
    /// negative value registers it disarmed until `set` is called.
    pub fn add(&mut self, event: EventId, callback: Callback<T, R>, delay: i64) {
        let scheduled = ScheduledEvent {
            callback,
            delay,
            next_due: self.next_execution_time(delay),
        };

        match self.events.iter_mut().find(|(id, _)| *id == event) {
            Some((_, existing)) => *existing = scheduled,
            None => self.events.push((event, scheduled)),
        }
    }

    /// Changes the delay of a registered event and re-arms it from now.
    ///
    /// # Errors
    /// `ClockError::UnknownEvent` if `event` was never added (or was removed).
    pub fn set(&mut self, event: EventId, delay: i64) -> Result<(), ClockError> {
        let next_due = self.next_execution_time(delay);
        let (_, scheduled) = self
            .events
            .iter_mut()
            .find(|(id, _)| *id == event)
            .ok_or(ClockError::UnknownEvent(event))?;

        scheduled.delay = delay;
        scheduled.next_due = next_due;
        Ok(())
    }

    /// Fires every event whose due time is strictly in the past and returns
    /// the callback results keyed by event id, in firing order.
    pub fn make_step(&mut self, ctx: &mut T) -> Vec<(EventId, R)> {
        let current_time = self.time.now();
        let mut results = Vec::new();

        for (id, event) in self.events.iter_mut() {
            if 0 < event.next_due && event.next_due < current_time {
                results.push((*id, (event.callback)(ctx)));
                event.next_due = current_time + event.delay;
            }
        }

        results
    }

    /// Deregisters `event`. Unknown ids are ignored.
    pub fn remove(&mut self, event: EventId) {
        self.events.retain(|(id, _)| *id != event);
    }

    pub fn contains(&self, event: EventId) -> bool {
        self.events.iter().any(|(id, _)| *id == event)
    }

    /// Absolute due time of `event`, `Some(0)` when disarmed.
    pub fn next_due(&self, event: EventId) -> Option<i64> {
        self.events
            .iter()
            .find(|(id, _)| *id == event)
            .map(|(_, e)| e.next_due)
    }

    pub fn delay(&self, event: EventId) -> Option<i64> {
        self.events
            .iter()
            .find(|(id, _)| *id == event)
            .map(|(_, e)| e.delay)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn next_execution_time(&self, delay: i64) -> i64 {
        if delay > 0 { self.now() + delay } else { 0 }
    }
}

impl<T, R> Default for Clock<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
