/// Aurora and geomagnetic activity monitor.
///
/// ## Structure
///
/// **`AuroraWatch`** holds everything a check touches: the feed source, the
/// notifier, the observer's grid point and the `MonitorState` (last crossed
/// level per metric, day flag, last send time). `check` and `reset` live
/// here.
///
/// **`Monitor`** owns an `AuroraWatch` plus the `Clock` that drives it. Two
/// events are registered:
/// - `CHECK_EVENT` every `check_interval_secs`: fetch, evaluate, notify
/// - `RESET_EVENT` every night/day reset delay: forget crossed levels
///
/// `step` advances the clock once and re-applies the day/night policy;
/// `run` is the long-lived loop around it.
///
/// **Failure handling:**
/// both feeds are fetched before any level moves, and levels are committed
/// only after the notification went out. A failed feed or push therefore
/// leaves the state untouched and the same crossing is reported on the next
/// successful check. Errors are returned, never swallowed; `run` stops on
/// the first one unless `keep_running_on_error` is set.

pub mod daylight;

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::{Clock, EventId, TimeSource, WallClock};
use crate::config::MonitorConfig;
use crate::ingest::DataSource;
use crate::levels::{self, Language, Metric};
use crate::model::MonitorError;
use crate::notify::Notifier;

pub const CHECK_EVENT: EventId = 1;
pub const RESET_EVENT: EventId = 2;

/// What a fired event did.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// A check ran; holds the notification text, empty if nothing was sent.
    Checked(String),
    Reset,
}

pub type TaskResult = Result<TaskOutcome, MonitorError>;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// In-memory monitoring state. Nothing here survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonitorState {
    /// Highest aurora level reported since the last reset (0 = none).
    pub aurora_level: f64,
    /// Highest K-index level reported since the last reset (0 = none).
    pub k_level: f64,
    pub is_day: bool,
    /// Unix time of the last delivered notification, 0 if none yet.
    pub last_send_time: i64,
}

impl MonitorState {
    pub fn last_level(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Aurora => self.aurora_level,
            Metric::KIndex => self.k_level,
        }
    }

    fn set_level(&mut self, metric: Metric, level: f64) {
        match metric {
            Metric::Aurora => self.aurora_level = level,
            Metric::KIndex => self.k_level = level,
        }
    }
}

// ---------------------------------------------------------------------------
// AuroraWatch
// ---------------------------------------------------------------------------

pub struct AuroraWatch<D, N> {
    source: D,
    notifier: N,
    longitude: i32,
    latitude: i32,
    language: Language,
    state: MonitorState,
    time: Rc<dyn TimeSource>,
}

impl<D: DataSource, N: Notifier> AuroraWatch<D, N> {
    pub fn new(
        config: &MonitorConfig,
        source: D,
        notifier: N,
        time: Rc<dyn TimeSource>,
    ) -> Self {
        Self {
            source,
            notifier,
            longitude: config.longitude,
            latitude: config.latitude,
            language: config.language,
            state: MonitorState::default(),
            time,
        }
    }

    /// Fetches both feeds, reports newly crossed levels and returns the
    /// notification text (aurora line first, empty when nothing crossed).
    ///
    /// # Errors
    /// Any feed or push failure. The state is left as it was.
    pub fn check(&mut self) -> Result<String, MonitorError> {
        let grid = self.source.aurora_grid()?;
        let kp = self.source.latest_kp()?;

        if !grid.contains(self.longitude, self.latitude) {
            debug!(
                longitude = self.longitude,
                latitude = self.latitude,
                "observer point not on aurora grid, reading 0"
            );
        }
        let local_aurora = grid.intensity_at(self.longitude, self.latitude);

        let mut next = self.state;
        let mut lines = Vec::new();
        for (metric, value) in [(Metric::Aurora, local_aurora), (Metric::KIndex, kp.kp_index)] {
            let table = levels::table(metric, self.language);
            if let Some(crossing) = levels::evaluate(value, table, next.last_level(metric)) {
                next.set_level(metric, crossing.level);
                lines.push(crossing.message);
            }
        }

        let message = lines.join("\n");
        if !message.is_empty() {
            self.notifier.send(&message)?;
            next.last_send_time = self.time.now();
        }
        self.state = next;

        info!(
            aurora = local_aurora,
            max_aurora = grid.max_intensity(),
            kp = kp.kp_index,
            kp_time = %kp.time_tag,
            last_aurora = self.state.aurora_level,
            last_k = self.state.k_level,
            day = self.state.is_day,
            notified = !message.is_empty(),
            channel = self.notifier.channel_name(),
            "check complete"
        );

        Ok(message)
    }

    /// Forgets crossed levels so any threshold can notify again.
    pub fn reset(&mut self) {
        if self.state.aurora_level != 0.0 || self.state.k_level != 0.0 {
            info!(
                last_aurora = self.state.aurora_level,
                last_k = self.state.k_level,
                "resetting crossed levels"
            );
        }
        self.state.aurora_level = 0.0;
        self.state.k_level = 0.0;
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }
}

fn run_check<D: DataSource, N: Notifier>(watch: &mut AuroraWatch<D, N>) -> TaskResult {
    watch.check().map(TaskOutcome::Checked)
}

fn run_reset<D: DataSource, N: Notifier>(watch: &mut AuroraWatch<D, N>) -> TaskResult {
    watch.reset();
    Ok(TaskOutcome::Reset)
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

pub struct Monitor<D, N> {
    config: MonitorConfig,
    clock: Clock<AuroraWatch<D, N>, TaskResult>,
    watch: AuroraWatch<D, N>,
}

impl<D: DataSource + 'static, N: Notifier + 'static> Monitor<D, N> {
    pub fn new(config: MonitorConfig, source: D, notifier: N) -> Self {
        Self::with_time_source(config, source, notifier, Rc::new(WallClock))
    }

    /// Monitor whose clock and day/night policy read time from `time`.
    pub fn with_time_source(
        config: MonitorConfig,
        source: D,
        notifier: N,
        time: Rc<dyn TimeSource>,
    ) -> Self {
        let watch = AuroraWatch::new(&config, source, notifier, Rc::clone(&time));
        Self {
            config,
            clock: Clock::with_time_source(time),
            watch,
        }
    }

    pub fn check(&mut self) -> Result<String, MonitorError> {
        self.watch.check()
    }

    pub fn reset(&mut self) {
        self.watch.reset();
    }

    pub fn is_daytime(&self) -> bool {
        self.config
            .day_window
            .contains(self.clock.time_source().local_time())
    }

    /// Re-arms the reset event when daylight flipped since the last call.
    /// Returns whether anything changed.
    ///
    /// # Errors
    /// `ClockError::UnknownEvent` if called before the events are registered
    /// and the day flag needs to change.
    pub fn update_daytime_delay(&mut self) -> Result<bool, MonitorError> {
        let is_day = self.is_daytime();
        if is_day == self.watch.state.is_day {
            return Ok(false);
        }

        let delay = daylight::reset_delay(
            is_day,
            self.config.reset_delay_day_secs,
            self.config.reset_delay_night_secs,
        );
        self.clock.set(RESET_EVENT, delay)?;
        self.watch.state.is_day = is_day;

        info!(day = is_day, reset_delay_secs = delay, "daylight changed, reset cadence updated");
        Ok(true)
    }

    /// Registers the periodic events, applies the day/night delay and runs
    /// the first check right away.
    pub fn start(&mut self) -> Result<String, MonitorError> {
        self.clock.add(
            CHECK_EVENT,
            Box::new(run_check::<D, N>),
            self.config.check_interval_secs,
        );
        self.clock.add(
            RESET_EVENT,
            Box::new(run_reset::<D, N>),
            self.config.reset_delay_night_secs,
        );
        self.update_daytime_delay()?;
        self.check()
    }

    /// One loop iteration: fire due events, then re-apply the day/night
    /// policy. Returns the outcome of every event that fired.
    ///
    /// # Errors
    /// The first failed event, in firing order. Events that fired are
    /// rescheduled either way.
    pub fn step(&mut self) -> Result<Vec<(EventId, TaskOutcome)>, MonitorError> {
        let fired = self.clock.make_step(&mut self.watch);
        self.update_daytime_delay()?;

        fired
            .into_iter()
            .map(|(id, result)| result.map(|outcome| (id, outcome)))
            .collect()
    }

    /// Runs until `stop` is raised (or forever). Returns early with the
    /// first error unless `keep_running_on_error` is set.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), MonitorError> {
        info!(
            latitude = self.config.latitude,
            longitude = self.config.longitude,
            language = %self.config.language,
            check_interval_secs = self.config.check_interval_secs,
            "monitor loop starting"
        );

        if let Err(e) = self.start() {
            self.handle_failure(e)?;
        }

        let pause = Duration::from_secs(self.config.step_interval_secs);
        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = self.step() {
                self.handle_failure(e)?;
            }
            thread::sleep(pause);
        }

        info!("monitor loop stopped");
        Ok(())
    }

    fn handle_failure(&self, error: MonitorError) -> Result<(), MonitorError> {
        if self.config.keep_running_on_error {
            warn!(
                error = %error,
                connectivity = error.is_connectivity(),
                "check cycle failed, continuing"
            );
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn state(&self) -> &MonitorState {
        self.watch.state()
    }

    pub fn clock(&self) -> &Clock<AuroraWatch<D, N>, TaskResult> {
        &self.clock
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
