/// Day/night window for the reset cadence.
///
/// Aurora is only visible in darkness, so during the day crossed levels are
/// remembered longer and resets happen less often.

use chrono::NaiveTime;

pub const DEFAULT_DAY_START: NaiveTime = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
pub const DEFAULT_DAY_END: NaiveTime = NaiveTime::from_hms_opt(19, 0, 0).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DayWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive. A window whose start is after its end
    /// wraps past midnight.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

impl Default for DayWindow {
    /// 06:00 - 19:00
    fn default() -> Self {
        Self::new(DEFAULT_DAY_START, DEFAULT_DAY_END)
    }
}

/// Reset delay for the given half of the day.
pub fn reset_delay(is_day: bool, day_delay: i64, night_delay: i64) -> i64 {
    if is_day { day_delay } else { night_delay }
}
