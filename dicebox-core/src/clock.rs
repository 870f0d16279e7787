//! Time sources for roll timestamps and daily eligibility.
use std::cell::Cell;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current instant and calendar day.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// The calendar day used for daily eligibility.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Days roll over at local midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to. Days roll over at UTC midnight.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    #[must_use]
    pub const fn at_ms(now_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    /// Noon UTC of `date`.
    #[must_use]
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .map_or(0, |dt| dt.and_utc().timestamp_millis());
        Self::at_ms(noon)
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_ms(days.saturating_mul(86_400_000));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms.get())
            .unwrap_or_default()
            .date_naive()
    }
}
