//! Roll history ledger.
//!
//! Newest-first, capped at [`MAX_HISTORY_ENTRIES`]. Every mutation rewrites
//! the whole snapshot under `rollHistory`; fine at fifty entries, not meant
//! to grow past that.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::KeyValueStore;
use crate::clock::Clock;
use crate::constants::{
    JUST_NOW_SECS, KEY_ROLL_HISTORY, MAX_HISTORY_ENTRIES, MS_PER_SEC, SECS_PER_DAY,
    SECS_PER_HOUR, SECS_PER_MINUTE,
};
use crate::face::Face;
use crate::storage::{read_json, remove_key, write_json};

/// One outcome of the dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEvent {
    #[serde(rename = "number")]
    pub face: Face,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub occurred_at: i64,
}

/// Raw persisted row, validated into a [`RollEvent`] on load.
#[derive(Deserialize)]
struct StoredRoll {
    number: i64,
    timestamp: i64,
}

/// Validate one persisted row; a bad row is dropped without touching its neighbours.
fn decode_row(raw: serde_json::Value) -> Option<RollEvent> {
    let row = match serde_json::from_value::<StoredRoll>(raw) {
        Ok(row) => row,
        Err(err) => {
            log::warn!("dropping malformed `{KEY_ROLL_HISTORY}` row: {err}");
            return None;
        }
    };
    match Face::try_from(row.number) {
        Ok(face) => Some(RollEvent {
            face,
            occurred_at: row.timestamp,
        }),
        Err(err) => {
            log::warn!("dropping `{KEY_ROLL_HISTORY}` row: {err}");
            None
        }
    }
}

/// Elapsed time since a roll, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "count", rename_all = "camelCase")]
pub enum RelativeAge {
    JustNow,
    Seconds(u64),
    Minutes(u64),
    Hours(u64),
    Days(u64),
}

impl RelativeAge {
    /// Classify the time between `occurred_at` and `now_ms`.
    ///
    /// Elapsed time is floored to whole seconds first. Negative spans
    /// (clock moved backwards) read as just now.
    #[must_use]
    pub fn between(occurred_at: i64, now_ms: i64) -> Self {
        let secs = now_ms.saturating_sub(occurred_at).div_euclid(MS_PER_SEC);
        let whole = |unit: i64| u64::try_from(secs / unit).unwrap_or(0);
        if secs < JUST_NOW_SECS {
            Self::JustNow
        } else if secs < SECS_PER_MINUTE {
            Self::Seconds(whole(1))
        } else if secs < SECS_PER_HOUR {
            Self::Minutes(whole(SECS_PER_MINUTE))
        } else if secs < SECS_PER_DAY {
            Self::Hours(whole(SECS_PER_HOUR))
        } else {
            Self::Days(whole(SECS_PER_DAY))
        }
    }

    /// Count in the band's unit; `None` for just now.
    #[must_use]
    pub const fn count(self) -> Option<u64> {
        match self {
            Self::JustNow => None,
            Self::Seconds(n) | Self::Minutes(n) | Self::Hours(n) | Self::Days(n) => Some(n),
        }
    }
}

impl fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, unit) = match *self {
            Self::JustNow => return f.write_str("just now"),
            Self::Seconds(n) => (n, "second"),
            Self::Minutes(n) => (n, "minute"),
            Self::Hours(n) => (n, "hour"),
            Self::Days(n) => (n, "day"),
        };
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{count} {unit}{plural} ago")
    }
}

/// Capacity-bounded, newest-first log of roll events.
#[derive(Debug)]
pub struct HistoryLedger<S> {
    store: S,
    entries: Vec<RollEvent>,
}

impl<S: KeyValueStore> HistoryLedger<S> {
    /// Load the persisted snapshot, dropping invalid rows.
    pub fn load(store: S) -> Self {
        let mut entries: Vec<RollEvent> =
            read_json::<_, Vec<serde_json::Value>>(&store, KEY_ROLL_HISTORY)
                .unwrap_or_default()
                .into_iter()
                .filter_map(decode_row)
                .collect();
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { store, entries }
    }

    /// Record a roll timestamped by `clock`.
    pub fn record<C: Clock + ?Sized>(&mut self, face: Face, clock: &C) -> RollEvent {
        self.record_at(face, clock.now_ms())
    }

    /// Record a roll at an explicit instant, trimming the oldest entry past the cap.
    pub fn record_at(&mut self, face: Face, occurred_at: i64) -> RollEvent {
        let event = RollEvent { face, occurred_at };
        self.entries.insert(0, event);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.persist();
        event
    }

    /// Entries, newest first.
    #[must_use]
    pub fn all(&self) -> &[RollEvent] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&RollEvent> {
        self.entries.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        remove_key(&self.store, KEY_ROLL_HISTORY);
    }

    #[must_use]
    pub fn relative_age(event: &RollEvent, now_ms: i64) -> RelativeAge {
        RelativeAge::between(event.occurred_at, now_ms)
    }

    fn persist(&self) {
        write_json(&self.store, KEY_ROLL_HISTORY, &self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::test_support::BrokenStore;

    fn face(v: u8) -> Face {
        Face::new(v).unwrap()
    }

    #[test]
    fn record_prepends_and_persists() {
        let store = MemoryStore::new();
        let mut ledger = HistoryLedger::load(store.clone());
        ledger.record_at(face(2), 1_000);
        let latest = ledger.record_at(face(5), 2_000);

        assert_eq!(latest.face, face(5));
        assert_eq!(ledger.all()[0], latest);
        assert_eq!(ledger.all()[1].occurred_at, 1_000);

        let raw = store.get_item(KEY_ROLL_HISTORY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"number":5,"timestamp":2000},{"number":2,"timestamp":1000}]"#
        );
    }

    #[test]
    fn trims_oldest_past_cap() {
        let mut ledger = HistoryLedger::load(MemoryStore::new());
        for i in 0..60_i64 {
            ledger.record_at(face(1), i);
        }
        assert_eq!(ledger.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(ledger.latest().map(|e| e.occurred_at), Some(59));
        assert_eq!(ledger.all().last().map(|e| e.occurred_at), Some(10));
    }

    #[test]
    fn clear_empties_and_removes_key() {
        let store = MemoryStore::new();
        let mut ledger = HistoryLedger::load(store.clone());
        ledger.record_at(face(3), 10);
        ledger.clear();
        assert!(ledger.all().is_empty());
        assert_eq!(store.get_item(KEY_ROLL_HISTORY).unwrap(), None);
        assert!(HistoryLedger::load(store).is_empty());
    }

    #[test]
    fn load_skips_invalid_rows_and_truncates() {
        let store = MemoryStore::new();
        let mut rows: Vec<String> = vec![
            r#"{"number":9,"timestamp":1}"#.to_string(),
            r#"{"number":0,"timestamp":2}"#.to_string(),
        ];
        rows.extend((0..55).map(|i| format!(r#"{{"number":4,"timestamp":{i}}}"#)));
        store
            .set_item(KEY_ROLL_HISTORY, &format!("[{}]", rows.join(",")))
            .unwrap();

        let ledger = HistoryLedger::load(store);
        assert_eq!(ledger.len(), MAX_HISTORY_ENTRIES);
        assert!(ledger.all().iter().all(|e| e.face == face(4)));
        assert_eq!(ledger.latest().map(|e| e.occurred_at), Some(0));
    }

    #[test]
    fn load_keeps_good_rows_around_malformed_ones() {
        let store = MemoryStore::new();
        store
            .set_item(
                KEY_ROLL_HISTORY,
                r#"[{"number":4,"timestamp":3000},{"number":"6","timestamp":2000},{"number":2,"timestamp":1000},{"number":5},null,7]"#,
            )
            .unwrap();

        let ledger = HistoryLedger::load(store);
        let kept: Vec<(u8, i64)> = ledger
            .all()
            .iter()
            .map(|e| (e.face.value(), e.occurred_at))
            .collect();
        assert_eq!(kept, vec![(4, 3000), (2, 1000)]);
    }

    #[test]
    fn row_missing_timestamp_spares_the_rest() {
        let store = MemoryStore::new();
        store
            .set_item(
                KEY_ROLL_HISTORY,
                r#"[{"number":3},{"number":1,"timestamp":10}]"#,
            )
            .unwrap();
        let ledger = HistoryLedger::load(store);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest().map(|e| e.occurred_at), Some(10));
    }

    #[test]
    fn corrupt_snapshot_loads_empty() {
        let store = MemoryStore::new();
        store.set_item(KEY_ROLL_HISTORY, "not json").unwrap();
        assert!(HistoryLedger::load(store).is_empty());
    }

    #[test]
    fn storage_failure_keeps_memory_state() {
        let store = BrokenStore::default();
        let mut ledger = HistoryLedger::load(store.clone());
        ledger.record_at(face(6), 5);
        assert_eq!(ledger.len(), 1);
        assert_eq!(store.writes.get(), 1);
    }

    #[test]
    fn relative_age_band_edges() {
        let at = 1_000_000;
        let age = |delta: i64| RelativeAge::between(at, at + delta);
        assert_eq!(age(4_999), RelativeAge::JustNow);
        assert_eq!(age(5_000), RelativeAge::Seconds(5));
        assert_eq!(age(59_999), RelativeAge::Seconds(59));
        assert_eq!(age(60_000), RelativeAge::Minutes(1));
        assert_eq!(age(3_599_999), RelativeAge::Minutes(59));
        assert_eq!(age(3_600_000), RelativeAge::Hours(1));
        assert_eq!(age(86_399_999), RelativeAge::Hours(23));
        assert_eq!(age(86_400_000), RelativeAge::Days(1));
        assert_eq!(age(10 * 86_400_000), RelativeAge::Days(10));
        assert_eq!(age(-30_000), RelativeAge::JustNow);
    }

    #[test]
    fn relative_age_display_pluralizes() {
        assert_eq!(RelativeAge::JustNow.to_string(), "just now");
        assert_eq!(RelativeAge::Seconds(12).to_string(), "12 seconds ago");
        assert_eq!(RelativeAge::Minutes(1).to_string(), "1 minute ago");
        assert_eq!(RelativeAge::Hours(2).to_string(), "2 hours ago");
        assert_eq!(RelativeAge::Days(1).to_string(), "1 day ago");
        assert_eq!(RelativeAge::Days(3).count(), Some(3));
        assert_eq!(RelativeAge::JustNow.count(), None);
    }
}
