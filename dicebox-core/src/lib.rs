//! Dicebox Core
//!
//! Platform-agnostic logic for the Dicebox dice toy: roll history, the daily
//! bonus-roll streak and the skins it unlocks, and user preferences.
//! This crate has no UI or browser dependencies; front ends supply a
//! [`KeyValueStore`] and a [`Clock`].

pub mod clock;
pub mod constants;
pub mod face;
pub mod history;
pub mod prefs;
pub mod session;
pub mod skins;
pub mod storage;
pub mod streak;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::{MAX_HISTORY_ENTRIES, MILESTONES};
pub use face::{Face, FaceError};
pub use history::{HistoryLedger, RelativeAge, RollEvent};
pub use prefs::{PreferenceSnapshot, Preferences};
pub use session::{DailyStatus, DiceSession, RollReport};
pub use skins::{Milestone, Skin, SkinError};
pub use storage::MemoryStore;
pub use streak::{ClaimError, DailyRollOutcome, MilestoneState, MilestoneStatus, StreakTracker};

/// Trait for abstracting per-device key/value persistence.
///
/// Platform-specific implementations should provide this. Values are plain
/// strings, one scalar or JSON document per key.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}
