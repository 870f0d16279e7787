//! Centralized tuning constants and storage keys for Dicebox.
//!
//! Keeping them together means the milestone table, the history cap and the
//! persisted layout can only change through a reviewed code change.

use crate::skins::{Milestone, Skin};

// Dice ---------------------------------------------------------------------
pub const FACE_MIN: u8 = 1;
pub const FACE_MAX: u8 = 6;
pub const WINNING_FACE: u8 = FACE_MAX;

// History ------------------------------------------------------------------
pub const MAX_HISTORY_ENTRIES: usize = 50;

// Relative age bands, in whole seconds -------------------------------------
pub(crate) const JUST_NOW_SECS: i64 = 5;
pub(crate) const SECS_PER_MINUTE: i64 = 60;
pub(crate) const SECS_PER_HOUR: i64 = 3_600;
pub(crate) const SECS_PER_DAY: i64 = 86_400;
pub(crate) const MS_PER_SEC: i64 = 1_000;

// Streak -------------------------------------------------------------------
pub const STREAK_START: u32 = 1;

/// Skins unlocked by the daily streak, strictly increasing by threshold.
///
/// Both the progress bar and claim eligibility read this table.
pub const MILESTONES: [Milestone; 3] = [
    Milestone {
        skin: Skin::Neon,
        threshold_day: 5,
    },
    Milestone {
        skin: Skin::Gold,
        threshold_day: 15,
    },
    Milestone {
        skin: Skin::Galaxy,
        threshold_day: 20,
    },
];

// Storage keys -------------------------------------------------------------
pub const KEY_SOUND_ENABLED: &str = "diceSoundEnabled";
pub const KEY_DARK_THEME: &str = "darkTheme";
pub const KEY_ROLL_HISTORY: &str = "rollHistory";
pub const KEY_CURRENT_SKIN: &str = "currentSkin";
pub const KEY_STREAK_COUNT: &str = "streakCount";
pub const KEY_LAST_ROLL_DATE: &str = "lastRollDate";
pub const KEY_UNLOCKED_SKINS: &str = "unlockedSkins";
pub const KEY_HAS_VISITED: &str = "hasVisited";

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const FLAG_TRUE: &str = "true";
pub(crate) const FLAG_FALSE: &str = "false";
