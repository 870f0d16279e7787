//! Daily streak and milestone rewards.
//!
//! The first roll of each calendar day is the bonus roll. It always consumes
//! the day's eligibility, and only a winning face advances the streak.
//! Whether today's roll is still pending is derived from `last_roll_date`
//! on every query and never stored.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::KeyValueStore;
use crate::constants::{
    DATE_FORMAT, KEY_LAST_ROLL_DATE, KEY_STREAK_COUNT, KEY_UNLOCKED_SKINS, MILESTONES,
    STREAK_START,
};
use crate::face::Face;
use crate::skins::{Milestone, Skin};
use crate::storage::{read_json, read_string, write_json, write_string};

/// The only domain failure of the reward flow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    #[error("skin `{0}` is not claimable right now")]
    NotClaimable(Skin),
}

/// Result of consuming a day's bonus roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollOutcome {
    pub face: Face,
    pub won: bool,
    pub streak_count: u32,
    pub claimable: Option<Milestone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MilestoneState {
    Locked,
    Claimable,
    Unlocked,
}

/// Display row for the reward track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneStatus {
    pub milestone: Milestone,
    pub state: MilestoneState,
    pub progress: f64,
}

#[derive(Debug)]
pub struct StreakTracker<S> {
    store: S,
    streak_count: u32,
    last_roll_date: Option<NaiveDate>,
    unlocked: BTreeSet<Skin>,
}

impl<S: KeyValueStore> StreakTracker<S> {
    /// Load persisted streak state. Missing or malformed values fall back to
    /// a fresh streak with today pending.
    pub fn load(store: S) -> Self {
        let streak_count = read_string(&store, KEY_STREAK_COUNT)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|count| *count >= STREAK_START)
            .unwrap_or(STREAK_START);
        let last_roll_date = read_string(&store, KEY_LAST_ROLL_DATE)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());
        let unlocked = read_json::<_, Vec<String>>(&store, KEY_UNLOCKED_SKINS)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| Skin::from_id(id))
            .filter(|skin| skin.milestone().is_some())
            .collect();
        Self {
            store,
            streak_count,
            last_roll_date,
            unlocked,
        }
    }

    #[must_use]
    pub const fn streak_count(&self) -> u32 {
        self.streak_count
    }

    #[must_use]
    pub const fn last_roll_date(&self) -> Option<NaiveDate> {
        self.last_roll_date
    }

    /// Claimed reward skins.
    #[must_use]
    pub const fn unlocked(&self) -> &BTreeSet<Skin> {
        &self.unlocked
    }

    /// Whether `skin` may be worn. Free skins always can.
    #[must_use]
    pub fn is_unlocked(&self, skin: Skin) -> bool {
        skin.is_free() || self.unlocked.contains(&skin)
    }

    /// True until the first roll of `today` has been submitted.
    #[must_use]
    pub fn is_pending(&self, today: NaiveDate) -> bool {
        self.last_roll_date != Some(today)
    }

    /// Submit the first roll of `today`. Does nothing once today is consumed.
    pub fn consume_daily_roll(&mut self, face: Face, today: NaiveDate) -> Option<DailyRollOutcome> {
        if !self.is_pending(today) {
            log::debug!("daily roll for {today} already consumed; ignoring {face}");
            return None;
        }

        self.last_roll_date = Some(today);
        let won = face.is_winning();
        if won {
            self.streak_count = self.streak_count.saturating_add(1);
            log::debug!("streak advanced to {}", self.streak_count);
        } else {
            log::debug!("daily roll {face} on {today} did not advance the streak");
        }
        self.persist_progress();

        Some(DailyRollOutcome {
            face,
            won,
            streak_count: self.streak_count,
            claimable: self.evaluate_milestones(),
        })
    }

    /// The lowest milestone reached but not yet claimed.
    #[must_use]
    pub fn evaluate_milestones(&self) -> Option<Milestone> {
        MILESTONES
            .iter()
            .copied()
            .find(|m| m.threshold_day <= self.streak_count && !self.unlocked.contains(&m.skin))
    }

    /// Unlock `skin` if it is exactly the milestone currently on offer.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::NotClaimable` when the skin is locked, already
    /// unlocked, or a lower milestone is still unclaimed.
    pub fn claim(&mut self, skin: Skin) -> Result<Milestone, ClaimError> {
        let milestone = self
            .evaluate_milestones()
            .filter(|m| m.skin == skin)
            .ok_or(ClaimError::NotClaimable(skin))?;
        self.unlocked.insert(skin);
        self.persist_unlocked();
        log::debug!("claimed {skin} at streak {}", self.streak_count);
        Ok(milestone)
    }

    /// First milestone not yet unlocked; the target of the progress bar.
    #[must_use]
    pub fn next_milestone(&self) -> Option<Milestone> {
        MILESTONES
            .iter()
            .copied()
            .find(|m| !self.unlocked.contains(&m.skin))
    }

    /// Percentage of the way from the previous threshold to `milestone`'s.
    #[must_use]
    pub fn progress_toward(&self, milestone: &Milestone) -> f64 {
        let target = milestone.threshold_day;
        if self.streak_count >= target {
            return 100.0;
        }
        let floor = milestone.previous_threshold();
        if self.streak_count <= floor {
            return 0.0;
        }
        f64::from(self.streak_count - floor) / f64::from(target - floor) * 100.0
    }

    /// Every milestone with its state and progress.
    #[must_use]
    pub fn milestone_statuses(&self) -> Vec<MilestoneStatus> {
        let claimable = self.evaluate_milestones();
        MILESTONES
            .iter()
            .map(|m| {
                let state = if self.unlocked.contains(&m.skin) {
                    MilestoneState::Unlocked
                } else if claimable.is_some_and(|c| c.skin == m.skin) {
                    MilestoneState::Claimable
                } else {
                    MilestoneState::Locked
                };
                MilestoneStatus {
                    milestone: *m,
                    state,
                    progress: self.progress_toward(m),
                }
            })
            .collect()
    }

    fn persist_progress(&self) {
        write_string(&self.store, KEY_STREAK_COUNT, &self.streak_count.to_string());
        if let Some(date) = self.last_roll_date {
            write_string(
                &self.store,
                KEY_LAST_ROLL_DATE,
                &date.format(DATE_FORMAT).to_string(),
            );
        }
    }

    fn persist_unlocked(&self) {
        let ids: Vec<&str> = self.unlocked.iter().map(|skin| skin.id()).collect();
        write_json(&self.store, KEY_UNLOCKED_SKINS, &ids);
    }
}
