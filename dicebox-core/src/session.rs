//! The session object the front end drives.
//!
//! Constructed once at startup from a store and a clock, it owns the
//! ledger, the streak tracker and the preferences, and turns collaborator
//! events (a roll landed, the reward area was tapped) into state changes.

use rand::Rng;
use serde::Serialize;

use crate::KeyValueStore;
use crate::clock::{Clock, SystemClock};
use crate::face::Face;
use crate::history::{HistoryLedger, RelativeAge, RollEvent};
use crate::prefs::Preferences;
use crate::skins::{Milestone, Skin, SkinError};
use crate::streak::{ClaimError, DailyRollOutcome, MilestoneStatus, StreakTracker};

/// What a single roll changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollReport {
    pub event: RollEvent,
    /// Present when this roll was the day's bonus roll.
    pub daily: Option<DailyRollOutcome>,
}

/// Reward track state for the session-start check and the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatus {
    pub pending: bool,
    pub streak_count: u32,
    pub next_milestone: Option<Milestone>,
    pub progress: f64,
    pub claimable: Option<Milestone>,
}

#[derive(Debug)]
pub struct DiceSession<S, C = SystemClock> {
    clock: C,
    history: HistoryLedger<S>,
    streak: StreakTracker<S>,
    prefs: Preferences<S>,
}

impl<S: KeyValueStore + Clone> DiceSession<S, SystemClock> {
    /// Load a session on the wall clock.
    pub fn load_default(store: S) -> Self {
        Self::load(store, SystemClock)
    }
}

impl<S, C> DiceSession<S, C>
where
    S: KeyValueStore + Clone,
    C: Clock,
{
    pub fn load(store: S, clock: C) -> Self {
        let history = HistoryLedger::load(store.clone());
        let streak = StreakTracker::load(store.clone());
        let prefs = Preferences::load(store, streak.unlocked());
        log::debug!(
            "session loaded: {} rolls, streak {}, skin {}",
            history.len(),
            streak.streak_count(),
            prefs.current_skin()
        );
        Self {
            clock,
            history,
            streak,
            prefs,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryLedger<S> {
        &self.history
    }

    #[must_use]
    pub const fn streak(&self) -> &StreakTracker<S> {
        &self.streak
    }

    #[must_use]
    pub const fn prefs(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Preferences<S> {
        &mut self.prefs
    }

    /// Roll a fair die and apply the outcome.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RollReport {
        let face = Face::roll(rng);
        self.on_roll_outcome(face)
    }

    /// Apply a roll decided elsewhere. The first roll of the day also
    /// consumes the daily bonus.
    pub fn on_roll_outcome(&mut self, face: Face) -> RollReport {
        let event = self.history.record(face, &self.clock);
        let today = self.clock.today();
        let daily = if self.streak.is_pending(today) {
            self.streak.consume_daily_roll(face, today)
        } else {
            None
        };
        RollReport { event, daily }
    }

    /// Claim whatever reward is on offer and wear it.
    pub fn on_reward_area_activated(&mut self) -> Option<Milestone> {
        let milestone = self.streak.evaluate_milestones()?;
        self.claim(milestone.skin).ok()
    }

    /// Claim a specific reward skin and wear it.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::NotClaimable` unless `skin` is the reward on offer.
    pub fn claim(&mut self, skin: Skin) -> Result<Milestone, ClaimError> {
        let milestone = self.streak.claim(skin)?;
        self.prefs.apply_unlocked_skin(milestone.skin);
        Ok(milestone)
    }

    /// Wear a free or unlocked skin.
    ///
    /// # Errors
    ///
    /// Returns `SkinError::Locked` for skins not yet unlocked.
    pub fn select_skin(&mut self, skin: Skin) -> Result<(), SkinError> {
        self.prefs.select_skin(skin, self.streak.unlocked())
    }

    /// Skins the player may wear, free skins first.
    #[must_use]
    pub fn available_skins(&self) -> Vec<Skin> {
        Skin::ALL
            .into_iter()
            .filter(|skin| self.streak.is_unlocked(*skin))
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Age of `event` relative to the session clock.
    #[must_use]
    pub fn relative_age(&self, event: &RollEvent) -> RelativeAge {
        RelativeAge::between(event.occurred_at, self.clock.now_ms())
    }

    #[must_use]
    pub fn is_daily_pending(&self) -> bool {
        self.streak.is_pending(self.clock.today())
    }

    #[must_use]
    pub fn daily_status(&self) -> DailyStatus {
        let next_milestone = self.streak.next_milestone();
        DailyStatus {
            pending: self.is_daily_pending(),
            streak_count: self.streak.streak_count(),
            next_milestone,
            progress: next_milestone.map_or(100.0, |m| self.streak.progress_toward(&m)),
            claimable: self.streak.evaluate_milestones(),
        }
    }

    #[must_use]
    pub fn milestone_statuses(&self) -> Vec<MilestoneStatus> {
        self.streak.milestone_statuses()
    }

    /// Record the visit; true only on the very first run.
    pub fn first_visit(&mut self) -> bool {
        self.prefs.mark_visited()
    }
}
