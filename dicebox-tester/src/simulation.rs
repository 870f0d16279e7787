//! Seeded multi-day play-through of a dice session.

use chrono::NaiveDate;
use dicebox_core::{
    Clock, DiceSession, KeyValueStore, MAX_HISTORY_ENTRIES, ManualClock, Skin,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub days: u32,
    pub rolls_per_day: u32,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub auto_claim: bool,
}

/// What happened on one simulated day.
#[derive(Debug, Clone, Serialize)]
pub struct DayRecord {
    pub day: u32,
    pub date: NaiveDate,
    /// Whether the bonus roll was still unused when the day began.
    pub was_pending: bool,
    pub faces: Vec<u8>,
    /// Face of the day's bonus roll, if the day had one.
    pub daily_face: Option<u8>,
    pub won: bool,
    pub streak_count: u32,
    pub claimed: Vec<Skin>,
    pub claimable: Option<Skin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub days: u32,
    pub rolls_per_day: u32,
    pub initial_streak: u32,
    pub final_streak: u32,
    pub winning_days: u32,
    pub unlocked: Vec<Skin>,
    pub current_skin: Skin,
    pub history_len: usize,
    pub records: Vec<DayRecord>,
}

const MAX_PREALLOC: u32 = 1024;

/// Up-front capacity for a CLI-sized count; larger runs grow as they go.
fn prealloc(count: u32) -> usize {
    usize::try_from(count.min(MAX_PREALLOC)).unwrap_or(0)
}

/// Play `config.days` days against `store`, one calendar day per step.
pub fn run_simulation<S>(config: &SimulationConfig, store: S) -> SimulationReport
where
    S: KeyValueStore + Clone,
{
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let clock = ManualClock::at_date(config.start_date);
    let mut session = DiceSession::load(store, clock);
    let initial_streak = session.streak().streak_count();
    let mut records = Vec::with_capacity(prealloc(config.days));
    let mut winning_days = 0;

    for day in 1..=config.days {
        let date = session.clock().today();
        let was_pending = session.is_daily_pending();
        let mut faces = Vec::with_capacity(prealloc(config.rolls_per_day));
        let mut daily_face = None;
        let mut won = false;

        for _ in 0..config.rolls_per_day {
            let report = session.roll(&mut rng);
            faces.push(report.event.face.value());
            if let Some(outcome) = report.daily {
                daily_face = Some(outcome.face.value());
                won = outcome.won;
            }
        }
        if won {
            winning_days += 1;
        }

        let mut claimed = Vec::new();
        if config.auto_claim {
            while let Some(milestone) = session.on_reward_area_activated() {
                log::info!("day {day}: claimed {}", milestone.skin);
                claimed.push(milestone.skin);
            }
        }

        log::debug!(
            "day {day} ({date}): faces {faces:?}, streak {}",
            session.streak().streak_count()
        );
        records.push(DayRecord {
            day,
            date,
            was_pending,
            faces,
            daily_face,
            won,
            streak_count: session.streak().streak_count(),
            claimed,
            claimable: session.streak().evaluate_milestones().map(|m| m.skin),
        });
        session.clock().advance_days(1);
    }

    SimulationReport {
        seed: config.seed,
        days: config.days,
        rolls_per_day: config.rolls_per_day,
        initial_streak,
        final_streak: session.streak().streak_count(),
        winning_days,
        unlocked: session.streak().unlocked().iter().copied().collect(),
        current_skin: session.prefs().current_skin(),
        history_len: session.history().len(),
        records,
    }
}

/// Invariant violations found in a finished run; empty when healthy.
#[must_use]
pub fn check_invariants(report: &SimulationReport) -> Vec<String> {
    let mut violations = Vec::new();

    if report.history_len > MAX_HISTORY_ENTRIES {
        violations.push(format!(
            "history holds {} entries, cap is {MAX_HISTORY_ENTRIES}",
            report.history_len
        ));
    }
    if report.final_streak != report.initial_streak + report.winning_days {
        violations.push(format!(
            "streak {} != initial {} + {} winning days",
            report.final_streak, report.initial_streak, report.winning_days
        ));
    }

    let mut previous = report.initial_streak;
    for record in &report.records {
        if record.streak_count < previous {
            violations.push(format!(
                "day {}: streak fell from {previous} to {}",
                record.day, record.streak_count
            ));
        }
        let expected_daily = record.was_pending && !record.faces.is_empty();
        if record.daily_face.is_some() != expected_daily {
            violations.push(format!("day {}: daily roll mismatch", record.day));
        }
        if record.daily_face.is_some() && record.daily_face != record.faces.first().copied() {
            violations.push(format!(
                "day {}: bonus roll was not the first roll",
                record.day
            ));
        }
        previous = record.streak_count;
    }

    let thresholds: Vec<u32> = report
        .records
        .iter()
        .flat_map(|r| r.claimed.iter())
        .filter_map(|skin| skin.milestone().map(|m| m.threshold_day))
        .collect();
    if !thresholds.windows(2).all(|pair| pair[0] < pair[1]) {
        violations.push("milestones were claimed out of order".to_string());
    }

    violations
}
