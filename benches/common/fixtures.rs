// ABOUTME: Deterministic busy-interval generators for overlap and validator benchmarks
// ABOUTME: Builds back-to-back schedules of configurable size with gaps between sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, TimeZone, Utc};
use gymops::models::{GroupTraining, Interval, TimeInterval};
use gymops::{BusyInterval, IntervalSet};

/// Schedule sizes exercised by the benches
#[derive(Debug, Clone, Copy)]
pub enum ScheduleSize {
    Day,
    Week,
    Season,
}

impl ScheduleSize {
    pub const fn intervals(self) -> usize {
        match self {
            Self::Day => 12,
            Self::Week => 84,
            Self::Season => 4_000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Day => "12",
            Self::Week => "84",
            Self::Season => "4000",
        }
    }
}

/// Session length in minutes
pub const SESSION_MINUTES: i64 = 45;
/// Distance between session starts in minutes
pub const SLOT_MINUTES: i64 = 60;

/// `count` sessions on an integer minute axis, each followed by a gap
pub fn minute_schedule(count: usize) -> IntervalSet<i64> {
    (0..count as i64)
        .map(|slot| {
            let start = slot * SLOT_MINUTES;
            // Bounds are ordered by construction
            let interval = Interval::new(start, start + SESSION_MINUTES).unwrap();
            BusyInterval::new(interval, format!("session-{slot}"))
        })
        .collect()
}

/// Candidate that falls into the gap after session `slot`
pub fn gap_candidate(slot: i64) -> Interval<i64> {
    let start = slot * SLOT_MINUTES + SESSION_MINUTES;
    Interval::new(start, start + (SLOT_MINUTES - SESSION_MINUTES)).unwrap()
}

/// Candidate that overlaps session `slot`
pub fn clash_candidate(slot: i64) -> Interval<i64> {
    let start = slot * SLOT_MINUTES + 10;
    Interval::new(start, start + 30).unwrap()
}

/// Linear scan used as the baseline for the bracketed search
pub fn naive_overlaps(candidate: &Interval<i64>, set: &IntervalSet<i64>) -> bool {
    set.iter().any(|busy| busy.interval.overlaps(candidate))
}

/// Base instant for generated trainings
pub fn base_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 5, 6, 0, 0).unwrap()
}

/// One full day of hourly group sessions for a single trainer and hall
pub fn busy_day(trainer_id: &str, location_id: &str) -> Vec<GroupTraining> {
    (0..16)
        .map(|hour| {
            let start = base_day() + Duration::hours(hour);
            GroupTraining {
                id: format!("group-{hour}"),
                name: "Circuit".to_owned(),
                trainer_ids: vec![trainer_id.to_owned()],
                location_id: location_id.to_owned(),
                interval: Interval::new(start, start + Duration::minutes(SESSION_MINUTES))
                    .unwrap(),
            }
        })
        .collect()
}

/// Candidate in the gap after the `hour`-th session of [`busy_day`]
pub fn free_slot(hour: i64) -> TimeInterval {
    let start = base_day() + Duration::hours(hour) + Duration::minutes(SESSION_MINUTES);
    Interval::new(start, start + Duration::minutes(SLOT_MINUTES - SESSION_MINUTES)).unwrap()
}
