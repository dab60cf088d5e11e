// ABOUTME: Gathers busy intervals for a window from both training stores concurrently
// ABOUTME: Normalizes to whole UTC days and groups results into per-owner IntervalSets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::BusyIntervalSource;
use crate::errors::{DatabaseError, ScheduleError};
use crate::models::{OwnedInterval, OwnerKind, TimeInterval};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use gymops_scheduling::{BusyInterval, IntervalSet};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Busy intervals of one owner, keyed by UTC time
pub type TimeIntervalSet = IntervalSet<DateTime<Utc>>;

/// Half-open window of whole UTC days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    /// Widen `[start, end]` to whole days: midnight of the first day up to
    /// midnight after the last day
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidWindow` if `end` precedes `start` or the
    /// next day is not representable
    pub fn covering(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ScheduleError> {
        if end < start {
            return Err(ScheduleError::InvalidWindow {
                reason: format!("end {end} precedes start {start}"),
            });
        }
        let last_day = end.date_naive();
        let after_last_day = last_day
            .succ_opt()
            .ok_or_else(|| ScheduleError::InvalidWindow {
                reason: format!("no day follows {last_day}"),
            })?;

        Ok(Self {
            start: midnight(start.date_naive()),
            end: midnight(after_last_day),
        })
    }

    /// Window covering every day `interval` touches
    ///
    /// # Errors
    ///
    /// See [`DayWindow::covering`]
    pub fn for_interval(interval: &TimeInterval) -> Result<Self, ScheduleError> {
        Self::covering(interval.start(), interval.end())
    }

    /// Midnight starting the first day
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Midnight after the last day, exclusive
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `interval` shares any instant with the window
    #[must_use]
    pub fn intersects(&self, interval: &TimeInterval) -> bool {
        interval.start() < self.end && self.start < interval.end()
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Per-owner busy intervals for one window
#[derive(Debug, Clone)]
pub struct GatheredSchedule {
    /// Days the schedule covers
    pub window: DayWindow,
    /// Busy intervals keyed by trainer id
    pub trainer_intervals: HashMap<String, TimeIntervalSet>,
    /// Busy intervals keyed by location id
    pub location_intervals: HashMap<String, TimeIntervalSet>,
}

impl GatheredSchedule {
    /// Group owner-tagged intervals into per-owner sets
    ///
    /// Intervals produced by `exclude_training_id` are dropped, so a training
    /// being edited never collides with its own stored version.
    #[must_use]
    pub fn assemble(
        window: DayWindow,
        intervals: impl IntoIterator<Item = OwnedInterval>,
        exclude_training_id: Option<&str>,
    ) -> Self {
        let mut trainers: HashMap<String, Vec<BusyInterval<DateTime<Utc>>>> = HashMap::new();
        let mut locations: HashMap<String, Vec<BusyInterval<DateTime<Utc>>>> = HashMap::new();

        for owned in intervals {
            if exclude_training_id == Some(owned.training_id.as_str()) {
                continue;
            }
            let bucket = match owned.owner_kind {
                OwnerKind::Trainer => &mut trainers,
                OwnerKind::Location => &mut locations,
            };
            bucket
                .entry(owned.owner_id)
                .or_default()
                .push(BusyInterval::new(owned.interval, owned.training_id));
        }

        Self {
            window,
            trainer_intervals: into_sets(OwnerKind::Trainer, trainers),
            location_intervals: into_sets(OwnerKind::Location, locations),
        }
    }

    /// Busy intervals of one owner, if it has any in the window
    #[must_use]
    pub fn intervals_for(&self, owner_kind: OwnerKind, owner_id: &str) -> Option<&TimeIntervalSet> {
        match owner_kind {
            OwnerKind::Trainer => self.trainer_intervals.get(owner_id),
            OwnerKind::Location => self.location_intervals.get(owner_id),
        }
    }

    /// Total busy intervals across all owners
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.trainer_intervals
            .values()
            .chain(self.location_intervals.values())
            .map(IntervalSet::len)
            .sum()
    }
}

fn into_sets(
    owner_kind: OwnerKind,
    grouped: HashMap<String, Vec<BusyInterval<DateTime<Utc>>>>,
) -> HashMap<String, TimeIntervalSet> {
    grouped
        .into_iter()
        .map(|(owner_id, entries)| {
            let set = IntervalSet::from_entries(entries);
            if set.has_internal_overlap() {
                warn!(
                    owner.kind = %owner_kind,
                    owner.id = %owner_id,
                    "Stored schedule already double-books this owner"
                );
            }
            (owner_id, set)
        })
        .collect()
}

/// Fetches both training collections for a window under one timeout
#[derive(Clone)]
pub struct ScheduleGatherer {
    group_trainings: Arc<dyn BusyIntervalSource>,
    individual_trainings: Arc<dyn BusyIntervalSource>,
    timeout: Duration,
}

impl ScheduleGatherer {
    /// Create a gatherer over the two stores
    #[must_use]
    pub fn new(
        group_trainings: Arc<dyn BusyIntervalSource>,
        individual_trainings: Arc<dyn BusyIntervalSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            group_trainings,
            individual_trainings,
            timeout,
        }
    }

    /// Bound applied to each gather
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Busy intervals of every owner on the days `[window_start, window_end]` touches
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` for an inverted window, `StoreUnavailable` if
    /// either store fails, and `GatherTimeout` if both do not answer in time
    pub async fn gather(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        exclude_training_id: Option<&str>,
    ) -> Result<GatheredSchedule, ScheduleError> {
        let window = DayWindow::covering(window_start, window_end)?;
        self.gather_window(window, exclude_training_id).await
    }

    /// Like [`ScheduleGatherer::gather`] for an already normalized window
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` or `GatherTimeout`
    pub async fn gather_window(
        &self,
        window: DayWindow,
        exclude_training_id: Option<&str>,
    ) -> Result<GatheredSchedule, ScheduleError> {
        let fetch_both = async {
            tokio::join!(
                self.group_trainings
                    .fetch_busy_intervals(window.start(), window.end()),
                self.individual_trainings
                    .fetch_busy_intervals(window.start(), window.end()),
            )
        };

        let (group, individual) = timeout(self.timeout, fetch_both).await.map_err(|_| {
            let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(timeout_ms, window.start = %window.start(), "Schedule gather timed out");
            ScheduleError::GatherTimeout { timeout_ms }
        })?;

        let group = group.map_err(|source| self.unavailable(&*self.group_trainings, source))?;
        let individual =
            individual.map_err(|source| self.unavailable(&*self.individual_trainings, source))?;

        // Stores match on the window already; re-check in case one is coarser
        let schedule = GatheredSchedule::assemble(
            window,
            group
                .into_iter()
                .chain(individual)
                .filter(|owned| window.intersects(&owned.interval)),
            exclude_training_id,
        );
        debug!(
            window.start = %window.start(),
            window.end = %window.end(),
            intervals = schedule.interval_count(),
            "Schedule gathered"
        );
        Ok(schedule)
    }

    fn unavailable(&self, source: &dyn BusyIntervalSource, error: DatabaseError) -> ScheduleError {
        warn!(
            source = source.source_name(),
            error = %error,
            timeout_ms = self.timeout.as_millis(),
            "Schedule store failed during gather"
        );
        ScheduleError::StoreUnavailable {
            source_name: source.source_name(),
            source: error,
        }
    }
}
