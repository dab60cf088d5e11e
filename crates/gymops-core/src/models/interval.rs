// ABOUTME: Half-open interval model and owner-tagged busy intervals
// ABOUTME: Interval construction rejects empty or inverted ranges up front
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::ScheduleError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A contiguous half-open `[start, end)` range with `start < end`
///
/// The bounds are private so the invariant holds for every value in
/// circulation; deserialization goes through the same check as [`Interval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    try_from = "IntervalBounds<T>",
    bound(deserialize = "T: Deserialize<'de> + Ord + Display")
)]
pub struct Interval<T> {
    start: T,
    end: T,
}

/// Unchecked wire form of an [`Interval`]
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IntervalBounds<T> {
    /// Inclusive start
    pub start: T,
    /// Exclusive end
    pub end: T,
}

impl<T: Ord + Display> TryFrom<IntervalBounds<T>> for Interval<T> {
    type Error = ScheduleError;

    fn try_from(bounds: IntervalBounds<T>) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

/// Busy period expressed in UTC wall-clock time
pub type TimeInterval = Interval<DateTime<Utc>>;

impl<T: Ord + Display> Interval<T> {
    /// Create an interval, failing when `start >= end`
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidInterval` for empty or inverted ranges
    pub fn new(start: T, end: T) -> Result<Self, ScheduleError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(ScheduleError::invalid_interval(start, end))
        }
    }
}

impl<T: Ord + Copy> Interval<T> {
    /// Inclusive start
    #[must_use]
    pub fn start(&self) -> T {
        self.start
    }

    /// Exclusive end
    #[must_use]
    pub fn end(&self) -> T {
        self.end
    }

    /// Half-open overlap test: touching endpoints do not overlap
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `point` lies inside `[start, end)`
    #[must_use]
    pub fn contains_point(&self, point: T) -> bool {
        self.start <= point && point < self.end
    }

    /// Whether `other` lies entirely inside this interval
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Which kind of resource an interval occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// A trainer leading the session
    Trainer,
    /// A physical room or area in the gym
    Location,
}

impl OwnerKind {
    /// Lowercase name used in logs and serialized output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Location => "location",
        }
    }
}

impl Display for OwnerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which training collection produced an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingKind {
    /// Scheduled class with one or more trainers
    Group,
    /// One-to-one session booked by a client
    Individual,
}

impl TrainingKind {
    /// Lowercase name used in logs and serialized output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Individual => "individual",
        }
    }
}

impl Display for TrainingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A busy interval tagged with the owner it blocks and the training behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedInterval {
    /// The occupied period
    pub interval: TimeInterval,
    /// Trainer or location
    pub owner_kind: OwnerKind,
    /// Identifier of the trainer or location
    pub owner_id: String,
    /// Identifier of the training that occupies the owner
    pub training_id: String,
    /// Collection the training came from
    pub training_kind: TrainingKind,
}

impl OwnedInterval {
    /// Interval blocking a trainer
    pub fn trainer(
        interval: TimeInterval,
        trainer_id: impl Into<String>,
        training_id: impl Into<String>,
        training_kind: TrainingKind,
    ) -> Self {
        Self {
            interval,
            owner_kind: OwnerKind::Trainer,
            owner_id: trainer_id.into(),
            training_id: training_id.into(),
            training_kind,
        }
    }

    /// Interval blocking a location
    pub fn location(
        interval: TimeInterval,
        location_id: impl Into<String>,
        training_id: impl Into<String>,
        training_kind: TrainingKind,
    ) -> Self {
        Self {
            interval,
            owner_kind: OwnerKind::Location,
            owner_id: location_id.into(),
            training_id: training_id.into(),
            training_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_rejects_empty_and_inverted_ranges() {
        assert!(Interval::new(5, 5).is_err());
        assert!(Interval::new(6, 5).is_err());
        assert!(Interval::new(5, 6).is_ok());
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let morning = Interval::new(10, 12).unwrap();
        let noon = Interval::new(12, 13).unwrap();
        assert!(!morning.overlaps(&noon));
        assert!(!noon.overlaps(&morning));
        assert!(!morning.contains_point(12));
    }

    #[test]
    fn test_containment_counts_as_overlap() {
        let outer = Interval::new(8, 20).unwrap();
        let inner = Interval::new(10, 11).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let ok: Interval<i64> = serde_json::from_str(r#"{"start":1,"end":2}"#).unwrap();
        assert_eq!(ok.start(), 1);

        let bad = serde_json::from_str::<Interval<i64>>(r#"{"start":3,"end":2}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_owner_kind_serializes_lowercase() {
        let json = serde_json::to_string(&OwnerKind::Trainer).unwrap();
        assert_eq!(json, "\"trainer\"");
    }
}
