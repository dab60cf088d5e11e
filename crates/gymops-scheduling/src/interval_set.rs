// ABOUTME: Immutable start-sorted collection of busy intervals for a single owner
// ABOUTME: Keeps start and running-maximum-end projections for bounded searches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `IntervalSet`: sorted half-open busy intervals for one trainer or location.
//!
//! Invariants (always held):
//!    - entries are sorted by `start()`, ties broken by `end()`
//!    - `starts[i] == entries[i].interval.start()`
//!    - `reach[i]` is the largest `end()` among `entries[..=i]`, so it is ascending
//!
//! Unlike a coalescing set, members are never merged: each one still names
//! the training that produced it, and members may overlap each other when
//! the stored schedule is already inconsistent.

use gymops_core::models::Interval;

/// One occupied period and the training that occupies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval<T> {
    /// Occupied period
    pub interval: Interval<T>,
    /// Training that occupies the owner
    pub training_id: String,
}

impl<T> BusyInterval<T> {
    /// Tag an interval with its training id
    pub fn new(interval: Interval<T>, training_id: impl Into<String>) -> Self {
        Self {
            interval,
            training_id: training_id.into(),
        }
    }
}

/// Start-sorted, immutable busy intervals for one owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet<T> {
    entries: Vec<BusyInterval<T>>,
    starts: Vec<T>,
    reach: Vec<T>,
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            starts: Vec::new(),
            reach: Vec::new(),
        }
    }
}

impl<T: Ord + Copy> IntervalSet<T> {
    /// Build a set from unsorted entries
    #[must_use]
    pub fn from_entries(mut entries: Vec<BusyInterval<T>>) -> Self {
        entries.sort_by(|a, b| {
            a.interval
                .start()
                .cmp(&b.interval.start())
                .then_with(|| a.interval.end().cmp(&b.interval.end()))
        });

        let starts = entries.iter().map(|entry| entry.interval.start()).collect();

        let mut reach = Vec::with_capacity(entries.len());
        let mut furthest: Option<T> = None;
        for entry in &entries {
            let end = entry.interval.end();
            let next = furthest.map_or(end, |current| current.max(end));
            reach.push(next);
            furthest = Some(next);
        }

        Self {
            entries,
            starts,
            reach,
        }
    }

    /// Number of intervals in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set contains no intervals
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in start order
    #[must_use]
    pub fn as_slice(&self) -> &[BusyInterval<T>] {
        &self.entries
    }

    /// Iterate entries in start order
    pub fn iter(&self) -> std::slice::Iter<'_, BusyInterval<T>> {
        self.entries.iter()
    }

    /// Entry at `index` in start order
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BusyInterval<T>> {
        self.entries.get(index)
    }

    /// Start projection, ascending
    #[must_use]
    pub fn starts(&self) -> &[T] {
        &self.starts
    }

    /// Running maximum of ends, ascending
    #[must_use]
    pub fn reach(&self) -> &[T] {
        &self.reach
    }

    /// Earliest start and latest end covered by the set
    #[must_use]
    pub fn span(&self) -> Option<(T, T)> {
        Some((*self.starts.first()?, *self.reach.last()?))
    }

    /// Whether any two members overlap each other
    ///
    /// A committed schedule should never report `true`; when it does, an
    /// earlier booking slipped past validation.
    #[must_use]
    pub fn has_internal_overlap(&self) -> bool {
        self.starts
            .iter()
            .skip(1)
            .zip(self.reach.iter())
            .any(|(start, previous_reach)| start < previous_reach)
    }
}

impl<T: Ord + Copy> FromIterator<BusyInterval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = BusyInterval<T>>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a BusyInterval<T>;
    type IntoIter = std::slice::Iter<'a, BusyInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
