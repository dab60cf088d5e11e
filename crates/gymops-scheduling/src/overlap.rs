// ABOUTME: Half-open overlap detection between a candidate interval and an IntervalSet
// ABOUTME: Two bounded binary searches prune the set before the exact predicate decides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Overlap Engine
//!
//! `[s1, e1)` and `[s2, e2)` collide iff `s1 < e2 && s2 < e1`. A session that
//! ends exactly when another begins does not collide.
//!
//! Only members inside a window can collide with a candidate `[s, e)`:
//!
//! - members after the last one starting before `e` start too late
//! - members before the first one whose running reach passes `s` all end
//!   at or before `s`
//!
//! Both bounds come from [`crate::search`] in `O(log n)`. Every member in the
//! window is then checked with the exact predicate, so the result stays
//! correct even when the set itself holds overlapping members.

use crate::interval_set::{BusyInterval, IntervalSet};
use crate::search::{locate, locate_with, SearchBias};
use gymops_core::models::Interval;
use std::ops::Range;

/// Stateless collision checks against an [`IntervalSet`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapEngine;

impl OverlapEngine {
    /// Whether `candidate` collides with any member of `set`
    ///
    /// ```
    /// use gymops_core::models::Interval;
    /// use gymops_scheduling::{BusyInterval, IntervalSet, OverlapEngine};
    ///
    /// let set: IntervalSet<i64> = [(10, 12), (14, 15)]
    ///     .into_iter()
    ///     .map(|(s, e)| BusyInterval::new(Interval::new(s, e).unwrap(), "t"))
    ///     .collect();
    ///
    /// assert!(OverlapEngine::overlaps(&Interval::new(11, 13).unwrap(), &set));
    /// assert!(!OverlapEngine::overlaps(&Interval::new(12, 14).unwrap(), &set));
    /// ```
    #[must_use]
    pub fn overlaps<T: Ord + Copy>(candidate: &Interval<T>, set: &IntervalSet<T>) -> bool {
        Self::first_conflict(candidate, set).is_some()
    }

    /// Earliest-starting member that collides with `candidate`
    #[must_use]
    pub fn first_conflict<'a, T: Ord + Copy>(
        candidate: &Interval<T>,
        set: &'a IntervalSet<T>,
    ) -> Option<&'a BusyInterval<T>> {
        let window = Self::window(candidate, set)?;
        set.as_slice()[window]
            .iter()
            .find(|member| member.interval.overlaps(candidate))
    }

    /// Every member that collides with `candidate`, in start order
    #[must_use]
    pub fn conflicts<'a, T: Ord + Copy>(
        candidate: &Interval<T>,
        set: &'a IntervalSet<T>,
    ) -> Vec<&'a BusyInterval<T>> {
        Self::window(candidate, set).map_or_else(Vec::new, |window| {
            set.as_slice()[window]
                .iter()
                .filter(|member| member.interval.overlaps(candidate))
                .collect()
        })
    }

    /// Index range of members that could collide with `candidate`
    fn window<T: Ord + Copy>(candidate: &Interval<T>, set: &IntervalSet<T>) -> Option<Range<usize>> {
        // Last member starting strictly before the candidate ends
        let last = locate_with(&candidate.end(), set.starts(), SearchBias::Lower).left?;
        // First member whose running reach extends past the candidate's start
        let first = locate(&candidate.start(), set.reach()).right?;

        (first <= last).then_some(first..last + 1)
    }
}
