// ABOUTME: Interval search and overlap detection for training schedules
// ABOUTME: Extracted from the main crate so the pure algorithms compile and test in isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Gymops Scheduling
//!
//! Pure, synchronous algorithms behind the collision check. Nothing here
//! performs I/O or holds locks, so every function is safe to call from any
//! number of request tasks at once.
//!
//! - [`search`]: bounded binary search that brackets a value in a sorted slice
//! - [`interval_set`]: immutable start-sorted busy intervals for one owner
//! - [`overlap`]: half-open collision test narrowed by the bounded search

/// Bounded binary search over sorted projections
pub mod search;

/// Immutable start-sorted interval collection
pub mod interval_set;

/// Candidate-versus-set overlap detection
pub mod overlap;

pub use interval_set::{BusyInterval, IntervalSet};
pub use overlap::OverlapEngine;
pub use search::{locate, locate_by_key, locate_with, Bracket, SearchBias};
