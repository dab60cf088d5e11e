// ABOUTME: Main library entry point for the gymops scheduling service
// ABOUTME: Detects trainer and location double-bookings before a training is saved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Gymops
//!
//! Collision detection for gym training schedules. Before a group class or
//! an individual session is saved, the booking service asks whether any of
//! its trainers, or its room, is already busy at an overlapping time.
//!
//! ## Architecture
//!
//! - **Stores** (`database`): group and individual trainings, read as
//!   owner-tagged busy intervals through [`database::BusyIntervalSource`]
//! - **Gatherer** (`scheduling::gatherer`): fetches both stores for the
//!   candidate's days under one timeout
//! - **Validator** (`scheduling::validator`): runs the bounded-search overlap
//!   check from `gymops-scheduling` per owner
//! - **Coordinator** (`scheduling::booking_lock`): serializes check-then-commit
//!   per owner inside one process
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gymops::database::{InMemoryGroupTrainingStore, InMemoryIndividualTrainingStore};
//! use gymops::errors::ScheduleError;
//! use gymops::scheduling::{CollisionValidator, ScheduleGatherer};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), ScheduleError> {
//! let gatherer = ScheduleGatherer::new(
//!     Arc::new(InMemoryGroupTrainingStore::new()),
//!     Arc::new(InMemoryIndividualTrainingStore::new()),
//!     Duration::from_secs(2),
//! );
//! let validator = CollisionValidator::new(gatherer);
//!
//! let start = "2021-01-05T11:00:00Z".parse().unwrap_or_default();
//! let end = "2021-01-05T11:30:00Z".parse().unwrap_or_default();
//! let verdict = validator
//!     .validate_slot(start, end, &["trainer-1"], "hall-a", None)
//!     .await?;
//! assert!(verdict.is_free());
//! # Ok(())
//! # }
//! ```

/// Environment-based configuration
pub mod config;

/// Constants re-exported from `gymops-core`
pub mod constants;

/// Training stores and the busy-interval source trait
pub mod database;

/// Error types re-exported from `gymops-core`
pub mod errors;

/// Logging setup and structured collision events
pub mod logging;

/// Domain models re-exported from `gymops-core`
pub mod models;

/// Gathering, validation, and booking locks
pub mod scheduling;

pub use gymops_scheduling::{BusyInterval, IntervalSet, OverlapEngine};
