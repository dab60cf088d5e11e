// ABOUTME: Training store abstraction feeding the schedule gatherer
// ABOUTME: Declares the busy-interval source trait plus in-memory and SQLite implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training Stores
//!
//! The collision path only ever reads. A store answers one question: which
//! owners are busy, and with which training, somewhere inside a time window.
//! Stores report busy intervals already tagged with their owner, so the
//! gatherer never needs to know how trainings are persisted.

/// In-memory stores for tests and embedded use
pub mod memory;

/// `SQLite` persistence for both training kinds
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::models::OwnedInterval;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use crate::errors::DatabaseError;
pub use memory::{InMemoryGroupTrainingStore, InMemoryIndividualTrainingStore};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteGroupTrainings, SqliteIndividualTrainings, SqliteTrainingStore};

/// A read-only source of busy intervals
#[async_trait]
pub trait BusyIntervalSource: Send + Sync {
    /// Short stable name used in logs and error reports
    fn source_name(&self) -> &'static str;

    /// Busy intervals of every training intersecting `[window_start, window_end)`
    ///
    /// Only trainings that currently block their owners are returned: every
    /// group training, and individual trainings in the accepted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds a corrupt record
    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError>;
}
