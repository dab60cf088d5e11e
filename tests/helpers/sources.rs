// ABOUTME: Busy-interval sources with controllable failure modes
// ABOUTME: Lets tests drive store errors and slow stores through the gatherer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gymops::database::{BusyIntervalSource, DatabaseError};
use gymops::models::OwnedInterval;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Always fails with a connection error
pub struct FailingSource;

#[async_trait]
impl BusyIntervalSource for FailingSource {
    fn source_name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_busy_intervals(
        &self,
        _window_start: DateTime<Utc>,
        _window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        Err(DatabaseError::ConnectionFailed {
            context: "store offline".to_owned(),
        })
    }
}

/// Sleeps before answering with nothing
pub struct SlowSource {
    pub delay: Duration,
}

#[async_trait]
impl BusyIntervalSource for SlowSource {
    fn source_name(&self) -> &'static str {
        "slow"
    }

    async fn fetch_busy_intervals(
        &self,
        _window_start: DateTime<Utc>,
        _window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

/// Returns fixed intervals regardless of window and records the windows asked for
pub struct StaticSource {
    pub intervals: Vec<OwnedInterval>,
    pub calls: AtomicUsize,
    pub last_window: std::sync::Mutex<Option<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl StaticSource {
    pub fn new(intervals: Vec<OwnedInterval>) -> Self {
        Self {
            intervals,
            calls: AtomicUsize::new(0),
            last_window: std::sync::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        *self.last_window.lock().unwrap()
    }
}

#[async_trait]
impl BusyIntervalSource for StaticSource {
    fn source_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some((window_start, window_end));
        Ok(self.intervals.clone())
    }
}
