// ABOUTME: In-memory group and individual training stores
// ABOUTME: Backs tests and single-process deployments without a database file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{BusyIntervalSource, DatabaseError};
use crate::models::{
    GroupTraining, IndividualTraining, Interval, OwnedInterval, TimeInterval, TrainingStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The window as an interval; an empty or inverted window matches nothing
fn window(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Option<TimeInterval> {
    Interval::new(window_start, window_end).ok()
}

/// Group trainings keyed by id
#[derive(Debug, Default)]
pub struct InMemoryGroupTrainingStore {
    trainings: RwLock<HashMap<String, GroupTraining>>,
}

impl InMemoryGroupTrainingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `trainings`
    #[must_use]
    pub fn with_trainings(trainings: impl IntoIterator<Item = GroupTraining>) -> Self {
        Self {
            trainings: RwLock::new(
                trainings
                    .into_iter()
                    .map(|training| (training.id.clone(), training))
                    .collect(),
            ),
        }
    }

    /// Insert or replace a training, returning the previous version
    pub async fn upsert(&self, training: GroupTraining) -> Option<GroupTraining> {
        self.trainings
            .write()
            .await
            .insert(training.id.clone(), training)
    }

    /// Remove a training by id
    pub async fn remove(&self, training_id: &str) -> Option<GroupTraining> {
        self.trainings.write().await.remove(training_id)
    }

    /// Number of stored trainings
    pub async fn len(&self) -> usize {
        self.trainings.read().await.len()
    }

    /// Whether the store holds no trainings
    pub async fn is_empty(&self) -> bool {
        self.trainings.read().await.is_empty()
    }
}

#[async_trait]
impl BusyIntervalSource for InMemoryGroupTrainingStore {
    fn source_name(&self) -> &'static str {
        "group_trainings"
    }

    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        let Some(window) = window(window_start, window_end) else {
            return Ok(Vec::new());
        };
        let trainings = self.trainings.read().await;
        Ok(trainings
            .values()
            .filter(|training| training.interval.overlaps(&window))
            .flat_map(GroupTraining::busy_intervals)
            .collect())
    }
}

/// Individual trainings keyed by id
#[derive(Debug, Default)]
pub struct InMemoryIndividualTrainingStore {
    trainings: RwLock<HashMap<String, IndividualTraining>>,
}

impl InMemoryIndividualTrainingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `trainings`
    #[must_use]
    pub fn with_trainings(trainings: impl IntoIterator<Item = IndividualTraining>) -> Self {
        Self {
            trainings: RwLock::new(
                trainings
                    .into_iter()
                    .map(|training| (training.id.clone(), training))
                    .collect(),
            ),
        }
    }

    /// Insert or replace a training, returning the previous version
    pub async fn upsert(&self, training: IndividualTraining) -> Option<IndividualTraining> {
        self.trainings
            .write()
            .await
            .insert(training.id.clone(), training)
    }

    /// Change a training's status; `false` when the id is unknown
    pub async fn set_status(&self, training_id: &str, status: TrainingStatus) -> bool {
        self.trainings
            .write()
            .await
            .get_mut(training_id)
            .map(|training| training.status = status)
            .is_some()
    }

    /// Remove a training by id
    pub async fn remove(&self, training_id: &str) -> Option<IndividualTraining> {
        self.trainings.write().await.remove(training_id)
    }

    /// Number of stored trainings in any status
    pub async fn len(&self) -> usize {
        self.trainings.read().await.len()
    }

    /// Whether the store holds no trainings
    pub async fn is_empty(&self) -> bool {
        self.trainings.read().await.is_empty()
    }
}

#[async_trait]
impl BusyIntervalSource for InMemoryIndividualTrainingStore {
    fn source_name(&self) -> &'static str {
        "individual_trainings"
    }

    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        let Some(window) = window(window_start, window_end) else {
            return Ok(Vec::new());
        };
        let trainings = self.trainings.read().await;
        Ok(trainings
            .values()
            .filter(|training| training.status.blocks_schedule())
            .filter(|training| training.interval.overlaps(&window))
            .flat_map(IndividualTraining::busy_intervals)
            .collect())
    }
}
