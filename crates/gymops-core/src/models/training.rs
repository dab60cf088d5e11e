// ABOUTME: Group and individual training models with their busy-interval projections
// ABOUTME: Only accepted individual trainings occupy a trainer or location
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::interval::{OwnedInterval, TimeInterval, TrainingKind};
use crate::constants::training_status;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Lifecycle state of an individual training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    /// Requested by a client, not yet confirmed
    #[default]
    Pending,
    /// Confirmed by the trainer
    Accepted,
    /// Declined by the trainer
    Rejected,
    /// Cancelled after confirmation
    Cancelled,
}

impl TrainingStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => training_status::PENDING,
            Self::Accepted => training_status::ACCEPTED,
            Self::Rejected => training_status::REJECTED,
            Self::Cancelled => training_status::CANCELLED,
        }
    }

    /// Parse from database string representation
    ///
    /// Unknown values return `None`; a status cannot silently default because
    /// the wrong default would either block or free a slot.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            training_status::PENDING => Some(Self::Pending),
            training_status::ACCEPTED => Some(Self::Accepted),
            training_status::REJECTED => Some(Self::Rejected),
            training_status::CANCELLED => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether a training in this state occupies its trainer and location
    #[must_use]
    pub const fn blocks_schedule(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl Display for TrainingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class run by one or more trainers in a single location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTraining {
    /// Training identifier
    pub id: String,
    /// Display name of the class
    pub name: String,
    /// Trainers leading the class
    pub trainer_ids: Vec<String>,
    /// Room or area the class occupies
    pub location_id: String,
    /// Scheduled period
    pub interval: TimeInterval,
}

impl GroupTraining {
    /// Busy intervals: one per trainer, then one for the location
    #[must_use]
    pub fn busy_intervals(&self) -> Vec<OwnedInterval> {
        let mut busy = Vec::with_capacity(self.trainer_ids.len() + 1);
        busy.extend(self.trainer_ids.iter().map(|trainer_id| {
            OwnedInterval::trainer(self.interval, trainer_id, &self.id, TrainingKind::Group)
        }));
        busy.push(OwnedInterval::location(
            self.interval,
            &self.location_id,
            &self.id,
            TrainingKind::Group,
        ));
        busy
    }
}

/// A one-to-one session between a trainer and a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualTraining {
    /// Training identifier
    pub id: String,
    /// Trainer running the session
    pub trainer_id: String,
    /// Client who booked the session
    pub client_id: String,
    /// Room or area, when the session reserves one
    pub location_id: Option<String>,
    /// Scheduled period
    pub interval: TimeInterval,
    /// Confirmation state
    pub status: TrainingStatus,
}

impl IndividualTraining {
    /// Busy intervals while accepted; empty in every other state
    #[must_use]
    pub fn busy_intervals(&self) -> Vec<OwnedInterval> {
        if !self.status.blocks_schedule() {
            return Vec::new();
        }
        let mut busy = vec![OwnedInterval::trainer(
            self.interval,
            &self.trainer_id,
            &self.id,
            TrainingKind::Individual,
        )];
        if let Some(location_id) = &self.location_id {
            busy.push(OwnedInterval::location(
                self.interval,
                location_id,
                &self.id,
                TrainingKind::Individual,
            ));
        }
        busy
    }
}
