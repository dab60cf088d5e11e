// ABOUTME: Training fixtures for integration tests
// ABOUTME: January 2021 timestamps, group and individual trainings, and in-memory validators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, TimeZone, Utc};
use gymops::database::{InMemoryGroupTrainingStore, InMemoryIndividualTrainingStore};
use gymops::models::{GroupTraining, IndividualTraining, Interval, TimeInterval, TrainingStatus};
use gymops::scheduling::{CollisionValidator, ScheduleGatherer};
use std::sync::Arc;
use std::time::Duration;

/// Gather bound used by fixtures; generous so only deliberate stalls time out
pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Instant on a day in January 2021
pub fn jan(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, day, hour, minute, 0).unwrap()
}

/// Interval on one January 2021 day
pub fn slot(day: u32, start: (u32, u32), end: (u32, u32)) -> TimeInterval {
    Interval::new(jan(day, start.0, start.1), jan(day, end.0, end.1)).unwrap()
}

pub fn group(id: &str, trainer_ids: &[&str], location_id: &str, interval: TimeInterval) -> GroupTraining {
    GroupTraining {
        id: id.to_owned(),
        name: format!("{id} class"),
        trainer_ids: trainer_ids.iter().map(|&t| t.to_owned()).collect(),
        location_id: location_id.to_owned(),
        interval,
    }
}

pub fn individual(
    id: &str,
    trainer_id: &str,
    location_id: Option<&str>,
    interval: TimeInterval,
    status: TrainingStatus,
) -> IndividualTraining {
    IndividualTraining {
        id: id.to_owned(),
        trainer_id: trainer_id.to_owned(),
        client_id: format!("client-of-{id}"),
        location_id: location_id.map(str::to_owned),
        interval,
        status,
    }
}

/// Validator over in-memory stores, plus handles to the stores
pub struct InMemoryFixture {
    pub validator: CollisionValidator,
    pub groups: Arc<InMemoryGroupTrainingStore>,
    pub individuals: Arc<InMemoryIndividualTrainingStore>,
}

pub fn in_memory(groups: Vec<GroupTraining>, individuals: Vec<IndividualTraining>) -> InMemoryFixture {
    let groups = Arc::new(InMemoryGroupTrainingStore::with_trainings(groups));
    let individuals = Arc::new(InMemoryIndividualTrainingStore::with_trainings(individuals));
    let gatherer = ScheduleGatherer::new(groups.clone(), individuals.clone(), TEST_TIMEOUT);
    InMemoryFixture {
        validator: CollisionValidator::new(gatherer),
        groups,
        individuals,
    }
}
