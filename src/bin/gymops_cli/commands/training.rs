// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Training bookkeeping commands for gymops-cli
// ABOUTME: Group bookings and blocking individual statuses are checked under owner locks

use super::{exit_code, print_json, validator};
use chrono::{DateTime, Utc};
use gymops::config::SchedulerConfig;
use gymops::database::SqliteTrainingStore;
use gymops::errors::{AppError, AppResult};
use gymops::models::{GroupTraining, IndividualTraining, Interval, TimeInterval, TrainingStatus};
use gymops::scheduling::{BookingCheck, BookingCoordinator, BookingGuard, BookingOwners};
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Group class to book
pub struct GroupRequest {
    pub id: Option<String>,
    pub name: String,
    pub trainer_ids: Vec<String>,
    pub location_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Individual session to record
pub struct IndividualRequest {
    pub id: Option<String>,
    pub trainer_id: String,
    pub client_id: String,
    pub location_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: TrainingStatus,
}

/// Book a group training unless it collides (or `force` is set)
pub async fn add_group(
    store: &SqliteTrainingStore,
    config: &SchedulerConfig,
    request: GroupRequest,
    force: bool,
) -> AppResult<ExitCode> {
    let training = GroupTraining {
        id: request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: request.name,
        trainer_ids: request.trainer_ids,
        location_id: request.location_id,
        interval: Interval::new(request.start, request.end)?,
    };

    if force {
        warn!(training.id = %training.id, "Storing group training without a collision check");
        store.insert_group_training(&training).await?;
        print_json(&training)?;
        return Ok(ExitCode::SUCCESS);
    }

    let coordinator = BookingCoordinator::new(Arc::new(validator(store, config)));
    let check = coordinator
        .check_and_hold(
            &training.interval,
            &training.trainer_ids,
            &training.location_id,
            Some(&training.id),
        )
        .await?;

    match check {
        BookingCheck::Clear(guard) => {
            store.insert_group_training(&training).await?;
            drop(guard);
            info!(training.id = %training.id, "Group training booked");
            print_json(&training)?;
            Ok(ExitCode::SUCCESS)
        }
        BookingCheck::Blocked(collision) => {
            print_json(&json!({ "rejected": training.id, "collision": collision }))?;
            Ok(exit_code(true))
        }
    }
}

/// Lock the owners and check the slot, printing the rejection on a collision
async fn reserve(
    store: &SqliteTrainingStore,
    config: &SchedulerConfig,
    training_id: &str,
    interval: &TimeInterval,
    owners: &BookingOwners,
) -> AppResult<Option<BookingGuard>> {
    let coordinator = BookingCoordinator::new(Arc::new(validator(store, config)));
    match coordinator
        .check_and_hold_owners(interval, owners, Some(training_id))
        .await?
    {
        BookingCheck::Clear(guard) => Ok(Some(guard)),
        BookingCheck::Blocked(collision) => {
            print_json(&json!({ "rejected": training_id, "collision": collision }))?;
            Ok(None)
        }
    }
}

/// Store an individual training in its initial status
///
/// A status that occupies the schedule is only stored when the slot is free.
pub async fn add_individual(
    store: &SqliteTrainingStore,
    config: &SchedulerConfig,
    request: IndividualRequest,
) -> AppResult<ExitCode> {
    let training = IndividualTraining {
        id: request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        trainer_id: request.trainer_id,
        client_id: request.client_id,
        location_id: request.location_id,
        interval: Interval::new(request.start, request.end)?,
        status: request.status,
    };

    let guard = if training.status.blocks_schedule() {
        let owners =
            BookingOwners::for_individual(&training.trainer_id, training.location_id.as_deref())?;
        let Some(guard) = reserve(store, config, &training.id, &training.interval, &owners).await?
        else {
            return Ok(exit_code(true));
        };
        Some(guard)
    } else {
        None
    };

    store.insert_individual_training(&training).await?;
    drop(guard);
    info!(training.id = %training.id, status = %training.status, "Individual training recorded");
    print_json(&training)?;
    Ok(ExitCode::SUCCESS)
}

/// Move an individual training to `status`
///
/// Moving into a status that occupies the schedule re-checks the training's slot.
pub async fn set_status(
    store: &SqliteTrainingStore,
    config: &SchedulerConfig,
    training_id: &str,
    status: TrainingStatus,
) -> AppResult<ExitCode> {
    let guard = if status.blocks_schedule() {
        let training = store
            .find_individual_training(training_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Individual training {training_id}")))?;
        let owners =
            BookingOwners::for_individual(&training.trainer_id, training.location_id.as_deref())?;
        let Some(guard) = reserve(store, config, training_id, &training.interval, &owners).await?
        else {
            return Ok(exit_code(true));
        };
        Some(guard)
    } else {
        None
    };

    if !store.update_individual_status(training_id, status).await? {
        return Err(AppError::not_found(format!("Individual training {training_id}")));
    }
    drop(guard);
    print_json(&json!({ "id": training_id, "status": status }))?;
    Ok(ExitCode::SUCCESS)
}
