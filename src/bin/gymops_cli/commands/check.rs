// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Slot check command for gymops-cli
// ABOUTME: Prints the collision verdict, or every conflict with --all, as JSON

use super::{exit_code, print_json, validator};
use chrono::{DateTime, Utc};
use gymops::config::SchedulerConfig;
use gymops::database::SqliteTrainingStore;
use gymops::errors::AppResult;
use gymops::models::Interval;
use serde_json::json;
use std::process::ExitCode;

/// A slot to check
pub struct CheckRequest {
    pub trainer_ids: Vec<String>,
    pub location_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub exclude_training_id: Option<String>,
}

/// Check one slot, printing the verdict
pub async fn run(
    store: &SqliteTrainingStore,
    config: &SchedulerConfig,
    request: &CheckRequest,
    all: bool,
) -> AppResult<ExitCode> {
    let validator = validator(store, config);
    let candidate = Interval::new(request.start, request.end)?;
    let exclude = request.exclude_training_id.as_deref();

    if all {
        let collisions = validator
            .validate_all(&candidate, &request.trainer_ids, &request.location_id, exclude)
            .await?;
        print_json(&json!({
            "candidate": candidate,
            "collisions": collisions,
        }))?;
        Ok(exit_code(!collisions.is_empty()))
    } else {
        let verdict = validator
            .validate(&candidate, &request.trainer_ids, &request.location_id, exclude)
            .await?;
        print_json(&verdict)?;
        Ok(exit_code(!verdict.is_free()))
    }
}
