// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Command implementations for gymops-cli
// ABOUTME: Training bookkeeping commands and slot checks share one validator builder

pub mod check;
pub mod training;

use gymops::config::SchedulerConfig;
use gymops::database::SqliteTrainingStore;
use gymops::errors::{AppError, AppResult};
use gymops::scheduling::{CollisionValidator, ScheduleGatherer};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status when the requested slot is taken
pub const EXIT_COLLISION: u8 = 2;

/// Validator reading both training views of `store`
pub fn validator(store: &SqliteTrainingStore, config: &SchedulerConfig) -> CollisionValidator {
    CollisionValidator::new(ScheduleGatherer::new(
        Arc::new(store.group_source()),
        Arc::new(store.individual_source()),
        config.gather_timeout,
    ))
}

/// Print `value` as pretty JSON on stdout
pub fn print_json(value: &impl Serialize) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Exit code for a collision check outcome
pub fn exit_code(collided: bool) -> ExitCode {
    if collided {
        ExitCode::from(EXIT_COLLISION)
    } else {
        ExitCode::SUCCESS
    }
}
