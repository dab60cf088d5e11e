// ABOUTME: gymops-cli - command-line access to the training store and collision checks
// ABOUTME: Migrates the SQLite schema, records trainings, and checks candidate slots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create the training tables
//! gymops-cli migrate
//!
//! # Book a group class (rejected if a trainer or the hall is busy)
//! gymops-cli add-group --name "Morning yoga" --trainer anna --trainer bob \
//!     --location hall-a --start 2021-01-05T10:00:00Z --end 2021-01-05T11:00:00Z
//!
//! # Record an individual session and accept it
//! gymops-cli add-individual --id pt-1 --trainer anna --client carl \
//!     --start 2021-01-05T12:00:00Z --end 2021-01-05T13:00:00Z
//! gymops-cli set-status pt-1 accepted
//!
//! # Check a slot, listing every conflict
//! gymops-cli check --trainer anna --location hall-a \
//!     --start 2021-01-05T10:30:00Z --end 2021-01-05T11:30:00Z --all
//! ```

mod commands;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gymops::config::{DatabaseUrl, SchedulerConfig};
use gymops::config::types::LogLevel;
use gymops::database::SqliteTrainingStore;
use gymops::errors::{AppError, AppResult};
use gymops::logging::LogFormat;
use gymops::models::TrainingStatus;
use std::process::ExitCode;
use tracing::info;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "gymops-cli",
    about = "Gym training schedule management CLI",
    long_about = "Records group and individual trainings and checks candidate slots for trainer and location double-bookings."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create training tables and indexes
    Migrate,

    /// Book a group training after checking for collisions
    AddGroup {
        /// Training id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Class name
        #[arg(long)]
        name: String,

        /// Trainer id (repeat for several trainers)
        #[arg(long = "trainer", required = true)]
        trainers: Vec<String>,

        /// Location id
        #[arg(long)]
        location: String,

        /// Start time (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// End time (RFC 3339), exclusive
        #[arg(long)]
        end: DateTime<Utc>,

        /// Store even if the slot collides
        #[arg(long)]
        force: bool,
    },

    /// Record an individual training request
    AddIndividual {
        /// Training id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Trainer id
        #[arg(long)]
        trainer: String,

        /// Client id
        #[arg(long)]
        client: String,

        /// Location id, if the session reserves one
        #[arg(long)]
        location: Option<String>,

        /// Start time (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// End time (RFC 3339), exclusive
        #[arg(long)]
        end: DateTime<Utc>,

        /// Initial status
        #[arg(long, default_value = "pending", value_parser = parse_status)]
        status: TrainingStatus,
    },

    /// Change an individual training's status
    SetStatus {
        /// Training id
        id: String,

        /// New status (pending, accepted, rejected, cancelled)
        #[arg(value_parser = parse_status)]
        status: TrainingStatus,
    },

    /// Check whether a slot collides with stored trainings
    Check {
        /// Trainer id (repeat for several trainers)
        #[arg(long = "trainer")]
        trainers: Vec<String>,

        /// Location id
        #[arg(long)]
        location: String,

        /// Start time (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// End time (RFC 3339), exclusive
        #[arg(long)]
        end: DateTime<Utc>,

        /// Training to ignore, e.g. the one being rescheduled
        #[arg(long)]
        exclude: Option<String>,

        /// Report every conflict instead of the first
        #[arg(long)]
        all: bool,
    },
}

fn parse_status(s: &str) -> std::result::Result<TrainingStatus, String> {
    TrainingStatus::parse(s).ok_or_else(|| {
        format!("unknown status '{s}' (expected pending, accepted, rejected, or cancelled)")
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = SchedulerConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    config.logging.format = LogFormat::Compact;
    if cli.verbose {
        config.logging.level = LogLevel::Debug;
        config.logging.directive = None;
    }
    config
        .logging
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;
    config.log_summary();

    // Migrate explicitly below instead of on every connect
    let auto_migrate = config.database.auto_migrate;
    config.database.auto_migrate = false;
    let store = SqliteTrainingStore::connect(&config.database).await?;
    if auto_migrate || matches!(cli.command, Command::Migrate) {
        store.migrate().await?;
    }

    let exit_code = match cli.command {
        Command::Migrate => {
            info!(database = %config.database.url, "Training tables ready");
            ExitCode::SUCCESS
        }
        Command::AddGroup {
            id,
            name,
            trainers,
            location,
            start,
            end,
            force,
        } => {
            let request = commands::training::GroupRequest {
                id,
                name,
                trainer_ids: trainers,
                location_id: location,
                start,
                end,
            };
            commands::training::add_group(&store, &config, request, force).await?
        }
        Command::AddIndividual {
            id,
            trainer,
            client,
            location,
            start,
            end,
            status,
        } => {
            let request = commands::training::IndividualRequest {
                id,
                trainer_id: trainer,
                client_id: client,
                location_id: location,
                start,
                end,
                status,
            };
            commands::training::add_individual(&store, &config, request).await?
        }
        Command::SetStatus { id, status } => {
            commands::training::set_status(&store, &config, &id, status).await?
        }
        Command::Check {
            trainers,
            location,
            start,
            end,
            exclude,
            all,
        } => {
            let request = commands::check::CheckRequest {
                trainer_ids: trainers,
                location_id: location,
                start,
                end,
                exclude_training_id: exclude,
            };
            commands::check::run(&store, &config, &request, all).await?
        }
    };

    Ok(exit_code)
}
