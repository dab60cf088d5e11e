// ABOUTME: Top-level scheduler configuration assembled from environment variables
// ABOUTME: Combines deployment environment, database, gather timeout, and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::database::DatabaseConfig;
use super::types::Environment;
use crate::constants::{env_config, scheduling};
use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use std::env;
use std::time::Duration;
use tracing::info;

/// Everything needed to run collision checks against a store
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Training store connection
    pub database: DatabaseConfig,
    /// Upper bound for one schedule gather
    pub gather_timeout: Duration,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::default(),
            gather_timeout: Duration::from_millis(scheduling::DEFAULT_GATHER_TIMEOUT_MS),
            logging: LoggingConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::from_str_or_default(
            &env::var(env_config::ENVIRONMENT).unwrap_or_default(),
        );
        let database = DatabaseConfig::from_env()?;
        let gather_timeout = parse_gather_timeout(env::var(env_config::GATHER_TIMEOUT_MS).ok())?;

        let config = Self {
            environment,
            database,
            gather_timeout,
            logging: LoggingConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error when production points at an in-memory database
    pub fn validate(&self) -> AppResult<()> {
        if self.environment.is_production() && self.database.url.is_memory() {
            return Err(AppError::config(
                "In-memory database is not allowed in production",
            ));
        }
        Ok(())
    }

    /// Log a one-line summary of the loaded configuration
    pub fn log_summary(&self) {
        info!(
            environment = %self.environment,
            database = %self.database.url,
            gather_timeout_ms = self.gather_timeout.as_millis(),
            "Scheduler configuration loaded"
        );
    }
}

/// Parse the gather timeout, defaulting when unset
fn parse_gather_timeout(raw: Option<String>) -> AppResult<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_millis(scheduling::DEFAULT_GATHER_TIMEOUT_MS));
    };
    let millis: u64 = raw.trim().parse().map_err(|e| {
        AppError::config(format!(
            "Invalid {} value '{raw}': {e}",
            env_config::GATHER_TIMEOUT_MS
        ))
    })?;
    if millis == 0 {
        return Err(AppError::config(format!(
            "{} must be greater than zero",
            env_config::GATHER_TIMEOUT_MS
        )));
    }
    Ok(Duration::from_millis(millis))
}
