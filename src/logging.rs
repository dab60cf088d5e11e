// ABOUTME: Logging configuration and structured logging setup for the scheduler
// ABOUTME: Configures filters and output format, plus structured events for collision decisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging for the collision service and CLI

use crate::config::types::LogLevel;
use crate::constants::{env_config, service_names};
use crate::models::{OwnerKind, TimeInterval};
use anyhow::Result;
use serde_json::json;
use std::env;
use std::io;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{self as subscriber_fmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    #[default]
    Pretty,
    /// Compact format for CLI use
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; unknown values select `Pretty`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for the scheduler's own targets
    pub level: LogLevel,
    /// Raw `RUST_LOG` directive, when set
    pub directive: Option<String>,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directive: None,
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::GYMOPS_SCHEDULER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let directive = env::var(env_config::RUST_LOG).ok();
        let level = directive
            .as_deref()
            .map_or(LogLevel::Info, LogLevel::from_str_or_default);

        let format = LogFormat::from_str_or_default(
            env::var(env_config::LOG_FORMAT).as_deref().unwrap_or("pretty"),
        );

        let environment =
            env::var(env_config::ENVIRONMENT).unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            directive,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: service_names::GYMOPS_SCHEDULER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the filter: caller directive, then noise reduction, then our own level
    fn env_filter(&self) -> EnvFilter {
        let base = self
            .directive
            .as_deref()
            .map_or_else(|| EnvFilter::new(self.level.as_str()), EnvFilter::new);

        base.add_directive(
            "sqlx=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "sqlx::query=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            format!("gymops={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = subscriber_fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = subscriber_fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                // CLI output is JSON on stdout, so compact logs go to stderr
                let compact_layer = subscriber_fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level.as_str(),
                "format": format!("{:?}", self.format),
                "location": self.include_location,
                "spans": self.include_spans
            }
        });

        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {config_summary}"
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured events for collision decisions
///
/// Keeps field names stable so log queries can filter on `owner.kind`,
/// `training.id` and `verdict`.
pub struct ScheduleLogger;

impl ScheduleLogger {
    /// A candidate collided with an existing training
    pub fn log_collision(
        candidate: &TimeInterval,
        owner_kind: OwnerKind,
        owner_id: &str,
        conflicting_training_id: &str,
    ) {
        info!(
            verdict = "collision",
            owner.kind = %owner_kind,
            owner.id = %owner_id,
            training.id = %conflicting_training_id,
            candidate = %candidate,
            "Booking collides with existing training"
        );
    }

    /// A candidate is free for every requested owner
    pub fn log_no_collision(candidate: &TimeInterval, owners_checked: usize) {
        debug!(
            verdict = "no_collision",
            candidate = %candidate,
            owners_checked,
            "Booking is free"
        );
    }

    /// Validation could not complete; the booking must be rejected
    pub fn log_indeterminate(candidate: &TimeInterval, error: &dyn std::error::Error) {
        warn!(
            verdict = "indeterminate",
            candidate = %candidate,
            error = %error,
            "Collision check could not complete, rejecting booking"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("fancy"), LogFormat::Pretty);
    }
}
