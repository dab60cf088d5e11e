// ABOUTME: Configuration module for the scheduler service and CLI
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read from environment variables only. Each submodule owns
//! one concern and exposes a `from_env` constructor.

/// Database location and pool sizing
pub mod database;
/// Top-level scheduler settings
pub mod environment;
/// Log level and deployment environment
pub mod types;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::SchedulerConfig;
pub use types::{Environment, LogLevel};
