// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Environment variable names and defaults for scheduling, database, and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain rather than kept in a single flat list.

/// Service identification used in structured logs
pub mod service_names {
    /// Name reported by the collision service and CLI
    pub const GYMOPS_SCHEDULER: &str = "gymops-scheduler";
}

/// Environment variable names
pub mod env_config {
    /// Database connection URL (`sqlite:<path>` or `sqlite::memory:`)
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum pooled database connections
    pub const DATABASE_MAX_CONNECTIONS: &str = "GYMOPS_DB_MAX_CONNECTIONS";
    /// Run schema migrations on startup
    pub const AUTO_MIGRATE: &str = "AUTO_MIGRATE";
    /// Upper bound for one schedule gather, in milliseconds
    pub const GATHER_TIMEOUT_MS: &str = "GYMOPS_GATHER_TIMEOUT_MS";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Log filter directive
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Scheduling defaults
pub mod scheduling {
    /// Default bound for a gather round trip (2 seconds)
    pub const DEFAULT_GATHER_TIMEOUT_MS: u64 = 2_000;
}

/// Database defaults
pub mod database {
    /// Default database URL when `DATABASE_URL` is unset
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/gymops.db";

    /// Default pool size for file-backed `SQLite`
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    /// In-memory `SQLite` databases are per-connection, so the pool stays at one
    pub const MEMORY_MAX_CONNECTIONS: u32 = 1;
}

/// Persisted string forms for training enums
pub mod training_status {
    /// Awaiting trainer confirmation
    pub const PENDING: &str = "pending";
    /// Confirmed; blocks the slot
    pub const ACCEPTED: &str = "accepted";
    /// Declined by the trainer
    pub const REJECTED: &str = "rejected";
    /// Cancelled after confirmation
    pub const CANCELLED: &str = "cancelled";
}
