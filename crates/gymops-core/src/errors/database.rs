// ABOUTME: Structured error types for training stores and database adapters
// ABOUTME: Provides context-carrying variants that convert into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by a schedule store while reading or writing trainings
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The store could not be reached or a connection could not be opened
    #[error("Connection failed: {context}")]
    ConnectionFailed {
        /// What was being connected to
        context: String,
    },

    /// A query failed to execute
    #[error("Query failed: {context}")]
    QueryError {
        /// Query description and driver message
        context: String,
    },

    /// Schema creation or upgrade failed
    #[error("Migration failed: {context}")]
    MigrationFailed {
        /// Which migration step failed
        context: String,
    },

    /// A persisted record violates a model invariant
    #[error("Corrupt record for training {training_id}: {reason}")]
    CorruptRecord {
        /// Identifier of the offending training
        training_id: String,
        /// Which invariant is broken
        reason: String,
    },

    /// A record cannot be represented in the store's columns
    #[error("Cannot store training {training_id}: {reason}")]
    UnstorableRecord {
        /// Identifier of the rejected training
        training_id: String,
        /// Which value does not fit
        reason: String,
    },
}

impl DatabaseError {
    /// Build a `QueryError` from any displayable driver error
    pub fn query(operation: &str, error: impl std::fmt::Display) -> Self {
        Self::QueryError {
            context: format!("{operation}: {error}"),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let message = error.to_string();
        let resource_id = match &error {
            DatabaseError::CorruptRecord { training_id, .. }
            | DatabaseError::UnstorableRecord { training_id, .. } => Some(training_id.clone()),
            _ => None,
        };
        let app_error = Self::new(ErrorCode::DatabaseError, message).with_source(error);
        match resource_id {
            Some(id) => app_error.with_resource_id(id),
            None => app_error,
        }
    }
}
