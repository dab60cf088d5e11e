// ABOUTME: Error types for collision validation and schedule gathering
// ABOUTME: Separates caller input mistakes from indeterminate store failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Schedule Error Types
//!
//! A detected collision is never an error; it is reported through the
//! verdict type. The variants here cover the two remaining failure classes:
//!
//! - input errors (malformed interval, empty owner id), raised before any I/O
//! - indeterminate errors (store failure, gather timeout), after which the
//!   booking must be rejected rather than assumed free

use super::{AppError, DatabaseError, ErrorCode};
use crate::models::OwnerKind;
use thiserror::Error;

/// Errors produced while validating a candidate booking
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Interval whose start does not precede its end
    #[error("Invalid interval: start {start} must be before end {end}")]
    InvalidInterval {
        /// Rendered start value
        start: String,
        /// Rendered end value
        end: String,
    },

    /// Owner identifier was empty or blank
    #[error("Empty {owner_kind} id")]
    EmptyOwnerId {
        /// Which kind of owner was missing an id
        owner_kind: OwnerKind,
    },

    /// Gather window could not be normalized
    #[error("Invalid schedule window: {reason}")]
    InvalidWindow {
        /// Why the window was rejected
        reason: String,
    },

    /// A training store failed while gathering busy intervals
    #[error("Schedule store '{source_name}' unavailable: {source}")]
    StoreUnavailable {
        /// Name of the failing store
        source_name: &'static str,
        /// Underlying store error
        #[source]
        source: DatabaseError,
    },

    /// Gathering did not complete within the configured bound
    #[error("Schedule gather timed out after {timeout_ms} ms")]
    GatherTimeout {
        /// The bound that was exceeded
        timeout_ms: u64,
    },
}

impl ScheduleError {
    /// Create an "invalid interval" error from displayable bounds
    pub fn invalid_interval(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidInterval {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// True when the outcome of validation is unknown
    ///
    /// Callers must reject the booking in this case; treating it as
    /// "no collision" would allow double-bookings whenever the store is down.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::GatherTimeout { .. }
        )
    }

    /// Get the error code this maps to
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInterval { .. } | Self::InvalidWindow { .. } => ErrorCode::InvalidInput,
            Self::EmptyOwnerId { .. } => ErrorCode::MissingRequiredField,
            Self::StoreUnavailable { .. } => ErrorCode::DatabaseError,
            Self::GatherTimeout { .. } => ErrorCode::ResourceUnavailable,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(error: ScheduleError) -> Self {
        let code = error.code();
        let details = serde_json::json!({ "indeterminate": error.is_indeterminate() });
        Self::new(code, error.to_string())
            .with_details(details)
            .with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_not_indeterminate() {
        let error = ScheduleError::invalid_interval(12, 10);
        assert!(!error.is_indeterminate());
        assert_eq!(error.code(), ErrorCode::InvalidInput);
        assert_eq!(
            error.to_string(),
            "Invalid interval: start 12 must be before end 10"
        );

        let error = ScheduleError::EmptyOwnerId {
            owner_kind: OwnerKind::Location,
        };
        assert!(!error.is_indeterminate());
        assert_eq!(error.to_string(), "Empty location id");
    }

    #[test]
    fn test_store_failures_are_indeterminate() {
        let timeout = ScheduleError::GatherTimeout { timeout_ms: 250 };
        assert!(timeout.is_indeterminate());

        let unavailable = ScheduleError::StoreUnavailable {
            source_name: "group_trainings",
            source: DatabaseError::ConnectionFailed {
                context: "pool closed".to_owned(),
            },
        };
        assert!(unavailable.is_indeterminate());

        let app_error = AppError::from(unavailable);
        assert_eq!(app_error.code, ErrorCode::DatabaseError);
        assert_eq!(app_error.context.details["indeterminate"], true);
    }

    #[test]
    fn test_timeout_maps_to_service_unavailable() {
        let app_error = AppError::from(ScheduleError::GatherTimeout { timeout_ms: 10 });
        assert_eq!(app_error.http_status(), 503);
    }
}
