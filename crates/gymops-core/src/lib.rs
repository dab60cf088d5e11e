// ABOUTME: Core types and constants for the gym training-schedule platform
// ABOUTME: Foundation crate with error handling, interval models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Gymops Core
//!
//! Foundation crate providing shared types and constants for training
//! scheduling. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Environment variable names and defaults organized by domain
//! - **models**: Intervals, owners, and the two training collections

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Interval, OwnedInterval, trainings)
pub mod models;
