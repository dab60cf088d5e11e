// ABOUTME: Error types for the scheduler re-exported from gymops-core
// ABOUTME: AppError for outer surfaces, ScheduleError and DatabaseError for the collision path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use gymops_core::errors::*;
