// ABOUTME: Core data models for training scheduling
// ABOUTME: Re-exports Interval, OwnedInterval, and the group/individual training types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain value structs; trainers and locations are referenced by id only.
//! The collision check never needs an object graph, just flattened
//! `(owner, start, end, training_id)` tuples, which is what
//! [`OwnedInterval`] carries.

mod interval;
mod training;

pub use interval::{
    Interval, IntervalBounds, OwnedInterval, OwnerKind, TimeInterval, TrainingKind,
};
pub use training::{GroupTraining, IndividualTraining, TrainingStatus};
