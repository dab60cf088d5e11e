// ABOUTME: Domain models re-exported from gymops-core
// ABOUTME: Intervals, owners, and the two training kinds that occupy them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use gymops_core::models::*;
