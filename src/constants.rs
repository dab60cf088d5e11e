// ABOUTME: Application constants re-exported from gymops-core
// ABOUTME: Environment variable names, scheduling defaults, and persisted status strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use gymops_core::constants::*;
