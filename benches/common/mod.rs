// ABOUTME: Common benchmark utilities and fixtures for schedule benchmarks
// ABOUTME: Provides deterministic busy-interval generators shared by Criterion benches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Common benchmark utilities and fixtures.

pub mod fixtures;
