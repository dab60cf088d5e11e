// ABOUTME: Collision detection pipeline: gather schedules, validate candidates, hold owner locks
// ABOUTME: Connects the training stores to the pure interval algorithms in gymops-scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-process per-owner locks around check-then-commit
pub mod booking_lock;
/// Concurrent, time-bounded schedule gathering
pub mod gatherer;
/// Collision verdicts for candidate bookings
pub mod validator;

pub use booking_lock::{BookingCheck, BookingCoordinator, BookingGuard, OwnerKey, OwnerLockRegistry};
pub use gatherer::{DayWindow, GatheredSchedule, ScheduleGatherer, TimeIntervalSet};
pub use validator::{BookingOwners, Collision, CollisionValidator, CollisionVerdict};
