// ABOUTME: Decides whether a candidate booking collides with trainer or location schedules
// ABOUTME: One gather per check, then an OverlapEngine query per owner in a fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Collision Validator
//!
//! A booking collides when any of its trainers, or its location, is already
//! busy at an overlapping time. Owners are checked trainers first, in the
//! order the caller supplied them, then the location. The first collision
//! found is the answer; [`CollisionValidator::validate_all`] keeps going and
//! reports every conflict instead.
//!
//! Input problems are reported before any I/O. Store failures and timeouts
//! surface as indeterminate errors so callers reject the booking rather than
//! accept it on incomplete data.

use super::gatherer::{DayWindow, GatheredSchedule, ScheduleGatherer};
use crate::errors::ScheduleError;
use crate::logging::ScheduleLogger;
use crate::models::{Interval, OwnerKind, TimeInterval};
use chrono::{DateTime, Utc};
use gymops_scheduling::OverlapEngine;
use serde::{Deserialize, Serialize};

/// An existing training blocking the candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Whether a trainer or the location is double-booked
    pub owner_kind: OwnerKind,
    /// The double-booked trainer or location
    pub owner_id: String,
    /// Training already holding the owner
    pub conflicting_training_id: String,
    /// When that training runs
    pub conflicting_interval: TimeInterval,
}

/// Outcome of a completed collision check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum CollisionVerdict {
    /// Every owner is free for the candidate interval
    NoCollision,
    /// At least one owner is busy
    Collision(Collision),
}

impl CollisionVerdict {
    /// Whether the booking may proceed
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::NoCollision)
    }

    /// The blocking collision, if any
    #[must_use]
    pub const fn collision(&self) -> Option<&Collision> {
        match self {
            Self::NoCollision => None,
            Self::Collision(collision) => Some(collision),
        }
    }
}

impl From<Option<Collision>> for CollisionVerdict {
    fn from(collision: Option<Collision>) -> Self {
        collision.map_or(Self::NoCollision, Self::Collision)
    }
}

/// Trainers and location a booking would occupy
///
/// Construction rejects blank ids, so every value in circulation names real
/// owners. Group bookings always name a location; an individual session may
/// not reserve one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOwners {
    trainer_ids: Vec<String>,
    location_id: Option<String>,
}

impl BookingOwners {
    /// Validate and capture the owners of a booking
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::EmptyOwnerId` if any id is blank
    pub fn new<S: AsRef<str>>(trainer_ids: &[S], location_id: &str) -> Result<Self, ScheduleError> {
        Self::build(trainer_ids, Some(location_id))
    }

    /// Owners of an individual session: its trainer and, if booked, a location
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::EmptyOwnerId` if an id is blank
    pub fn for_individual(
        trainer_id: &str,
        location_id: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        Self::build(&[trainer_id], location_id)
    }

    fn build<S: AsRef<str>>(
        trainer_ids: &[S],
        location_id: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        let trainer_ids = trainer_ids
            .iter()
            .map(|trainer_id| owner_id(OwnerKind::Trainer, trainer_id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let location_id = location_id
            .map(|location_id| owner_id(OwnerKind::Location, location_id))
            .transpose()?;

        Ok(Self {
            trainer_ids,
            location_id,
        })
    }

    /// Trainer ids in the order they were supplied
    #[must_use]
    pub fn trainer_ids(&self) -> &[String] {
        &self.trainer_ids
    }

    /// Location id, absent for individual sessions without a room
    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    /// Owners in check order: trainers as supplied, then the location
    pub fn in_check_order(&self) -> impl Iterator<Item = (OwnerKind, &str)> {
        self.trainer_ids
            .iter()
            .map(|trainer_id| (OwnerKind::Trainer, trainer_id.as_str()))
            .chain(
                self.location_id
                    .iter()
                    .map(|location_id| (OwnerKind::Location, location_id.as_str())),
            )
    }

    /// Number of owners that will be checked
    #[must_use]
    pub fn len(&self) -> usize {
        self.trainer_ids.len() + usize::from(self.location_id.is_some())
    }

    /// Whether there is nothing to check
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn owner_id(owner_kind: OwnerKind, id: &str) -> Result<String, ScheduleError> {
    if id.trim().is_empty() {
        Err(ScheduleError::EmptyOwnerId { owner_kind })
    } else {
        Ok(id.to_owned())
    }
}

/// Validates candidate bookings against the stored schedule
///
/// `Send + Sync`; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct CollisionValidator {
    gatherer: ScheduleGatherer,
}

impl CollisionValidator {
    /// Create a validator that reads through `gatherer`
    #[must_use]
    pub const fn new(gatherer: ScheduleGatherer) -> Self {
        Self { gatherer }
    }

    /// The gatherer used for every check
    #[must_use]
    pub const fn gatherer(&self) -> &ScheduleGatherer {
        &self.gatherer
    }

    /// First collision between `candidate` and the owners' schedules
    ///
    /// `exclude_training_id` names a stored training to ignore, typically the
    /// one being rescheduled.
    ///
    /// # Errors
    ///
    /// Returns `EmptyOwnerId` for blank ids, or an indeterminate error when
    /// the schedule could not be gathered
    pub async fn validate<S: AsRef<str>>(
        &self,
        candidate: &TimeInterval,
        trainer_ids: &[S],
        location_id: &str,
        exclude_training_id: Option<&str>,
    ) -> Result<CollisionVerdict, ScheduleError> {
        let owners = BookingOwners::new(trainer_ids, location_id)?;
        self.validate_owners(candidate, &owners, exclude_training_id)
            .await
    }

    /// [`CollisionValidator::validate`] for pre-validated owners
    ///
    /// # Errors
    ///
    /// Returns an indeterminate error when the schedule could not be gathered
    pub async fn validate_owners(
        &self,
        candidate: &TimeInterval,
        owners: &BookingOwners,
        exclude_training_id: Option<&str>,
    ) -> Result<CollisionVerdict, ScheduleError> {
        let schedule = self.gather_for(candidate, exclude_training_id).await?;
        let verdict = Self::evaluate(&schedule, candidate, owners);
        match &verdict {
            CollisionVerdict::NoCollision => ScheduleLogger::log_no_collision(candidate, owners.len()),
            CollisionVerdict::Collision(collision) => ScheduleLogger::log_collision(
                candidate,
                collision.owner_kind,
                &collision.owner_id,
                &collision.conflicting_training_id,
            ),
        }
        Ok(verdict)
    }

    /// Every collision for every owner, in check order
    ///
    /// # Errors
    ///
    /// Same as [`CollisionValidator::validate`]
    pub async fn validate_all<S: AsRef<str>>(
        &self,
        candidate: &TimeInterval,
        trainer_ids: &[S],
        location_id: &str,
        exclude_training_id: Option<&str>,
    ) -> Result<Vec<Collision>, ScheduleError> {
        let owners = BookingOwners::new(trainer_ids, location_id)?;
        let schedule = self.gather_for(candidate, exclude_training_id).await?;
        let collisions = Self::evaluate_all(&schedule, candidate, &owners);
        for collision in &collisions {
            ScheduleLogger::log_collision(
                candidate,
                collision.owner_kind,
                &collision.owner_id,
                &collision.conflicting_training_id,
            );
        }
        Ok(collisions)
    }

    /// Build the candidate from raw bounds, then [`CollisionValidator::validate`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidInterval` when `start >= end`, otherwise as `validate`
    pub async fn validate_slot<S: AsRef<str>>(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        trainer_ids: &[S],
        location_id: &str,
        exclude_training_id: Option<&str>,
    ) -> Result<CollisionVerdict, ScheduleError> {
        let candidate = Interval::new(start, end)?;
        self.validate(&candidate, trainer_ids, location_id, exclude_training_id)
            .await
    }

    /// First collision against an already gathered schedule
    #[must_use]
    pub fn evaluate(
        schedule: &GatheredSchedule,
        candidate: &TimeInterval,
        owners: &BookingOwners,
    ) -> CollisionVerdict {
        owners
            .in_check_order()
            .find_map(|(owner_kind, owner_id)| {
                let set = schedule.intervals_for(owner_kind, owner_id)?;
                OverlapEngine::first_conflict(candidate, set).map(|member| Collision {
                    owner_kind,
                    owner_id: owner_id.to_owned(),
                    conflicting_training_id: member.training_id.clone(),
                    conflicting_interval: member.interval,
                })
            })
            .into()
    }

    /// Every collision against an already gathered schedule
    #[must_use]
    pub fn evaluate_all(
        schedule: &GatheredSchedule,
        candidate: &TimeInterval,
        owners: &BookingOwners,
    ) -> Vec<Collision> {
        owners
            .in_check_order()
            .flat_map(|(owner_kind, owner_id)| {
                schedule
                    .intervals_for(owner_kind, owner_id)
                    .map(|set| OverlapEngine::conflicts(candidate, set))
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |member| Collision {
                        owner_kind,
                        owner_id: owner_id.to_owned(),
                        conflicting_training_id: member.training_id.clone(),
                        conflicting_interval: member.interval,
                    })
            })
            .collect()
    }

    async fn gather_for(
        &self,
        candidate: &TimeInterval,
        exclude_training_id: Option<&str>,
    ) -> Result<GatheredSchedule, ScheduleError> {
        let window = DayWindow::for_interval(candidate)?;
        self.gatherer
            .gather_window(window, exclude_training_id)
            .await
            .inspect_err(|error| {
                if error.is_indeterminate() {
                    ScheduleLogger::log_indeterminate(candidate, error);
                }
            })
    }
}
