// ABOUTME: In-process per-owner locks that serialize check-then-commit booking flows
// ABOUTME: Locks are taken in sorted owner order so concurrent bookings cannot deadlock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Booking Locks
//!
//! Validating and then persisting a booking is two steps. Two requests for
//! the same trainer can both pass validation before either one commits. The
//! [`BookingCoordinator`] holds an advisory lock on every owner a booking
//! touches from the check until the caller drops the returned guard.
//!
//! The locks live in this process only. Deployments running several
//! processes against one database still need an exclusion constraint in the
//! database itself.

use super::validator::{BookingOwners, Collision, CollisionValidator, CollisionVerdict};
use crate::errors::ScheduleError;
use crate::models::{OwnerKind, TimeInterval};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Identity of a lockable owner; ordering defines lock acquisition order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey {
    /// Trainer or location
    pub owner_kind: OwnerKind,
    /// Owner identifier
    pub owner_id: String,
}

impl OwnerKey {
    /// Key for one owner
    pub fn new(owner_kind: OwnerKind, owner_id: impl Into<String>) -> Self {
        Self {
            owner_kind,
            owner_id: owner_id.into(),
        }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner_kind, self.owner_id)
    }
}

type LockMap = DashMap<OwnerKey, Arc<Mutex<()>>>;

/// Lazily created mutex per owner
///
/// An owner's entry lives while a guard holds it or a task waits on it, and
/// is removed when the last guard for it is dropped.
#[derive(Debug, Default)]
pub struct OwnerLockRegistry {
    locks: Arc<LockMap>,
}

impl OwnerLockRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every owner of a booking, waiting for current holders
    pub async fn acquire(&self, owners: &BookingOwners) -> BookingGuard {
        let mut keys: Vec<OwnerKey> = owners
            .in_check_order()
            .map(|(owner_kind, owner_id)| OwnerKey::new(owner_kind, owner_id))
            .collect();
        keys.sort();
        keys.dedup();

        // Filled as locks are taken, so a cancelled acquire still cleans up
        let mut guard = BookingGuard {
            locks: Arc::clone(&self.locks),
            keys: Vec::with_capacity(keys.len()),
            guards: Vec::with_capacity(keys.len()),
        };
        for key in keys {
            // Clone the Arc out so no map shard stays locked across the await
            let lock = Arc::clone(
                self.locks
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .value(),
            );
            guard.guards.push(lock.lock_owned().await);
            guard.keys.push(key);
        }
        debug!(owners = guard.keys.len(), "Booking locks acquired");
        guard
    }

    /// Number of owners with a lock entry
    #[must_use]
    pub fn tracked_owners(&self) -> usize {
        self.locks.len()
    }

    /// Drop entries that nobody holds or waits on, such as those left by a
    /// cancelled wait
    pub fn prune_idle(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

/// Proof that a booking's owners are locked; releases them on drop
#[must_use = "the owners are unlocked as soon as the guard is dropped"]
pub struct BookingGuard {
    locks: Arc<LockMap>,
    keys: Vec<OwnerKey>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl BookingGuard {
    /// Locked owners in acquisition order
    #[must_use]
    pub fn owners(&self) -> &[OwnerKey] {
        &self.keys
    }
}

impl Drop for BookingGuard {
    fn drop(&mut self) {
        self.guards.clear();
        for key in &self.keys {
            // The map holds one reference; any other is a holder or a waiter
            self.locks
                .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

impl fmt::Debug for BookingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingGuard")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Result of a locked collision check
#[derive(Debug)]
pub enum BookingCheck {
    /// Owners are free and stay locked until the guard is dropped
    Clear(BookingGuard),
    /// The booking collides; no locks are held
    Blocked(Collision),
}

/// Runs collision checks while holding the owners' locks
#[derive(Clone)]
pub struct BookingCoordinator {
    validator: Arc<CollisionValidator>,
    locks: Arc<OwnerLockRegistry>,
}

impl BookingCoordinator {
    /// Coordinate checks through `validator` with a fresh lock registry
    #[must_use]
    pub fn new(validator: Arc<CollisionValidator>) -> Self {
        Self {
            validator,
            locks: Arc::new(OwnerLockRegistry::new()),
        }
    }

    /// Lock registry shared by every clone of this coordinator
    #[must_use]
    pub fn locks(&self) -> &OwnerLockRegistry {
        &self.locks
    }

    /// Lock the booking's owners, then validate
    ///
    /// On `Clear` the caller persists the booking and then drops the guard.
    ///
    /// # Errors
    ///
    /// Input and indeterminate errors from validation; locks are released
    pub async fn check_and_hold<S: AsRef<str>>(
        &self,
        candidate: &TimeInterval,
        trainer_ids: &[S],
        location_id: &str,
        exclude_training_id: Option<&str>,
    ) -> Result<BookingCheck, ScheduleError> {
        let owners = BookingOwners::new(trainer_ids, location_id)?;
        self.check_and_hold_owners(candidate, &owners, exclude_training_id)
            .await
    }

    /// [`BookingCoordinator::check_and_hold`] for pre-validated owners
    ///
    /// # Errors
    ///
    /// Indeterminate errors from validation; locks are released
    pub async fn check_and_hold_owners(
        &self,
        candidate: &TimeInterval,
        owners: &BookingOwners,
        exclude_training_id: Option<&str>,
    ) -> Result<BookingCheck, ScheduleError> {
        let guard = self.locks.acquire(owners).await;

        match self
            .validator
            .validate_owners(candidate, owners, exclude_training_id)
            .await?
        {
            CollisionVerdict::NoCollision => Ok(BookingCheck::Clear(guard)),
            CollisionVerdict::Collision(collision) => Ok(BookingCheck::Blocked(collision)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_owners_are_locked_once() {
        let registry = OwnerLockRegistry::new();
        let owners = BookingOwners::new(&["anna", "anna", "bob"], "hall").unwrap();

        let guard = registry.acquire(&owners).await;
        let locked: Vec<String> = guard.owners().iter().map(ToString::to_string).collect();
        assert_eq!(locked, ["trainer:anna", "trainer:bob", "location:hall"]);
        assert_eq!(registry.tracked_owners(), 3);
    }

    #[tokio::test]
    async fn test_released_owners_leave_the_registry() {
        let registry = OwnerLockRegistry::new();
        let held = registry
            .acquire(&BookingOwners::new(&["anna"], "hall").unwrap())
            .await;
        drop(
            registry
                .acquire(&BookingOwners::new(&["bob"], "studio").unwrap())
                .await,
        );

        assert_eq!(registry.tracked_owners(), 2);
        registry.prune_idle();
        assert_eq!(registry.tracked_owners(), 2);

        drop(held);
        assert_eq!(registry.tracked_owners(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_another_task_waits() {
        let registry = Arc::new(OwnerLockRegistry::new());
        let owners = BookingOwners::new(&["anna"], "hall").unwrap();
        let first = registry.acquire(&owners).await;

        let waiter = {
            let registry = Arc::clone(&registry);
            let owners = owners.clone();
            tokio::spawn(async move {
                let guard = registry.acquire(&owners).await;
                guard.owners().len()
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(waiter.await.unwrap(), 2);
        assert_eq!(registry.tracked_owners(), 0);
    }
}
