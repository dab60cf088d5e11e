// ABOUTME: Integration tests for the SQLite training store
// ABOUTME: Checks persistence, SQL-side filtering, corrupt rows, and parity with the in-memory stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![cfg(feature = "sqlite")]
#![allow(missing_docs, clippy::unwrap_used)]

mod helpers;

use gymops::config::{DatabaseConfig, DatabaseUrl};
use gymops::database::{BusyIntervalSource, DatabaseError, SqliteTrainingStore};
use gymops::errors::ScheduleError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use gymops::models::{GroupTraining, IndividualTraining, Interval, OwnerKind, TrainingStatus};
use gymops::scheduling::{CollisionValidator, ScheduleGatherer};
use helpers::fixtures::{group, in_memory, individual, jan, slot, TEST_TIMEOUT};
use std::sync::Arc;
use tempfile::TempDir;

async fn memory_store() -> SqliteTrainingStore {
    SqliteTrainingStore::connect(&DatabaseConfig::in_memory())
        .await
        .unwrap()
}

fn validator_for(store: &SqliteTrainingStore) -> CollisionValidator {
    CollisionValidator::new(ScheduleGatherer::new(
        Arc::new(store.group_source()),
        Arc::new(store.individual_source()),
        TEST_TIMEOUT,
    ))
}

fn sample_groups() -> Vec<GroupTraining> {
    vec![
        group("yoga", &["anna", "bob"], "hall-a", slot(5, (10, 0), (11, 0))),
        group("spin", &["carl"], "studio-1", slot(5, (18, 0), (19, 0))),
        group("late", &["anna"], "hall-a", slot(9, (10, 0), (11, 0))),
    ]
}

fn sample_individuals() -> Vec<IndividualTraining> {
    vec![
        individual("pt-1", "anna", None, slot(5, (12, 0), (13, 0)), TrainingStatus::Accepted),
        individual("pt-2", "bob", Some("studio-1"), slot(5, (8, 0), (9, 0)), TrainingStatus::Accepted),
        individual("pt-3", "carl", None, slot(5, (7, 0), (8, 0)), TrainingStatus::Pending),
    ]
}

#[tokio::test]
async fn test_group_training_round_trips_through_sources() {
    let store = memory_store().await;
    for training in sample_groups() {
        store.insert_group_training(&training).await.unwrap();
    }

    let busy = store
        .group_source()
        .fetch_busy_intervals(jan(5, 0, 0), jan(6, 0, 0))
        .await
        .unwrap();

    // yoga: two trainers + location, spin: one trainer + location
    assert_eq!(busy.len(), 5);
    let yoga_trainers: Vec<&str> = busy
        .iter()
        .filter(|owned| owned.training_id == "yoga" && owned.owner_kind == OwnerKind::Trainer)
        .map(|owned| owned.owner_id.as_str())
        .collect();
    assert_eq!(yoga_trainers, ["anna", "bob"]);
    assert!(busy.iter().all(|owned| owned.training_id != "late"));
}

#[tokio::test]
async fn test_individual_source_filters_status_in_sql() {
    let store = memory_store().await;
    for training in sample_individuals() {
        store.insert_individual_training(&training).await.unwrap();
    }

    let source = store.individual_source();
    let busy = source
        .fetch_busy_intervals(jan(5, 0, 0), jan(6, 0, 0))
        .await
        .unwrap();
    assert_eq!(busy.len(), 3); // pt-1 trainer, pt-2 trainer + location
    assert!(busy.iter().all(|owned| owned.training_id != "pt-3"));

    assert!(store
        .update_individual_status("pt-3", TrainingStatus::Accepted)
        .await
        .unwrap());
    assert!(!store
        .update_individual_status("missing", TrainingStatus::Accepted)
        .await
        .unwrap());

    let busy = source
        .fetch_busy_intervals(jan(5, 0, 0), jan(6, 0, 0))
        .await
        .unwrap();
    assert_eq!(busy.len(), 4);
}

#[tokio::test]
async fn test_deleting_group_training_frees_its_owners() {
    let store = memory_store().await;
    for training in sample_groups() {
        store.insert_group_training(&training).await.unwrap();
    }
    let validator = validator_for(&store);
    let candidate = slot(5, (10, 30), (11, 30));

    let verdict = validator.validate(&candidate, &["bob"], "hall-b", None).await.unwrap();
    assert!(!verdict.is_free());

    assert!(store.delete_group_training("yoga").await.unwrap());
    assert!(!store.delete_group_training("yoga").await.unwrap());

    let verdict = validator.validate(&candidate, &["bob"], "hall-a", None).await.unwrap();
    assert!(verdict.is_free());
}

#[tokio::test]
async fn test_duplicate_ids_are_rejected() {
    let store = memory_store().await;
    let training = &sample_groups()[0];
    store.insert_group_training(training).await.unwrap();

    let error = store.insert_group_training(training).await.unwrap_err();
    assert!(matches!(error, DatabaseError::QueryError { .. }));
}

#[tokio::test]
async fn test_sqlite_and_memory_stores_agree() {
    let store = memory_store().await;
    for training in sample_groups() {
        store.insert_group_training(&training).await.unwrap();
    }
    for training in sample_individuals() {
        store.insert_individual_training(&training).await.unwrap();
    }
    let sqlite = validator_for(&store);
    let memory = in_memory(sample_groups(), sample_individuals()).validator;

    let cases: [(&[&str], &str, (u32, u32), (u32, u32)); 6] = [
        (&["anna"], "hall-z", (10, 30), (11, 0)),
        (&["anna"], "hall-z", (11, 0), (12, 0)),
        (&["bob"], "studio-1", (8, 30), (9, 30)),
        (&["carl"], "hall-z", (7, 0), (8, 0)),
        (&["dina"], "hall-a", (9, 0), (10, 0)),
        (&["dina", "carl"], "hall-z", (18, 59), (19, 30)),
    ];

    for (trainers, location, start, end) in cases {
        let candidate = slot(5, start, end);
        let from_sqlite = sqlite.validate(&candidate, trainers, location, None).await.unwrap();
        let from_memory = memory.validate(&candidate, trainers, location, None).await.unwrap();
        assert_eq!(from_sqlite, from_memory, "mismatch for {trainers:?} at {candidate}");
    }
}

fn nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap()
}

#[tokio::test]
async fn test_sub_millisecond_bounds_match_memory_store() {
    let store = memory_store().await;
    let stored_end = jan(5, 11, 0) + Duration::nanoseconds(900_000);
    let training = individual(
        "pt-fine",
        "anna",
        None,
        Interval::new(jan(5, 10, 0), stored_end).unwrap(),
        TrainingStatus::Accepted,
    );
    store.insert_individual_training(&training).await.unwrap();
    let sqlite = validator_for(&store);
    let memory = in_memory(Vec::new(), vec![training.clone()]).validator;

    let cases = [
        (stored_end - Duration::nanoseconds(400_000), false),
        (stored_end - Duration::nanoseconds(1), false),
        (stored_end, true),
    ];
    for (start, free) in cases {
        let candidate = Interval::new(start, jan(5, 12, 0)).unwrap();
        let from_sqlite = sqlite.validate(&candidate, &["anna"], "hall-z", None).await.unwrap();
        let from_memory = memory.validate(&candidate, &["anna"], "hall-z", None).await.unwrap();
        assert_eq!(from_sqlite, from_memory, "mismatch at {candidate}");
        assert_eq!(from_sqlite.is_free(), free, "wrong verdict at {candidate}");
    }

    let loaded = store.find_individual_training("pt-fine").await.unwrap();
    assert_eq!(loaded, Some(training));
}

#[tokio::test]
async fn test_find_individual_training_reads_current_status() {
    let store = memory_store().await;
    for training in sample_individuals() {
        store.insert_individual_training(&training).await.unwrap();
    }
    store
        .update_individual_status("pt-3", TrainingStatus::Cancelled)
        .await
        .unwrap();

    let pt2 = store.find_individual_training("pt-2").await.unwrap().unwrap();
    assert_eq!(pt2, sample_individuals()[1]);
    let pt3 = store.find_individual_training("pt-3").await.unwrap().unwrap();
    assert_eq!(pt3.status, TrainingStatus::Cancelled);
    assert!(store.find_individual_training("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_out_of_range_training_is_rejected_on_write() {
    let store = memory_store().await;
    let far = Utc.with_ymd_and_hms(2300, 1, 5, 10, 0, 0).unwrap();
    let interval = Interval::new(far, far + Duration::hours(1)).unwrap();

    let error = store
        .insert_group_training(&group("future", &["anna"], "hall-a", interval))
        .await
        .unwrap_err();
    assert!(matches!(error, DatabaseError::UnstorableRecord { .. }));

    // Nothing was half-written, and far-off checks still run
    let verdict = validator_for(&store)
        .validate(&interval, &["anna"], "hall-a", None)
        .await
        .unwrap();
    assert!(verdict.is_free());
}

#[tokio::test]
async fn test_corrupt_row_makes_check_indeterminate() {
    let store = memory_store().await;
    sqlx::query("PRAGMA ignore_check_constraints = ON")
        .execute(store.pool())
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO individual_trainings (id, trainer_id, client_id, starts_at_ns, ends_at_ns, status)
         VALUES ('broken', 'anna', 'client', $1, $2, 'accepted')",
    )
    .bind(nanos(jan(5, 11, 0)))
    .bind(nanos(jan(5, 10, 0)))
    .execute(store.pool())
    .await
    .unwrap();

    let error = validator_for(&store)
        .validate(&slot(5, (9, 0), (10, 0)), &["anna"], "hall-a", None)
        .await
        .unwrap_err();
    assert!(error.is_indeterminate());
    assert!(matches!(
        error,
        ScheduleError::StoreUnavailable {
            source: DatabaseError::CorruptRecord { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: DatabaseUrl::SQLite {
            path: dir.path().join("gym.db"),
        },
        ..DatabaseConfig::default()
    };

    {
        let store = SqliteTrainingStore::connect(&config).await.unwrap();
        store
            .insert_group_training(&sample_groups()[0])
            .await
            .unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteTrainingStore::connect(&config).await.unwrap();
    let verdict = validator_for(&reopened)
        .validate(&slot(5, (10, 0), (10, 30)), &["anna"], "hall-b", None)
        .await
        .unwrap();
    assert_eq!(verdict.collision().unwrap().conflicting_training_id, "yoga");
}
