// ABOUTME: SQLite persistence for group and individual trainings
// ABOUTME: Window and status filters run in SQL; rows map back into owner-tagged busy intervals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Times are stored as UTC epoch nanoseconds, the full precision of
//! `DateTime<Utc>`, so a stored interval compares exactly like the in-memory
//! one. The window predicate stays a plain integer comparison that can use
//! the `(starts_at_ns, ends_at_ns)` indexes. Nanosecond columns cover the
//! years 1677 to 2262; trainings outside that range are rejected on write.

use super::{BusyIntervalSource, DatabaseError};
use crate::config::DatabaseConfig;
use crate::models::{
    GroupTraining, IndividualTraining, Interval, OwnedInterval, TimeInterval, TrainingKind,
    TrainingStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Time allowed to obtain a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// `SQLite` store holding both training collections
#[derive(Debug, Clone)]
pub struct SqliteTrainingStore {
    pool: SqlitePool,
}

impl SqliteTrainingStore {
    /// Open a pool for `config`, running migrations when `auto_migrate` is set
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = config.url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| DatabaseError::ConnectionFailed {
                context: format!("Invalid connection string {connection_string}: {e}"),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.effective_max_connections())
            .acquire_timeout(ACQUIRE_TIMEOUT);
        if config.url.is_memory() {
            // Closing the only connection would drop the whole database
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                context: format!("{connection_string}: {e}"),
            })?;

        let store = Self::from_pool(pool);
        if config.auto_migrate {
            store.migrate().await?;
        }
        info!(database = %config.url, "Training store connected");
        Ok(store)
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create training tables and indexes
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let statements = [
            (
                "group_trainings",
                r"
                CREATE TABLE IF NOT EXISTS group_trainings (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    location_id TEXT NOT NULL,
                    starts_at_ns INTEGER NOT NULL,
                    ends_at_ns INTEGER NOT NULL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    CHECK (starts_at_ns < ends_at_ns)
                )
                ",
            ),
            (
                "group_training_trainers",
                r"
                CREATE TABLE IF NOT EXISTS group_training_trainers (
                    training_id TEXT NOT NULL REFERENCES group_trainings(id) ON DELETE CASCADE,
                    trainer_id TEXT NOT NULL,
                    position INTEGER NOT NULL,
                    PRIMARY KEY (training_id, trainer_id)
                )
                ",
            ),
            (
                "individual_trainings",
                r"
                CREATE TABLE IF NOT EXISTS individual_trainings (
                    id TEXT PRIMARY KEY,
                    trainer_id TEXT NOT NULL,
                    client_id TEXT NOT NULL,
                    location_id TEXT,
                    starts_at_ns INTEGER NOT NULL,
                    ends_at_ns INTEGER NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'accepted', 'rejected', 'cancelled')),
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    CHECK (starts_at_ns < ends_at_ns)
                )
                ",
            ),
            (
                "idx_group_trainings_window",
                "CREATE INDEX IF NOT EXISTS idx_group_trainings_window ON group_trainings(starts_at_ns, ends_at_ns)",
            ),
            (
                "idx_individual_trainings_window",
                "CREATE INDEX IF NOT EXISTS idx_individual_trainings_window ON individual_trainings(status, starts_at_ns, ends_at_ns)",
            ),
        ];

        for (name, sql) in statements {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationFailed {
                    context: format!("{name}: {e}"),
                })?;
        }
        debug!("Training tables migrated");
        Ok(())
    }

    /// Insert a group training and its trainer assignments atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the id already exists or the write fails
    pub async fn insert_group_training(&self, training: &GroupTraining) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::query("begin group training insert", e))?;

        sqlx::query(
            r"
            INSERT INTO group_trainings (id, name, location_id, starts_at_ns, ends_at_ns)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(training.id.as_str())
        .bind(training.name.as_str())
        .bind(training.location_id.as_str())
        .bind(stored_nanos(training.interval.start(), &training.id)?)
        .bind(stored_nanos(training.interval.end(), &training.id)?)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::query("insert group training", e))?;

        for (position, trainer_id) in training.trainer_ids.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO group_training_trainers (training_id, trainer_id, position)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(training.id.as_str())
            .bind(trainer_id.as_str())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::query("insert group training trainer", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::query("commit group training insert", e))?;
        debug!(training.id = %training.id, "Group training stored");
        Ok(())
    }

    /// Delete a group training; `false` when the id is unknown
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_group_training(&self, training_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM group_trainings WHERE id = $1")
            .bind(training_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("delete group training", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert an individual training
    ///
    /// # Errors
    ///
    /// Returns an error if the id already exists or the write fails
    pub async fn insert_individual_training(
        &self,
        training: &IndividualTraining,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO individual_trainings
                (id, trainer_id, client_id, location_id, starts_at_ns, ends_at_ns, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(training.id.as_str())
        .bind(training.trainer_id.as_str())
        .bind(training.client_id.as_str())
        .bind(training.location_id.as_deref())
        .bind(stored_nanos(training.interval.start(), &training.id)?)
        .bind(stored_nanos(training.interval.end(), &training.id)?)
        .bind(training.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("insert individual training", e))?;
        debug!(training.id = %training.id, status = %training.status, "Individual training stored");
        Ok(())
    }

    /// Change an individual training's status; `false` when the id is unknown
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_individual_status(
        &self,
        training_id: &str,
        status: TrainingStatus,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r"
            UPDATE individual_trainings
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            ",
        )
        .bind(status.as_str())
        .bind(training_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("update individual training status", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Load one individual training by id
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the row is corrupt
    pub async fn find_individual_training(
        &self,
        training_id: &str,
    ) -> Result<Option<IndividualTraining>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, client_id, location_id, starts_at_ns, ends_at_ns, status
            FROM individual_trainings
            WHERE id = $1
            ",
        )
        .bind(training_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("fetch individual training", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw_status: String = column(&row, "status")?;
        let status =
            TrainingStatus::parse(&raw_status).ok_or_else(|| DatabaseError::CorruptRecord {
                training_id: training_id.to_owned(),
                reason: format!("unknown status '{raw_status}'"),
            })?;

        Ok(Some(IndividualTraining {
            id: column(&row, "id")?,
            trainer_id: column(&row, "trainer_id")?,
            client_id: column(&row, "client_id")?,
            location_id: column(&row, "location_id")?,
            interval: row_interval(&row, training_id)?,
            status,
        }))
    }

    /// Group trainings as a busy-interval source
    #[must_use]
    pub fn group_source(&self) -> SqliteGroupTrainings {
        SqliteGroupTrainings {
            pool: self.pool.clone(),
        }
    }

    /// Individual trainings as a busy-interval source
    #[must_use]
    pub fn individual_source(&self) -> SqliteIndividualTrainings {
        SqliteIndividualTrainings {
            pool: self.pool.clone(),
        }
    }
}

/// Read view over `group_trainings`
#[derive(Debug, Clone)]
pub struct SqliteGroupTrainings {
    pool: SqlitePool,
}

#[async_trait]
impl BusyIntervalSource for SqliteGroupTrainings {
    fn source_name(&self) -> &'static str {
        "group_trainings"
    }

    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        if window_start >= window_end {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            r"
            SELECT g.id, g.location_id, g.starts_at_ns, g.ends_at_ns, t.trainer_id
            FROM group_trainings g
            LEFT JOIN group_training_trainers t ON t.training_id = g.id
            WHERE g.starts_at_ns < $1 AND g.ends_at_ns > $2
            ORDER BY g.starts_at_ns, g.id, t.position
            ",
        )
        .bind(window_nanos(window_end))
        .bind(window_nanos(window_start))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("fetch group trainings", e))?;

        let mut busy = Vec::with_capacity(rows.len() * 2);
        let mut located = HashSet::new();
        for row in &rows {
            let training_id: String = column(row, "id")?;
            let interval = row_interval(row, &training_id)?;

            if let Some(trainer_id) = column::<Option<String>>(row, "trainer_id")? {
                busy.push(OwnedInterval::trainer(
                    interval,
                    trainer_id,
                    training_id.as_str(),
                    TrainingKind::Group,
                ));
            }
            if !located.contains(&training_id) {
                let location_id: String = column(row, "location_id")?;
                busy.push(OwnedInterval::location(
                    interval,
                    location_id,
                    training_id.as_str(),
                    TrainingKind::Group,
                ));
                located.insert(training_id);
            }
        }
        Ok(busy)
    }
}

/// Read view over `individual_trainings`
#[derive(Debug, Clone)]
pub struct SqliteIndividualTrainings {
    pool: SqlitePool,
}

#[async_trait]
impl BusyIntervalSource for SqliteIndividualTrainings {
    fn source_name(&self) -> &'static str {
        "individual_trainings"
    }

    async fn fetch_busy_intervals(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<OwnedInterval>, DatabaseError> {
        if window_start >= window_end {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            r"
            SELECT id, trainer_id, location_id, starts_at_ns, ends_at_ns
            FROM individual_trainings
            WHERE status = $1 AND starts_at_ns < $2 AND ends_at_ns > $3
            ORDER BY starts_at_ns, id
            ",
        )
        .bind(TrainingStatus::Accepted.as_str())
        .bind(window_nanos(window_end))
        .bind(window_nanos(window_start))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("fetch individual trainings", e))?;

        let mut busy = Vec::with_capacity(rows.len() * 2);
        for row in &rows {
            let training_id: String = column(row, "id")?;
            let interval = row_interval(row, &training_id)?;
            let trainer_id: String = column(row, "trainer_id")?;

            busy.push(OwnedInterval::trainer(
                interval,
                trainer_id,
                training_id.as_str(),
                TrainingKind::Individual,
            ));
            if let Some(location_id) = column::<Option<String>>(row, "location_id")? {
                busy.push(OwnedInterval::location(
                    interval,
                    location_id,
                    training_id.as_str(),
                    TrainingKind::Individual,
                ));
            }
        }
        Ok(busy)
    }
}

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, DatabaseError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| DatabaseError::query(&format!("read column {name}"), e))
}

/// Column value for a training bound
fn stored_nanos(at: DateTime<Utc>, training_id: &str) -> Result<i64, DatabaseError> {
    at.timestamp_nanos_opt()
        .ok_or_else(|| DatabaseError::UnstorableRecord {
            training_id: training_id.to_owned(),
            reason: format!("{at} is outside the storable range"),
        })
}

/// Window bound clamped into the column range; stored rows always lie inside it
fn window_nanos(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt()
        .unwrap_or(if at.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

/// Rebuild the interval from nanosecond columns, rejecting broken rows
fn row_interval(row: &SqliteRow, training_id: &str) -> Result<TimeInterval, DatabaseError> {
    let start = DateTime::<Utc>::from_timestamp_nanos(column(row, "starts_at_ns")?);
    let end = DateTime::<Utc>::from_timestamp_nanos(column(row, "ends_at_ns")?);
    Interval::new(start, end).map_err(|e| DatabaseError::CorruptRecord {
        training_id: training_id.to_owned(),
        reason: e.to_string(),
    })
}
