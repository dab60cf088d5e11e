// ABOUTME: Database configuration types for the SQLite training store
// ABOUTME: Parses DATABASE_URL and pool sizing from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{database, env_config};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// Accepts `sqlite:<path>`, `sqlite::memory:`, or a bare file path.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input or a non-`SQLite` scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::config("Database URL is empty"));
        }
        if let Some(path_str) = trimmed.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            return if path_str == ":memory:" {
                Ok(Self::Memory)
            } else if path_str.is_empty() {
                Err(AppError::config("SQLite URL is missing a file path"))
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            };
        }
        if trimmed.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {trimmed}"
            )));
        }
        // Fallback: treat as SQLite file path
        Ok(Self::SQLite {
            path: PathBuf::from(trimmed),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/gymops.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection and management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Maximum pooled connections for file-backed databases
    pub max_connections: u32,
    /// Create tables on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: database::DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: DatabaseUrl::Memory,
            max_connections: database::MEMORY_MAX_CONNECTIONS,
            auto_migrate: true,
        }
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(&env_var_or(
            env_config::DATABASE_URL,
            database::DEFAULT_DATABASE_URL,
        ))?;

        let max_connections: u32 = env_var_or(
            env_config::DATABASE_MAX_CONNECTIONS,
            &database::DEFAULT_MAX_CONNECTIONS.to_string(),
        )
        .parse()
        .map_err(|e| {
            AppError::config(format!(
                "Invalid {} value: {e}",
                env_config::DATABASE_MAX_CONNECTIONS
            ))
        })?;
        if max_connections == 0 {
            return Err(AppError::config(format!(
                "{} must be at least 1",
                env_config::DATABASE_MAX_CONNECTIONS
            )));
        }

        let auto_migrate = env_var_or(env_config::AUTO_MIGRATE, "true")
            .parse()
            .map_err(|e| AppError::config(format!("Invalid AUTO_MIGRATE value: {e}")))?;

        Ok(Self {
            url,
            max_connections,
            auto_migrate,
        })
    }

    /// Pool size to actually open
    ///
    /// Every connection to `sqlite::memory:` gets its own empty database, so
    /// in-memory pools are pinned to a single connection.
    #[must_use]
    pub const fn effective_max_connections(&self) -> u32 {
        if self.url.is_memory() {
            database::MEMORY_MAX_CONNECTIONS
        } else {
            self.max_connections
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/gym.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/gym.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/var/lib/gym.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/var/lib/gym.db")
            }
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/gym").is_err());
        assert!(DatabaseUrl::parse_url("   ").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_memory_pool_is_pinned_to_one_connection() {
        let config = DatabaseConfig {
            max_connections: 8,
            ..DatabaseConfig::in_memory()
        };
        assert_eq!(config.effective_max_connections(), 1);

        let file = DatabaseConfig {
            max_connections: 8,
            ..DatabaseConfig::default()
        };
        assert_eq!(file.effective_max_connections(), 8);
    }
}
