// Film rating
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use async_trait::async_trait;
use log::warn;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// How long a connection waits for a lock held by another connection before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a new connection pool to the database identified by `conn_str`.
///
/// Foreign keys are always enforced and the database file is created if it does not exist yet.
/// File-backed databases use write-ahead logging so that readers do not block the writer.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let opts = SqliteConnectOptions::from_str(conn_str)
        .map_err(map_sqlx_error)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePool::connect_with(opts).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: SqlitePool,
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(Executor::PoolExec(conn))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::TxExec(tx)))
    }

    async fn begin_write(&self) -> DbResult<TxExecutor> {
        // A deferred transaction that reads before writing cannot upgrade its lock while another
        // writer is active, and SQLite fails that upgrade right away without waiting.
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::TxExec(tx)))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(ex: &mut Executor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(ex.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Converts a timestamp as extracted from the database into an `OffsetDateTime`.
///
/// The input parameters must both be positive.  The reason why their types are `i64`s instead of
/// the `u64` you would expect is because the numeric types exposed by sqlx and SQLite are all
/// signed.  We could simply cast the types and accept negative representations in the database,
/// but that would pose difficulties when attempting to compare timestamps via relation operators
/// in SQL queries.
pub fn build_timestamp(timestamp_sec: i64, timestamp_nsec: i64) -> DbResult<OffsetDateTime> {
    if timestamp_sec < 0 || timestamp_nsec < 0 {
        return Err(DbError::DataIntegrityError(format!(
            "Timestamp cannot have negative quantities: sec={}, nsec={}",
            timestamp_sec, timestamp_nsec
        )));
    }

    match OffsetDateTime::from_unix_timestamp_nanos(
        (i128::from(timestamp_sec) * 1_000_000_000) + (i128::from(timestamp_nsec)),
    ) {
        Ok(timestamp) => Ok(timestamp),
        Err(e) => Err(DbError::DataIntegrityError(format!("Invalid timestamp: {}", e))),
    }
}

/// Converts a timestamp into the seconds and nanoseconds pair needed by the database.
///
/// The timestamp must be positive because `build_timestamp` also expects it to be positive when
/// recovering its values from the database.
pub fn unpack_timestamp(ts: OffsetDateTime) -> (i64, i64) {
    let nanos = ts.unix_timestamp_nanos();
    assert!(nanos >= 0, "Cannot store a negative timestamp into the database");
    let sec = i64::try_from(nanos / 1_000_000_000).expect("Must have fit");
    let nsec = i64::try_from(nanos % 1_000_000_000).expect("Must have fit");
    (sec, nsec)
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        connect(":memory:").await.unwrap()
    }

    /// A database stored in a file that is deleted when this value is dropped.
    ///
    /// In-memory databases use shared-cache locking, which behaves differently from the file
    /// locks that a real deployment sees, so tests that exercise concurrent transactions need this.
    pub struct FileDb {
        /// Directory holding the database and its journal files.
        dir: std::path::PathBuf,
    }

    impl FileDb {
        /// Creates a fresh, uniquely-named location for a database.
        pub fn new() -> Self {
            let dir = std::env::temp_dir().join(format!(
                "filmrating-db-{}-{:016x}",
                std::process::id(),
                rand::random::<u64>()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        /// Returns the connection string for the database.
        pub fn conn_str(&self) -> String {
            format!("sqlite://{}", self.dir.join("test.db").display())
        }

        /// Opens a connection pool to the database.
        pub async fn connect(&self) -> SqliteDb {
            let _can_fail = env_logger::builder().is_test(true).try_init();
            connect(&self.conn_str()).await.unwrap()
        }
    }

    impl Drop for FileDb {
        fn drop(&mut self) {
            let _can_fail = std::fs::remove_dir_all(&self.dir);
        }
    }
}
