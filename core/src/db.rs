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

//! Generic abstraction to access the relational database.
//!
//! The `Db` trait plays the role of a session factory: services receive an instance of it and use
//! it to obtain either a direct `Executor` or a transactional `TxExecutor` for every logical
//! operation.  A `TxExecutor` is a unit of work: changes made through it only become visible once
//! `commit` is called, and dropping it on any other exit path (early returns via `?`, panics)
//! rolls the transaction back and releases the connection to the pool.

use crate::model::ModelError;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection};
use sqlx::Transaction;

pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("Already exists")]
    AlreadyExists,

    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// A database executor that queries can be issued against.
///
/// Note that this can wrap a connection that talks directly to the pool or an open transaction.
#[derive(Debug)]
pub enum Executor {
    /// An executor backed by a pooled connection.  Operations issued via this executor are not
    /// grouped in a transaction.
    PoolExec(PoolConnection<Sqlite>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Sqlite>),
}

impl Executor {
    /// Returns the raw connection to pass to `sqlx` queries.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        match self {
            Executor::PoolExec(conn) => &mut **conn,
            Executor::TxExec(tx) => &mut **tx,
        }
    }
}

/// A wrapper for a database executor backed by an open transaction.
#[derive(Debug)]
pub struct TxExecutor(Executor);

impl TxExecutor {
    /// Returns the executor wrapped by this transaction.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    pub fn ex(&mut self) -> &mut Executor {
        &mut self.0
    }

    /// Commits the transaction.
    pub async fn commit(self) -> DbResult<()> {
        match self.0 {
            Executor::PoolExec(_) => unreachable!("Transactions are always backed by TxExec"),
            Executor::TxExec(tx) => tx.commit().await.map_err(sqlite::map_sqlx_error),
        }
    }
}

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Obtains an executor for direct access to the pool.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    async fn ex(&self) -> DbResult<Executor>;

    /// Begins a transaction.
    ///
    /// It is the responsibility of the caller to call `commit` on the returned executor.  Otherwise
    /// the transaction is rolled back on drop.
    async fn begin(&self) -> DbResult<TxExecutor>;

    /// Begins a transaction that will modify the database.
    ///
    /// The write lock is taken upfront so that concurrent writers queue behind each other instead
    /// of failing when upgrading a read lock.  Same commit and rollback rules as `begin`.
    async fn begin_write(&self) -> DbResult<TxExecutor>;

    /// Closes the connection pool, waiting for all outstanding connections to be released.
    async fn close(&self);
}

/// Macros to help instantiate tests against a database.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    pub use paste::paste;

    /// Instantiates the `module::name` test for the database configured by `setup`.
    ///
    /// The `extra` metadata parameter can be used to tag the generated tests.
    #[macro_export]
    macro_rules! generate_one_test [
        ( $name:ident, $setup:expr, $module:path $(, #[$extra:meta] )? ) => {
            #[tokio::test]
            $(#[$extra])?
            async fn $name() {
                $crate::db::testutils::paste! {
                    $module :: [< $name >]($setup).await;
                }
            }
        }
    ];

    pub use generate_one_test;

    /// Instantiates a collection of tests for a specific database.
    ///
    /// The database to run the tests against is determined by the `setup` expression, which needs
    /// to return a database object.  The returned database should also have been initialized with
    /// the desired schema.
    ///
    /// The `extra` metadata parameter can be used to tag the generated tests.
    #[macro_export]
    macro_rules! generate_tests [
        ( #[$extra:meta], $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module, #[$extra]);
            )+
        };

        ( $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module);
            )+
        };
    ];

    pub use generate_tests;
}
