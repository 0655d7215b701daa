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

//! Test utilities for the business logic layer.

use crate::db;
use crate::driver::Driver;
use crate::model::passwords::testutils::test_dummy2_hash;
use crate::model::{Login, User};
use filmrating_core::clocks::Clock;
use filmrating_core::clocks::testutils::SettableClock;
use filmrating_core::db::sqlite::testutils::FileDb;
use filmrating_core::db::{Db, Executor};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

pub(crate) use crate::model::passwords::testutils::{TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD};

/// State of a running test.
pub(crate) struct TestContext {
    /// Database backing the driver under test.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock used by the driver under test.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,

    /// Backing file of the database, if not in memory.  Must outlive the fields above.
    _file: Option<FileDb>,
}

impl TestContext {
    /// Initializes a driver backed by the empty database `db`.
    async fn setup_with(db: Arc<dyn Db + Send + Sync>, file: Option<FileDb>) -> Self {
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2023-06-10 18:30:15 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver, _file: file }
    }

    /// Initializes a driver backed by an empty in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(filmrating_core::db::sqlite::testutils::setup().await);
        Self::setup_with(db, None).await
    }

    /// Initializes a driver backed by an empty database stored in a temporary file.
    ///
    /// Needed by tests that run transactions concurrently.
    pub(crate) async fn setup_file() -> Self {
        let file = FileDb::new();
        let db = Arc::new(file.connect().await);
        Self::setup_with(db, Some(file)).await
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver under test.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the clock used by the driver under test.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Gets the time the clock currently reports.
    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Creates the `test_dummy2` user with a precomputed password hash.
    pub(crate) async fn create_test_dummy2(&self) -> User {
        let login = Login::new(TEST_DUMMY2_LOGIN).unwrap();
        let hash = test_dummy2_hash();
        let mut ex = self.ex().await;
        db::create_user(&mut ex, &login, &hash).await.unwrap();
        db::get_user_by_login(&mut ex, &login).await.unwrap()
    }

    /// Creates a user named `login` that has the same password as `test_dummy2`.
    pub(crate) async fn create_user_with_dummy2_password(&self, login: &'static str) -> User {
        let login = Login::new(login).unwrap();
        let mut ex = self.ex().await;
        db::create_user(&mut ex, &login, &test_dummy2_hash()).await.unwrap();
        db::get_user_by_login(&mut ex, &login).await.unwrap()
    }

    /// Populates the database with the initial data set.
    pub(crate) async fn seed(&self) {
        db::insert_seed_data(&mut self.ex().await, self.now()).await.unwrap();
    }
}
