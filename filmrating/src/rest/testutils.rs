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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::Login;
use crate::model::passwords::testutils::test_dummy2_hash;
use crate::rest::app;
use axum::Router;
use filmrating_core::clocks::testutils::MonotonicClock;
use filmrating_core::db::{Db, DbError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use time::macros::datetime;

pub(crate) use crate::model::passwords::testutils::{TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD};

/// Client-side view of the film statistics returned by the API.
#[derive(Debug, Deserialize, PartialEq)]
pub(crate) struct FilmStatsResponse {
    /// Name of the film.
    pub(crate) name: String,

    /// Mean of all ratings given to the film.
    pub(crate) average_rating: f64,

    /// Number of ratings given to the film.
    pub(crate) ratings_count: u64,

    /// Number of ratings given to the film that came with a written review.
    pub(crate) reviews_count: u64,
}

/// State of a running test.
pub(crate) struct TestContext {
    /// Database backing the app.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app backed by an empty in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(filmrating_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(MonotonicClock::new(
            datetime!(2023-06-10 18:30:15 UTC),
            Duration::from_secs(1),
        ));
        let driver = Driver::new(db.clone(), clock);
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Populates the database with the initial data set.
    pub(crate) async fn seed(&self) {
        let now = datetime!(2023-06-01 00:00:00 UTC);
        db::insert_seed_data(&mut self.db.ex().await.unwrap(), now).await.unwrap();
    }

    /// Creates the `test_dummy2` user by directly modifying the backing database.
    pub(crate) async fn create_test_dummy2(&self) {
        let login = Login::new(TEST_DUMMY2_LOGIN).unwrap();
        db::create_user(&mut self.db.ex().await.unwrap(), &login, &test_dummy2_hash())
            .await
            .unwrap();
    }

    /// Checks if the user with `login` exists by directly querying the backing database.
    pub(crate) async fn user_exists(&self, login: &str) -> bool {
        let login = match Login::new(login) {
            Ok(login) => login,
            Err(_) => return false,
        };
        match db::get_user_by_login(&mut self.db.ex().await.unwrap(), &login).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Counts the reviews in the database.
    pub(crate) async fn count_reviews(&self) -> u64 {
        let (_films, reviews) =
            db::count_films_and_reviews(&mut self.db.ex().await.unwrap()).await.unwrap();
        reviews
    }
}
