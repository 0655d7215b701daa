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

//! Test utilities for the administration panel.

use crate::admin::app;
use crate::db;
use crate::driver::Driver;
use crate::model::{Film, FilmId, Review, ReviewId};
use axum::Router;
use filmrating_core::clocks::SystemClock;
use filmrating_core::db::Db;
use std::sync::Arc;
use time::macros::datetime;

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
        let driver = Driver::new(db.clone(), Arc::new(SystemClock::default()));
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

    /// Gets a review by directly querying the backing database.
    pub(crate) async fn get_review(&self, id: i64) -> Review {
        db::get_review(&mut self.db.ex().await.unwrap(), ReviewId::new(id)).await.unwrap()
    }

    /// Gets a film by directly querying the backing database.
    pub(crate) async fn get_film(&self, id: i64) -> Film {
        db::get_film(&mut self.db.ex().await.unwrap(), FilmId::new(id)).await.unwrap()
    }
}
