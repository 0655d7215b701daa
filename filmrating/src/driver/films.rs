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

//! Read-only queries over the film catalog.

use crate::db;
use crate::driver::Driver;
use crate::model::{FilmId, FilmStats, FilmSummary, Login, Password, Year};
use filmrating_core::db::DbError;
use filmrating_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Finds films with an identifier within `[min_id, max_id]` that were released in `year` and
    /// whose name contains `name_contains`, if those filters are given.
    pub(crate) async fn search_films(
        self,
        login: Login,
        password: Password,
        name_contains: Option<String>,
        year: Option<Year>,
        min_id: i64,
        max_id: i64,
    ) -> DriverResult<Vec<FilmSummary>> {
        let mut tx = self.db.begin().await?;
        self.authenticate(&mut tx, login, password).await?;
        let films =
            db::search_films(tx.ex(), name_contains.as_deref(), year, min_id, max_id).await?;
        tx.commit().await?;
        Ok(films.into_iter().map(|f| f.into_summary()).collect())
    }

    /// Finds the rated films whose average rating is within `[min_rating, max_rating]`, best
    /// first.
    pub(crate) async fn top_films(
        self,
        login: Login,
        password: Password,
        min_rating: i64,
        max_rating: i64,
    ) -> DriverResult<Vec<FilmSummary>> {
        let mut tx = self.db.begin().await?;
        self.authenticate(&mut tx, login, password).await?;
        let films = db::top_films(tx.ex(), min_rating, max_rating).await?;
        tx.commit().await?;
        Ok(films.into_iter().map(|f| f.into_summary()).collect())
    }

    /// Gets the rating statistics of the film identified by `film_id`.
    pub(crate) async fn film_stats(
        self,
        login: Login,
        password: Password,
        film_id: FilmId,
    ) -> DriverResult<FilmStats> {
        let mut tx = self.db.begin().await?;
        self.authenticate(&mut tx, login, password).await?;
        let film = match db::get_film(tx.ex(), film_id).await {
            Ok(film) => film,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!(
                    "Film with id {} was not found",
                    film_id
                )));
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        film.into_stats().ok_or_else(|| {
            DriverError::NotFound(format!("Reviews for the film with id {} was not found", film_id))
        })
    }
}
