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

//! Operations backing the administration panel.
//!
//! The panel is expected to be reachable by staff only, so these operations do not take any
//! credentials.

use crate::db;
use crate::driver::Driver;
use crate::model::{Film, FilmId, FilmName, Review, ReviewId, User, UserId, UserReview, Year};
use filmrating_core::db::DbError;
use filmrating_core::driver::{DriverError, DriverResult};
use log::info;
use std::fmt;

/// Converts `e` into a driver error, replacing a generic `NotFound` with a message that names the
/// missing `what` identified by `id`.
fn not_found_as<T: fmt::Display>(e: DbError, what: &str, id: T) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(format!("{} with id {} was not found", what, id)),
        e => e.into(),
    }
}

impl Driver {
    /// Counts the films and reviews in the database, in that order.
    pub(crate) async fn totals(self) -> DriverResult<(u64, u64)> {
        let totals = db::count_films_and_reviews(&mut self.db.ex().await?).await?;
        Ok(totals)
    }

    /// Lists all registered users.
    pub(crate) async fn list_users(self) -> DriverResult<Vec<User>> {
        let users = db::list_users(&mut self.db.ex().await?).await?;
        Ok(users)
    }

    /// Gets the user identified by `user_id` and all the reviews they wrote.
    pub(crate) async fn user_reviews(
        self,
        user_id: UserId,
    ) -> DriverResult<(User, Vec<UserReview>)> {
        let mut tx = self.db.begin().await?;
        let user = db::get_user(tx.ex(), user_id)
            .await
            .map_err(|e| not_found_as(e, "User", user_id))?;
        let reviews = db::list_user_reviews(tx.ex(), user_id).await?;
        tx.commit().await?;
        Ok((user, reviews))
    }

    /// Gets the review identified by `review_id`.
    pub(crate) async fn get_review(self, review_id: ReviewId) -> DriverResult<Review> {
        db::get_review(&mut self.db.ex().await?, review_id)
            .await
            .map_err(|e| not_found_as(e, "Review", review_id))
    }

    /// Replaces the text of the review identified by `review_id` with `text`.
    ///
    /// An empty `text` removes the text from the review.
    pub(crate) async fn set_review_text(
        self,
        review_id: ReviewId,
        text: String,
    ) -> DriverResult<Review> {
        let text = if text.is_empty() { None } else { Some(text) };

        let mut tx = self.db.begin_write().await?;
        db::set_review_text(tx.ex(), review_id, text.as_deref())
            .await
            .map_err(|e| not_found_as(e, "Review", review_id))?;
        let review = db::get_review(tx.ex(), review_id).await?;
        tx.commit().await?;

        info!("Updated text of review {}", review_id);
        Ok(review)
    }

    /// Lists all films along with their statistics.
    pub(crate) async fn list_films(self) -> DriverResult<Vec<Film>> {
        let films = db::list_films(&mut self.db.ex().await?).await?;
        Ok(films)
    }

    /// Adds a new film to the catalog.
    pub(crate) async fn create_film(self, name: FilmName, year: Year) -> DriverResult<Film> {
        let mut tx = self.db.begin_write().await?;
        let film_id = db::create_film(tx.ex(), &name, year).await?;
        let film = db::get_film(tx.ex(), film_id).await?;
        tx.commit().await?;

        info!("Created film {} ({}) with id {}", name.as_str(), year, film_id);
        Ok(film)
    }

    /// Gets the film identified by `film_id`.
    pub(crate) async fn get_film(self, film_id: FilmId) -> DriverResult<Film> {
        db::get_film(&mut self.db.ex().await?, film_id)
            .await
            .map_err(|e| not_found_as(e, "Film", film_id))
    }

    /// Replaces the name and year of the film identified by `film_id`.
    pub(crate) async fn update_film(
        self,
        film_id: FilmId,
        name: FilmName,
        year: Year,
    ) -> DriverResult<Film> {
        let mut tx = self.db.begin_write().await?;
        db::update_film(tx.ex(), film_id, &name, year)
            .await
            .map_err(|e| not_found_as(e, "Film", film_id))?;
        let film = db::get_film(tx.ex(), film_id).await?;
        tx.commit().await?;

        info!("Updated film {} to {} ({})", film_id, name.as_str(), year);
        Ok(film)
    }
}
