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

//! Operations to rate films.

use crate::db;
use crate::driver::Driver;
use crate::model::{FilmId, Login, Password, Rating, Review};
use filmrating_core::clocks::Clock;
use filmrating_core::db::DbError;
use filmrating_core::driver::{DriverError, DriverResult};
use log::info;

impl Driver {
    /// Records the `rating` and optional review `text` that the authenticated user gives to the
    /// film identified by `film_id`.
    ///
    /// Users can rate a film only once.  Later attempts fail and leave the first review intact.
    /// The `rating` is only validated once the credentials have been accepted.
    pub(crate) async fn rate(
        self,
        login: Login,
        password: Password,
        film_id: FilmId,
        rating: i64,
        text: Option<String>,
    ) -> DriverResult<Review> {
        let mut tx = self.db.begin_write().await?;
        let user = self.authenticate(&mut tx, login, password).await?;
        let rating = Rating::new(rating)?;

        let now = self.clock.now_utc();
        let review_id =
            match db::create_review(tx.ex(), film_id, *user.id(), rating, text.as_deref(), now)
                .await
            {
                Ok(id) => id,
                Err(DbError::AlreadyExists) => {
                    return Err(DriverError::AlreadyExists(format!(
                        "Film with id {} was already rated by this user",
                        film_id
                    )));
                }
                Err(DbError::NotFound) => {
                    return Err(DriverError::NotFound(format!(
                        "Film with id {} was not found",
                        film_id
                    )));
                }
                Err(e) => return Err(e.into()),
            };
        let review = db::get_review(tx.ex(), review_id).await?;
        tx.commit().await?;

        info!(
            "User {} rated film {} with {}",
            user.login().as_str(),
            film_id,
            review.rating().as_u8()
        );
        Ok(review)
    }
}
