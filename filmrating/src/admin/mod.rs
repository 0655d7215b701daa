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

//! HTML administration panel of the film rating service.

use crate::driver::Driver;
use axum::Router;

mod film_get;
mod film_new_get;
mod film_post;
mod films_get;
mod films_post;
mod html;
mod index_get;
mod review_get;
mod review_post;
#[cfg(test)]
mod testutils;
mod user_get;
mod users_get;

/// Creates the router for the administration panel.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(index_get::handler))
        .route("/users", get(users_get::handler))
        .route("/users/:user_id", get(user_get::handler))
        .route("/reviews/:review_id", get(review_get::handler).post(review_post::handler))
        .route("/films", get(films_get::handler).post(films_post::handler))
        .route("/films/new", get(film_new_get::handler))
        .route("/films/:film_id", get(film_get::handler).post(film_post::handler))
        .with_state(driver)
}
