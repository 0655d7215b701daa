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

//! JSON API of the film rating service.

use crate::driver::Driver;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

mod film_get;
mod film_search_get;
mod httputils;
mod rate_post;
mod register_post;
#[cfg(test)]
mod testutils;
mod top_get;

/// Realm announced to clients that fail to provide Basic credentials.
pub(crate) const REALM: &str = "filmrating";

/// Creates the router for the JSON API.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/register", post(register_post::handler))
        .route("/rate", post(rate_post::handler))
        .route("/film_search", get(film_search_get::handler))
        .route("/film/:film_id", get(film_get::handler))
        .route("/top", get(top_get::handler))
        .layer(cors)
        .with_state(driver)
}
