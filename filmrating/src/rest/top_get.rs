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

//! API to get the best rated films.

use crate::driver::Driver;
use crate::model::FilmSummary;
use crate::rest::REALM;
use crate::rest::httputils::get_basic_auth;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use filmrating_core::rest::{EmptyBody, QueryParams, RestError};
use serde::{Deserialize, Serialize};

/// Lowest average rating to return when the query does not specify one.
const DEFAULT_MIN_RATING: i64 = 1;

/// Highest average rating to return when the query does not specify one.
const DEFAULT_MAX_RATING: i64 = 10;

/// Query parameters to restrict the ranking.
#[derive(Default, Deserialize, Serialize)]
pub(crate) struct TopQuery {
    /// Lowest average rating to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) min_rating: Option<i64>,

    /// Highest average rating to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_rating: Option<i64>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    QueryParams(query): QueryParams<TopQuery>,
    _: EmptyBody,
) -> Result<Json<Vec<FilmSummary>>, RestError> {
    let (login, password) = get_basic_auth(&headers, REALM)?;

    let films = driver
        .top_films(
            login,
            password,
            query.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            query.max_rating.unwrap_or(DEFAULT_MAX_RATING),
        )
        .await?;
    Ok(Json(films))
}
