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

//! API to search for films.

use crate::driver::Driver;
use crate::model::{FilmSummary, Year};
use crate::rest::REALM;
use crate::rest::httputils::get_basic_auth;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use filmrating_core::rest::{EmptyBody, QueryParams, RestError};
use serde::{Deserialize, Serialize};

/// Lowest film identifier to return when the query does not specify one.
const DEFAULT_MIN_ID: i64 = 0;

/// Highest film identifier to return when the query does not specify one.
const DEFAULT_MAX_ID: i64 = 5;

/// Query parameters to filter the search.
#[derive(Default, Deserialize, Serialize)]
pub(crate) struct SearchQuery {
    /// Substring that the film name must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name_contains: Option<String>,

    /// Release year that the film must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) year: Option<i64>,

    /// Lowest film identifier to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) min_id: Option<i64>,

    /// Highest film identifier to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_id: Option<i64>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    QueryParams(query): QueryParams<SearchQuery>,
    _: EmptyBody,
) -> Result<Json<Vec<FilmSummary>>, RestError> {
    let (login, password) = get_basic_auth(&headers, REALM)?;
    let year = query.year.map(Year::new).transpose()?;

    let films = driver
        .search_films(
            login,
            password,
            query.name_contains,
            year,
            query.min_id.unwrap_or(DEFAULT_MIN_ID),
            query.max_id.unwrap_or(DEFAULT_MAX_ID),
        )
        .await?;
    Ok(Json(films))
}
