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

//! API to rate a film.

use crate::driver::Driver;
use crate::model::FilmId;
use crate::rest::REALM;
use crate::rest::httputils::get_basic_auth;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use filmrating_core::rest::{JsonBody, QueryParams, RestError};
use serde::{Deserialize, Serialize};

/// Query parameters identifying the film to rate.
#[derive(Deserialize, Serialize)]
pub(crate) struct RateQuery {
    /// Identifier of the film to rate.
    pub(crate) film_id: i64,
}

/// Message sent to the server to rate a film.
#[derive(Deserialize, Serialize)]
pub(crate) struct RateRequest {
    /// Rating to give to the film.
    pub(crate) rating: i64,

    /// Optional review text.
    #[serde(default)]
    pub(crate) text: Option<String>,
}

/// Message returned by the server after recording a rating.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct RateResponse {
    /// Rating that was recorded.
    pub(crate) rating: u8,

    /// Review text that was recorded, if any.
    pub(crate) text: Option<String>,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    QueryParams(query): QueryParams<RateQuery>,
    JsonBody(request): JsonBody<RateRequest>,
) -> Result<(http::StatusCode, Json<RateResponse>), RestError> {
    let (login, password) = get_basic_auth(&headers, REALM)?;

    let review = driver
        .rate(login, password, FilmId::new(query.film_id), request.rating, request.text)
        .await?;

    let response = RateResponse { rating: review.rating().as_u8(), text: review.text().clone() };
    Ok((http::StatusCode::CREATED, Json(response)))
}
