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

//! Form to edit a film.

use crate::admin::html;
use crate::driver::Driver;
use crate::model::FilmId;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, PathParams, RestError};

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(film_id): PathParams<i64>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let film = driver.get_film(FilmId::new(film_id)).await?;

    let mut content = html::film_form(
        &format!("/films/{}", film.id()),
        film.name().as_str(),
        &film.year().to_string(),
    );
    content.push_str(&format!(
        "<p>Average rating: {}; ratings: {}; reviews: {}</p>\n",
        html::format_average(*film.average_rating()),
        film.rating_count(),
        film.review_count()
    ));
    Ok(html::page(&format!("Film {}", film.id()), &content))
}
