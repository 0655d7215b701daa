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

//! Form submission to edit a film.

use crate::admin::films_post::FilmForm;
use crate::driver::Driver;
use crate::model::FilmId;
use axum::extract::State;
use axum::response::Redirect;
use filmrating_core::rest::{FormBody, PathParams, RestError};

/// POST handler for this form.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(film_id): PathParams<i64>,
    FormBody(form): FormBody<FilmForm>,
) -> Result<Redirect, RestError> {
    let (name, year) = form.into_parts()?;
    driver.update_film(FilmId::new(film_id), name, year).await?;
    Ok(Redirect::to("/films"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::testutils::*;
    use axum::http;
    use filmrating_core::rest::testutils::OneShotBuilder;
    use filmrating_core::test_payload_must_be_form;

    fn route(film_id: &str) -> (http::Method, String) {
        (http::Method::POST, format!("/films/{}", film_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.seed().await;

        OneShotBuilder::new(context.app(), route("6"))
            .send_form(FilmForm { name: "Forrest Gump".to_owned(), year: 1994 })
            .await
            .expect_status(http::StatusCode::SEE_OTHER)
            .take_response()
            .await;

        let film = context.get_film(6).await;
        assert_eq!("Forrest Gump", film.name().as_str());
        assert_eq!(1994, film.year().as_i32());
    }

    #[tokio::test]
    async fn test_keeps_reviews() {
        let context = TestContext::setup().await;
        context.seed().await;

        OneShotBuilder::new(context.app(), route("1"))
            .send_form(FilmForm { name: "L'aile ou la cuisse".to_owned(), year: 1976 })
            .await
            .expect_status(http::StatusCode::SEE_OTHER)
            .take_response()
            .await;

        let film = context.get_film(1).await;
        assert_eq!("L'aile ou la cuisse", film.name().as_str());
        assert_eq!(Some(8.0), *film.average_rating());
        assert_eq!(1, *film.rating_count());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("3"))
            .send_form(FilmForm { name: "Ghost".to_owned(), year: 2000 })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Film with id 3 was not found$")
            .await;
    }

    test_payload_must_be_form!(TestContext::setup().await.into_app(), route("1"));
}
