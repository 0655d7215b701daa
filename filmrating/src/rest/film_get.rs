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

//! API to get the rating statistics of a film.

use crate::driver::Driver;
use crate::model::{FilmId, FilmStats};
use crate::rest::REALM;
use crate::rest::httputils::get_basic_auth;
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use filmrating_core::rest::{EmptyBody, PathParams, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    PathParams(film_id): PathParams<i64>,
    _: EmptyBody,
) -> Result<Json<FilmStats>, RestError> {
    let (login, password) = get_basic_auth(&headers, REALM)?;

    let stats = driver.film_stats(login, password, FilmId::new(film_id)).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use filmrating_core::rest::testutils::OneShotBuilder;
    use filmrating_core::test_payload_must_be_empty;

    fn route(film_id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/film/{}", film_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_test_dummy2().await;
        context.seed().await;

        let response = OneShotBuilder::new(context.app(), route("2"))
            .with_basic_auth(TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD)
            .send_empty()
            .await
            .expect_json::<FilmStatsResponse>()
            .await;
        assert_eq!(
            FilmStatsResponse {
                name: "La Grande Vadrouille".to_owned(),
                average_rating: 2.0,
                ratings_count: 1,
                reviews_count: 1,
            },
            response
        );
    }

    #[tokio::test]
    async fn test_no_reviews() {
        let context = TestContext::setup().await;
        context.create_test_dummy2().await;
        context.seed().await;

        OneShotBuilder::new(context.into_app(), route("6"))
            .with_basic_auth(TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Reviews for the film with id 6 was not found$")
            .await;
    }

    #[tokio::test]
    async fn test_no_film() {
        let context = TestContext::setup().await;
        context.create_test_dummy2().await;

        OneShotBuilder::new(context.into_app(), route("42"))
            .with_basic_auth(TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Film with id 42 was not found$")
            .await;
    }

    #[tokio::test]
    async fn test_bad_film_id() {
        let context = TestContext::setup().await;
        context.create_test_dummy2().await;

        OneShotBuilder::new(context.into_app(), route("abc"))
            .with_basic_auth(TEST_DUMMY2_LOGIN, TEST_DUMMY2_PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Cannot parse")
            .await;
    }

    #[tokio::test]
    async fn test_bad_credentials_look_the_same() {
        let context = TestContext::setup().await;
        context.create_test_dummy2().await;
        context.seed().await;

        let unknown_login = OneShotBuilder::new(context.app(), route("1"))
            .with_basic_auth("unknown", TEST_DUMMY2_PASSWORD)
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_body_as_text()
            .await;
        let wrong_password = OneShotBuilder::new(context.app(), route("1"))
            .with_basic_auth(TEST_DUMMY2_LOGIN, "wrong")
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_body_as_text()
            .await;
        assert_eq!(r#"{"detail":"Incorrect login or password"}"#, unknown_login);
        assert_eq!(unknown_login, wrong_password);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("1"));
}
