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

//! Form submission to edit the text of a review.

use crate::driver::Driver;
use crate::model::ReviewId;
use axum::extract::State;
use axum::response::Redirect;
use filmrating_core::rest::{FormBody, PathParams, RestError};
use serde::{Deserialize, Serialize};

/// Contents of the form to edit a review.
#[derive(Deserialize, Serialize)]
pub(crate) struct ReviewForm {
    /// New text for the review.  Empty to remove it.
    pub(crate) review_text: String,
}

/// POST handler for this form.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(review_id): PathParams<i64>,
    FormBody(form): FormBody<ReviewForm>,
) -> Result<Redirect, RestError> {
    let review = driver.set_review_text(ReviewId::new(review_id), form.review_text).await?;
    Ok(Redirect::to(&format!("/users/{}", review.user_id())))
}
