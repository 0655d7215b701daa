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

//! Form to edit the text of a review.

use crate::admin::html;
use crate::driver::Driver;
use crate::model::ReviewId;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, PathParams, RestError};
use filmrating_core::template;

/// Details of the review and the form to edit its text.
const REVIEW_TEMPLATE: &str = r#"<p>Rating: %rating%</p>

<form method="post" action="/reviews/%review_id%">
<p><textarea name="review_text" rows="5" cols="60">%text%</textarea></p>
<p><input type="submit" value="Save"></p>
</form>

<p><a href="/users/%user_id%">Back to the author's reviews</a></p>
"#;

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(review_id): PathParams<i64>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let review = driver.get_review(ReviewId::new(review_id)).await?;

    let text = review.text().as_deref().map(template::escape_html).unwrap_or_default();
    let content = template::apply(
        REVIEW_TEMPLATE,
        &[
            ("rating", &review.rating().as_u8().to_string()),
            ("review_id", &review.id().to_string()),
            ("text", &text),
            ("user_id", &review.user_id().to_string()),
        ],
    );
    Ok(html::page(&format!("Review {}", review.id()), &content))
}
