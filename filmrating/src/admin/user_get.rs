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

//! Page listing the reviews of a user.

use crate::admin::html;
use crate::driver::Driver;
use crate::model::UserId;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, PathParams, RestError};
use filmrating_core::template;

/// One row in the table of reviews.
const REVIEW_TEMPLATE: &str = r#"<tr>
<td>%film_name%</td>
<td>%film_year%</td>
<td>%text%</td>
<td>%rating%</td>
<td><a href="/reviews/%review_id%">Edit</a></td>
</tr>
"#;

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(user_id): PathParams<i64>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let (user, reviews) = driver.user_reviews(UserId::new(user_id)).await?;

    let mut content = String::from(
        "<table>\n<tr><th>Film</th><th>Year</th><th>Text</th><th>Rating</th><th></th></tr>\n",
    );
    for review in reviews {
        let text = review.text().as_deref().map(template::escape_html).unwrap_or_default();
        content.push_str(&template::apply(
            REVIEW_TEMPLATE,
            &[
                ("film_name", &template::escape_html(review.film_name().as_str())),
                ("film_year", &review.film_year().to_string()),
                ("text", &text),
                ("rating", &review.rating().as_u8().to_string()),
                ("review_id", &review.review_id().to_string()),
            ],
        ));
    }
    content.push_str("</table>\n");
    Ok(html::page(&format!("Reviews by {}", user.login().as_str()), &content))
}
