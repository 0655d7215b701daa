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

//! Landing page of the administration panel.

use crate::admin::html;
use crate::driver::Driver;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, RestError};
use filmrating_core::template;

/// Summary of the contents of the database.
const TOTALS_TEMPLATE: &str = r#"<ul>
<li>Films: %films%</li>
<li>Reviews: %reviews%</li>
</ul>
"#;

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let (films, reviews) = driver.totals().await?;

    let content = template::apply(
        TOTALS_TEMPLATE,
        &[("films", &films.to_string()), ("reviews", &reviews.to_string())],
    );
    Ok(html::page("Film rating admin", &content))
}
