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

//! Page listing all films.

use crate::admin::html;
use crate::driver::Driver;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, RestError};
use filmrating_core::template;

/// One row in the table of films.
const FILM_TEMPLATE: &str = r#"<tr>
<td>%id%</td>
<td><a href="/films/%id%">%name%</a></td>
<td>%year%</td>
<td>%average_rating%</td>
<td>%rating_count%</td>
<td>%review_count%</td>
</tr>
"#;

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let films = driver.list_films().await?;

    let mut content = String::from(r#"<p><a href="/films/new">Add a film</a></p>"#);
    content.push_str(
        "\n<table>\n<tr><th>Id</th><th>Name</th><th>Year</th><th>Average rating</th>\
         <th>Ratings</th><th>Reviews</th></tr>\n",
    );
    for film in films {
        content.push_str(&template::apply(
            FILM_TEMPLATE,
            &[
                ("id", &film.id().to_string()),
                ("name", &template::escape_html(film.name().as_str())),
                ("year", &film.year().to_string()),
                ("average_rating", &html::format_average(*film.average_rating())),
                ("rating_count", &film.rating_count().to_string()),
                ("review_count", &film.review_count().to_string()),
            ],
        ));
    }
    content.push_str("</table>\n");
    Ok(html::page("Films", &content))
}
