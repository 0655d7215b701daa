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

//! Page listing all users.

use crate::admin::html;
use crate::driver::Driver;
use axum::extract::State;
use axum::response::Html;
use filmrating_core::rest::{EmptyBody, RestError};
use filmrating_core::template;

/// One entry in the list of users.
const USER_TEMPLATE: &str = r#"<li><a href="/users/%id%">%login%</a></li>
"#;

/// GET handler for this page.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Html<String>, RestError> {
    let users = driver.list_users().await?;

    let mut content = String::from("<ul>\n");
    for user in users {
        content.push_str(&template::apply(
            USER_TEMPLATE,
            &[
                ("id", &user.id().to_string()),
                ("login", &template::escape_html(user.login().as_str())),
            ],
        ));
    }
    content.push_str("</ul>\n");
    Ok(html::page("Users", &content))
}
