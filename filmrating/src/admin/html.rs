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

//! Shared HTML fragments for the administration panel.

use axum::response::Html;
use filmrating_core::template;

/// Skeleton of every page.  `title` and `content` must already be escaped.
const LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>%title% - Film rating admin</title>
</head>

<body>
<p><a href="/">Home</a> | <a href="/users">Users</a> | <a href="/films">Films</a></p>

<h1>%title%</h1>

%content%
</body>
</html>
"#;

/// Form to create or edit a film.  `name` and `year` must already be escaped.
const FILM_FORM_TEMPLATE: &str = r#"<form method="post" action="%action%">
<p><label>Name: <input type="text" name="name" value="%name%"></label></p>
<p><label>Year: <input type="number" name="year" value="%year%" min="0" max="9999"></label></p>
<p><input type="submit" value="Save"></p>
</form>
"#;

/// Renders a full page with `title` and the HTML `content`.
pub(super) fn page(title: &str, content: &str) -> Html<String> {
    let title = template::escape_html(title);
    Html(template::apply(LAYOUT_TEMPLATE, &[("title", &title), ("content", content)]))
}

/// Renders the form to submit a film's `name` and `year` to `action`.
pub(super) fn film_form(action: &str, name: &str, year: &str) -> String {
    template::apply(
        FILM_FORM_TEMPLATE,
        &[
            ("action", &template::escape_html(action)),
            ("name", &template::escape_html(name)),
            ("year", &template::escape_html(year)),
        ],
    )
}

/// Formats an optional average rating for display.
pub(super) fn format_average(average: Option<f64>) -> String {
    match average {
        Some(average) => format!("{:.2}", average),
        None => "-".to_owned(),
    }
}
