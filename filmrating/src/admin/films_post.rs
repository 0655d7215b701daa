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

//! Form submission to add a film.

use crate::driver::Driver;
use crate::model::{FilmName, Year};
use axum::extract::State;
use axum::response::Redirect;
use filmrating_core::rest::{FormBody, RestError};
use serde::{Deserialize, Serialize};

/// Contents of the form to create or edit a film.
#[derive(Deserialize, Serialize)]
pub(crate) struct FilmForm {
    /// Name of the film.
    pub(crate) name: String,

    /// Release year of the film.
    pub(crate) year: i64,
}

impl FilmForm {
    /// Validates the raw form values.
    pub(crate) fn into_parts(self) -> Result<(FilmName, Year), RestError> {
        Ok((FilmName::new(self.name)?, Year::new(self.year)?))
    }
}

/// POST handler for this form.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    FormBody(form): FormBody<FilmForm>,
) -> Result<Redirect, RestError> {
    let (name, year) = form.into_parts()?;
    driver.create_film(name, year).await?;
    Ok(Redirect::to("/films"))
}
