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

//! API to register a new user.

use crate::driver::Driver;
use crate::model::{Login, Password};
use axum::Json;
use axum::extract::State;
use axum::http;
use filmrating_core::rest::{JsonBody, RestError};
use serde::{Deserialize, Serialize};

/// Message sent to the server to register a new user.
#[derive(Deserialize, Serialize)]
pub(crate) struct RegisterRequest {
    /// Desired login.
    pub(crate) login: String,

    /// Desired password.
    pub(crate) password: String,
}

/// Message returned by the server after registering a user.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct RegisterResponse {
    /// Login of the newly-registered user.
    pub(crate) login: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(http::StatusCode, Json<RegisterResponse>), RestError> {
    let login = Login::new(request.login)?;
    let password = Password::new(request.password)?;

    let login = driver.register(login, password).await?;
    let response = RegisterResponse { login: login.as_str().to_owned() };
    Ok((http::StatusCode::ACCEPTED, Json(response)))
}
