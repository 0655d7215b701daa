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

//! Utilities to deal with HTTP authorization.

use crate::model::{Login, Password};
use base64::Engine;
use base64::engine::general_purpose;
use filmrating_core::rest::{RestError, RestResult, get_unique_header};
use http::header::HeaderMap;

/// Message returned when the credentials are well-formed but cannot possibly be valid.
const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect login or password";

/// Builds an error that asks the client to authenticate with Basic credentials in `realm`.
fn unauthorized<S: Into<String>>(realm: &'static str, message: S) -> RestError {
    RestError::Unauthorized { scheme: "Basic", realm, message: message.into() }
}

/// Assumes that the `headers` contain basic authentication credentials and extracts them.
///
/// A missing or malformed `Authorization` header results in an `Unauthorized` error for
/// `exp_realm`.  Credentials that are well-formed but that do not satisfy the constraints of a
/// `Login` or a `Password` are reported in the same way as a failed login.
pub(crate) fn get_basic_auth(
    headers: &HeaderMap,
    exp_realm: &'static str,
) -> RestResult<(Login, Password)> {
    let authz = match get_unique_header(headers, "Authorization") {
        Ok(Some(value)) => value,
        Ok(None) => return Err(unauthorized(exp_realm, "Missing Authorization header")),
        Err(e) => return Err(unauthorized(exp_realm, e.to_string())),
    };

    let authz = authz.to_str().map_err(|e| {
        unauthorized(exp_realm, format!("Bad encoding in Authorization header: {}", e))
    })?;

    let (scheme, payload) = match authz.split_once(' ') {
        Some((scheme, payload)) if !scheme.is_empty() => (scheme, payload),
        Some(_) => {
            return Err(unauthorized(exp_realm, "Bad Authorization header: missing scheme"));
        }
        None if authz.is_empty() => {
            return Err(unauthorized(exp_realm, "Bad Authorization header: missing scheme"));
        }
        None => return Err(unauthorized(exp_realm, "Bad Authorization header: missing payload")),
    };
    if scheme != "Basic" {
        return Err(unauthorized(exp_realm, "Unsupported scheme"));
    }

    let payload = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| unauthorized(exp_realm, format!("Bad base64 encoding in payload: {}", e)))?;
    let payload = String::from_utf8(payload)
        .map_err(|e| unauthorized(exp_realm, format!("Bad UTF-8 encoding in payload: {}", e)))?;

    let (login, password) = match payload.split_once(':') {
        Some(parts) => parts,
        None => return Err(unauthorized(exp_realm, "Bad content")),
    };

    let login = Login::new(login)
        .map_err(|_| RestError::BadCredentials(BAD_CREDENTIALS_MESSAGE.to_owned()))?;
    let password = Password::new(password)
        .map_err(|_| RestError::BadCredentials(BAD_CREDENTIALS_MESSAGE.to_owned()))?;
    Ok((login, password))
}
