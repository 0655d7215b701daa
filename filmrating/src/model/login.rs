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

//! The `Login` data type.

use filmrating_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Maximum length of a login, in characters.
const MAX_LOGIN_LENGTH: usize = 64;

/// Represents a correctly-formatted (but maybe non-existent) login name.
///
/// Logins are case-sensitive and are transported in HTTP Basic credentials, so they cannot
/// contain the `:` separator.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Login(String);

impl Login {
    /// Creates a new login from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.is_empty() {
            return Err(ModelError("Login cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_LOGIN_LENGTH {
            return Err(ModelError("Login is too long".to_owned()));
        }
        if s.contains(':') {
            return Err(ModelError(format!("Login '{}' cannot contain ':'", s)));
        }
        if s.chars().any(char::is_control) {
            return Err(ModelError("Login cannot contain control characters".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the login.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&'static str> for Login {
    /// Creates a new login from a hardcoded string, which must be valid.
    fn from(login: &'static str) -> Self {
        Login::new(login).expect("Hardcoded logins must be valid")
    }
}

/// A deserialization visitor for a `Login`.
struct LoginVisitor;

impl Visitor<'_> for LoginVisitor {
    type Value = Login;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Login::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Login::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Login {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(LoginVisitor)
    }
}
