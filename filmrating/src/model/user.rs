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

//! The `User` data type.

use crate::model::{HashedPassword, Login};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from its raw database value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Representation of a user's information.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct User {
    /// Identifier of the user.
    id: UserId,

    /// Login name of the user.
    login: Login,

    /// Salted hash of the user's password.
    password: HashedPassword,
}

impl User {
    /// Creates a new user with the given fields.
    pub(crate) fn new(id: UserId, login: Login, password: HashedPassword) -> Self {
        Self { id, login, password }
    }
}
