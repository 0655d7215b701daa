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

//! Business logic for the film rating service.

use crate::db;
use crate::model::{Login, Password, User};
use derivative::Derivative;
use filmrating_core::clocks::Clock;
use filmrating_core::db::{Db, DbError, TxExecutor};
use filmrating_core::driver::{DriverError, DriverResult};
use log::warn;
use std::sync::Arc;

mod admin;
mod credentials;
mod films;
mod rate;
#[cfg(test)]
pub(crate) mod testutils;

/// Message returned for any authentication failure, which must not reveal which part of the
/// credentials was wrong.
const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect login or password";

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
///
/// Operations that require authentication take the caller's credentials and validate them inside
/// the same transaction that serves the request.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Driver {
    /// The database that the driver uses for persistence.
    #[derivative(Debug = "ignore")]
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    #[derivative(Debug = "ignore")]
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }

    /// Validates the `login`/`password` pair within `tx` and returns the matching user.
    ///
    /// Unknown logins and wrong passwords are indistinguishable to the caller.
    async fn authenticate(
        &self,
        tx: &mut TxExecutor,
        login: Login,
        password: Password,
    ) -> DriverResult<User> {
        let user = match db::get_user_by_login(tx.ex(), &login).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                let _ = password.verify_missing();
                warn!("Rejected credentials for user {}", login.as_str());
                return Err(DriverError::Unauthorized(BAD_CREDENTIALS_MESSAGE.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if !password.verify(user.password()) {
            warn!("Rejected credentials for user {}", login.as_str());
            return Err(DriverError::Unauthorized(BAD_CREDENTIALS_MESSAGE.to_owned()));
        }

        Ok(user)
    }
}
