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

//! Operations to register and authenticate users.

use crate::db;
use crate::driver::Driver;
use crate::model::{Login, Password, User};
use filmrating_core::db::DbError;
use filmrating_core::driver::{DriverError, DriverResult};
use log::info;

impl Driver {
    /// Registers a new user identified by `login` and `password`.
    pub(crate) async fn register(self, login: Login, password: Password) -> DriverResult<Login> {
        let password = password.hash();

        let mut tx = self.db.begin_write().await?;
        match db::create_user(tx.ex(), &login, &password).await {
            Ok(_) => (),
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists("Login is already taken".to_owned()));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        info!("Registered new user {}", login.as_str());
        Ok(login)
    }

    /// Checks that `login` and `password` identify an existing user and returns it.
    pub(crate) async fn verify(self, login: Login, password: Password) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;
        let user = self.authenticate(&mut tx, login, password).await?;
        tx.commit().await?;
        Ok(user)
    }
}
