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

//! Film rating service: a JSON API to rate films and an HTML panel to administer them.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use derivative::Derivative;
use filmrating_core::clocks::{Clock, SystemClock};
use filmrating_core::db::{Db, sqlite};
use filmrating_core::env::{get_optional_var, get_required_var};
use log::info;
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

mod admin;
pub mod db;
pub mod driver;
use driver::Driver;
pub mod model;
mod rest;

/// Default port for the JSON API.
const DEFAULT_PORT: u16 = 3000;

/// Default port for the administration panel.
const DEFAULT_ADMIN_PORT: u16 = 3001;

/// Configuration of the service.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct ServiceOptions {
    /// Connection string for the SQLite database.
    pub database: String,

    /// Port on which to serve the JSON API.
    pub port: u16,

    /// Port on which to serve the administration panel.
    pub admin_port: u16,

    /// Whether to listen on all interfaces instead of on localhost only.
    pub bind_all: bool,
}

impl ServiceOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_DATABASE`, `<prefix>_PORT`,
    /// `<prefix>_ADMIN_PORT` and `<prefix>_BIND_ALL`.  Only the database is required.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            database: get_required_var::<String>(prefix, "DATABASE")?,
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            admin_port: get_optional_var::<u16>(prefix, "ADMIN_PORT")?
                .unwrap_or(DEFAULT_ADMIN_PORT),
            bind_all: get_optional_var::<bool>(prefix, "BIND_ALL")?.unwrap_or(false),
        })
    }

    /// Computes the address to listen on for the given `port`.
    fn bind_addr(&self, port: u16) -> SocketAddr {
        if self.bind_all {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
        } else {
            SocketAddr::from((Ipv4Addr::LOCALHOST, port))
        }
    }
}

/// Opens the database at `database` and ensures its schema exists.
async fn open_db(database: &str) -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
    let db: Arc<dyn Db + Send + Sync> = Arc::new(sqlite::connect(database).await?);
    db::init_schema(&mut db.ex().await?).await?;
    Ok(db)
}

/// Serves the JSON API on the port configured in `opts` until the server fails.
pub async fn serve(opts: ServiceOptions) -> Result<(), Box<dyn Error>> {
    let db = open_db(&opts.database).await?;
    let driver = Driver::new(db.clone(), Arc::new(SystemClock::default()));
    let app = rest::app(driver);

    let listener = TcpListener::bind(opts.bind_addr(opts.port)).await?;
    info!("Serving the API on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).await;
    db.close().await;
    Ok(result?)
}

/// Serves the administration panel on the port configured in `opts` until the server fails.
pub async fn serve_admin(opts: ServiceOptions) -> Result<(), Box<dyn Error>> {
    let db = open_db(&opts.database).await?;
    let driver = Driver::new(db.clone(), Arc::new(SystemClock::default()));
    let app = admin::app(driver);

    let listener = TcpListener::bind(opts.bind_addr(opts.admin_port)).await?;
    info!("Serving the admin panel on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).await;
    db.close().await;
    Ok(result?)
}

/// Creates the schema of the `database` and populates it with the initial data set.
///
/// Databases that already contain films are left untouched.
pub async fn create_db(database: &str) -> Result<(), Box<dyn Error>> {
    let db = open_db(database).await?;

    let mut tx = db.begin_write().await?;
    let (films, _reviews) = db::count_films_and_reviews(tx.ex()).await?;
    if films == 0 {
        db::insert_seed_data(tx.ex(), SystemClock::default().now_utc()).await?;
        tx.commit().await?;
        info!("Created and populated the database {}", database);
    } else {
        drop(tx);
        info!("Database {} already has {} films; not populating it", database, films);
    }

    db.close().await;
    Ok(())
}
