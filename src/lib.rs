// FreteMais Drivers
// Copyright 2026 FreteMais
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

//! REST service to manage the registry of freight drivers.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crate::clocks::SystemClock;
use crate::driver::RegistryDriver;
use crate::model::{EmailAddress, Password};
use crate::tokens::{TokenOptions, TokenProvider};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod clocks;
pub mod db;
use db::Db;
pub mod driver;
pub(crate) mod env;
pub mod model;
mod rest;
use rest::app;
pub mod tokens;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose
/// many crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    token_opts: TokenOptions,
    admin_email: EmailAddress,
    admin_password: Password,
) -> Result<(), Box<dyn Error>> {
    let clock = Arc::from(SystemClock::default());
    let driver = RegistryDriver::new(db, clock, TokenProvider::new(token_opts));
    driver.clone().seed_admin(admin_email, admin_password).await?;
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
