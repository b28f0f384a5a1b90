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

//! Test utilities for the business layer.

use crate::clocks::testutils::SettableClock;
use crate::db::Db;
use crate::driver::RegistryDriver;
use crate::model::{DriverSpec, EmailAddress, StateCode, VehicleType};
use crate::tokens;
use std::collections::BTreeSet;
use std::sync::Arc;
use time::macros::datetime;

/// Base instant that the settable clock starts at.
pub(crate) fn base_time() -> time::OffsetDateTime {
    datetime!(2026-08-15 10:00:00 UTC)
}

/// State required to run the business logic against an in-memory database and a controllable
/// clock.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: RegistryDriver,
}

impl TestContext {
    /// Initializes the test context with defaults.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crate::db::sqlite::testutils::setup().await);
        let clock = Arc::from(SettableClock::new(base_time()));
        let driver =
            RegistryDriver::new(db.clone(), clock.clone(), tokens::testutils::new_provider());
        Self { db, clock, driver }
    }

    /// Returns a new driver sharing this context's state.
    pub(crate) fn driver(&self) -> RegistryDriver {
        self.driver.clone()
    }

    /// Returns the database the driver is backed by.
    pub(crate) fn db(&self) -> &Arc<dyn Db + Send + Sync> {
        &self.db
    }

    /// Returns the clock the driver is backed by.
    pub(crate) fn clock(&self) -> &Arc<SettableClock> {
        &self.clock
    }
}

/// Builds a valid record spec with the given `name` and defaults for everything else.
pub(crate) fn minimal_spec(name: &str) -> DriverSpec {
    DriverSpec::new(
        name.to_owned(),
        None,
        None,
        "Sao Paulo".to_owned(),
        StateCode::from("SP"),
        BTreeSet::from([VehicleType::Van]),
    )
}

/// Builds a record spec with all fields populated.
pub(crate) fn full_spec(name: &str) -> DriverSpec {
    DriverSpec::new(
        name.to_owned(),
        Some(EmailAddress::from("driver@example.com")),
        Some("+55 11 99999-0000".to_owned()),
        "Sao Paulo".to_owned(),
        StateCode::from("SP"),
        BTreeSet::from([VehicleType::Van, VehicleType::Truck]),
    )
}
