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

//! Extends the driver with the create operation.

use crate::db;
use crate::driver::{DriverResult, RegistryDriver};
use crate::model::{Driver, DriverId, DriverSpec};

impl RegistryDriver {
    /// Creates a new driver record from the caller-supplied `spec`.
    ///
    /// The service owns the record's identity and timestamps, so the returned record carries a
    /// fresh identifier and both timestamps set to the current time.
    pub(crate) async fn create(self, spec: DriverSpec) -> DriverResult<Driver> {
        let now = self.clock.now_utc();
        let driver = Driver::new(
            DriverId::random(),
            spec.name().clone(),
            spec.email().clone(),
            spec.phone().clone(),
            spec.city().clone(),
            spec.state().clone(),
            spec.vehicle_types().clone(),
            true,
            now,
            now,
        );

        let mut tx = self.db.begin().await?;
        db::create_driver(tx.ex(), &driver).await?;
        tx.commit().await?;
        Ok(driver)
    }
}
