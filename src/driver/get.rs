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

//! Extends the driver with the get operation.

use crate::db::{self, DbError};
use crate::driver::{DriverError, DriverResult, RegistryDriver};
use crate::model::{Driver, DriverId};

impl RegistryDriver {
    /// Fetches the driver record identified by `id`.
    ///
    /// Soft-deleted records are indistinguishable from records that never existed.
    pub(crate) async fn get(self, id: DriverId) -> DriverResult<Driver> {
        let mut ex = self.db.ex().await?;
        let driver = db::get_driver(&mut ex, id).await.map_err(|e| match e {
            DbError::NotFound => DriverError::NotFound(format!("Driver {} not found", id)),
            e => e.into(),
        })?;
        if !driver.is_active() {
            return Err(DriverError::NotFound(format!("Driver {} not found", id)));
        }
        Ok(driver)
    }
}
