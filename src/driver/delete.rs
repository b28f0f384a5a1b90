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

//! Extends the driver with the delete operation.

use crate::db::{self, DbError};
use crate::driver::{DriverError, DriverResult, RegistryDriver};
use crate::model::DriverId;

impl RegistryDriver {
    /// Soft-deletes the driver record identified by `id`.
    ///
    /// The record stays in storage with its activity flag cleared and its modification time
    /// refreshed, and from this point on every operation treats it as nonexistent.  Deleting an
    /// already-deleted record reports not-found.
    pub(crate) async fn delete(self, id: DriverId) -> DriverResult<()> {
        let now = self.clock.now_utc();

        let mut tx = self.db.begin().await?;

        let existing = db::get_driver(tx.ex(), id).await.map_err(|e| match e {
            DbError::NotFound => DriverError::NotFound(format!("Driver {} not found", id)),
            e => e.into(),
        })?;
        if !existing.is_active() {
            return Err(DriverError::NotFound(format!("Driver {} not found", id)));
        }

        db::update_driver(tx.ex(), &existing.deactivate(now)).await?;
        tx.commit().await?;
        Ok(())
    }
}
