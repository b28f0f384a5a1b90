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

//! Extends the driver with the update operation.

use crate::db::{self, DbError};
use crate::driver::{DriverError, DriverResult, RegistryDriver};
use crate::model::{Driver, DriverId, DriverSpec};

impl RegistryDriver {
    /// Replaces the caller-editable fields of the record identified by `id` with `spec`.
    ///
    /// The identifier and creation time are preserved; the modification time is refreshed.
    /// Soft-deleted records cannot be updated and report not-found instead.
    pub(crate) async fn update(self, id: DriverId, spec: DriverSpec) -> DriverResult<Driver> {
        let now = self.clock.now_utc();

        let mut tx = self.db.begin().await?;

        let existing = db::get_driver(tx.ex(), id).await.map_err(|e| match e {
            DbError::NotFound => DriverError::NotFound(format!("Driver {} not found", id)),
            e => e.into(),
        })?;
        if !existing.is_active() {
            return Err(DriverError::NotFound(format!("Driver {} not found", id)));
        }

        let driver = Driver::new(
            id,
            spec.name().clone(),
            spec.email().clone(),
            spec.phone().clone(),
            spec.city().clone(),
            spec.state().clone(),
            spec.vehicle_types().clone(),
            true,
            *existing.created_at(),
            now,
        );
        db::update_driver(tx.ex(), &driver).await?;
        tx.commit().await?;
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::testutils::*;
    use crate::driver::DriverError;
    use crate::model::{DriverId, DriverSpec, StateCode, VehicleType};
    use std::collections::BTreeSet;
    use std::time::Duration;

    #[tokio::test]
    async fn test_update_ok() {
        let context = TestContext::setup().await;

        let created = context.driver().create(full_spec("Ana")).await.unwrap();
        context.clock().advance(Duration::from_secs(30));

        let spec = DriverSpec::new(
            "Ana Souza".to_owned(),
            None,
            None,
            "Campinas".to_owned(),
            StateCode::from("rj"),
            BTreeSet::from([VehicleType::Bitruck]),
        );
        let updated = context.driver().update(*created.id(), spec).await.unwrap();

        assert_eq!(created.id(), updated.id());
        assert_eq!("Ana Souza", updated.name());
        assert_eq!(None, *updated.email());
        assert_eq!("RJ", updated.state().as_str());
        assert_eq!(&BTreeSet::from([VehicleType::Bitruck]), updated.vehicle_types());
        assert_eq!(created.created_at(), updated.created_at());
        assert_eq!(base_time() + Duration::from_secs(30), *updated.updated_at());

        let fetched = context.driver().get(*created.id()).await.unwrap();
        assert_eq!(updated, fetched);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let context = TestContext::setup().await;

        match context.driver().update(DriverId::random(), minimal_spec("Ana")).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("Must have failed with NotFound but got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_update_deleted_record_is_not_found() {
        let context = TestContext::setup().await;

        let created = context.driver().create(minimal_spec("Ana")).await.unwrap();
        context.driver().delete(*created.id()).await.unwrap();

        match context.driver().update(*created.id(), minimal_spec("Ana Souza")).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("Must have failed with NotFound but got: {:?}", e),
        }
    }
}
