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

//! Extends the driver with the search operation.

use crate::db;
use crate::driver::{DriverResult, RegistryDriver};
use crate::model::{Driver, DriverFilter, Page, PageRequest};

impl RegistryDriver {
    /// Runs a paginated search over the active driver records.
    ///
    /// All criteria in `filter` are combined with a logical AND, and soft-deleted records never
    /// appear in the results.
    pub(crate) async fn search(
        self,
        filter: DriverFilter,
        request: PageRequest,
    ) -> DriverResult<Page<Driver>> {
        let mut ex = self.db.ex().await?;
        Ok(db::search_drivers(&mut ex, &filter, &request).await?)
    }
}
