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

//! API to fetch a single driver record.

use crate::driver::RegistryDriver;
use crate::model::{Driver, DriverId};
use crate::rest::{EmptyBody, RestError, RestResult};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

/// GET handler for this API.
pub(super) async fn handler(
    State(driver): State<RegistryDriver>,
    id: Result<Path<DriverId>, PathRejection>,
    _body: EmptyBody,
) -> RestResult<Json<Driver>> {
    let Path(id) = id.map_err(|e| RestError::InvalidRequest(e.body_text()))?;
    Ok(Json(driver.get(id).await?))
}
