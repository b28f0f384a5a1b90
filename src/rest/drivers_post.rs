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

//! API to create a new driver record.

use crate::driver::RegistryDriver;
use crate::model::Driver;
use crate::rest::{DriverRequest, RestError, RestResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// POST handler for this API.
pub(super) async fn handler(
    State(driver): State<RegistryDriver>,
    payload: Result<Json<DriverRequest>, JsonRejection>,
) -> RestResult<(StatusCode, Json<Driver>)> {
    let Json(request) = payload.map_err(|e| RestError::InvalidRequest(e.body_text()))?;
    let spec = request.into_spec().map_err(RestError::ValidationFailed)?;
    let record = driver.create(spec).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
