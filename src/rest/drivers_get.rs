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

//! API to search for driver records.

use crate::driver::RegistryDriver;
use crate::model::{
    Driver, DriverFilter, DriverSortBy, Page, PageRequest, SortDirection, VehicleType,
};
use crate::rest::{RestError, RestResult};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Query parameters for this API.
///
/// Everything arrives as text and is parsed by hand so that bad values yield our own error
/// envelope instead of the extractor's.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, serde::Serialize))]
pub(super) struct SearchQuery {
    /// Free text matched against the name, email and phone fields.
    text: Option<String>,

    /// Deprecated alias for `text`, kept for older clients.  `text` wins when both are given.
    name: Option<String>,

    /// Exact (case-insensitive) city match.
    city: Option<String>,

    /// Exact state code match.
    state: Option<String>,

    /// Comma-separated list of vehicle types; a driver matches if it operates any of them.
    #[serde(rename = "vehicleTypes")]
    vehicle_types: Option<String>,

    /// Zero-based index of the page to return.  Defaults to 0.
    page: Option<String>,

    /// Maximum number of items per page.  Defaults to 5 and must be at least 1.
    size: Option<String>,

    /// Field the results are ordered by.  Defaults to the creation time.
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,

    /// Direction of the ordering.  Defaults to descending.
    #[serde(rename = "sortDir")]
    sort_dir: Option<String>,
}

/// GET handler for this API.
pub(super) async fn handler(
    State(driver): State<RegistryDriver>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> RestResult<Json<Page<Driver>>> {
    let Query(query) = query.map_err(|e| RestError::InvalidRequest(e.body_text()))?;

    let page = match query.page {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|e| RestError::InvalidRequest(format!("Invalid page '{}': {}", raw, e)))?,
        None => 0,
    };
    let size = match query.size {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|e| RestError::InvalidRequest(format!("Invalid size '{}': {}", raw, e)))?,
        None => PageRequest::DEFAULT_SIZE,
    };
    let sort_by = match query.sort_by {
        Some(raw) => DriverSortBy::from_str(&raw)?,
        None => DriverSortBy::default(),
    };
    let sort_dir = match query.sort_dir {
        Some(raw) => SortDirection::from_str(&raw)?,
        None => SortDirection::default(),
    };
    let request = PageRequest::new(page, size, sort_by, sort_dir)?;

    let vehicle_types = match query.vehicle_types {
        Some(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(VehicleType::from_str)
            .collect::<Result<BTreeSet<VehicleType>, _>>()?,
        None => BTreeSet::default(),
    };
    let text = query.text.or(query.name);
    let filter = DriverFilter::new(text, query.city, query.state, vehicle_types);

    Ok(Json(driver.search(filter, request).await?))
}
