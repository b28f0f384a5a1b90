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

//! The driver record and the transient values used to create and query it.

use crate::model::{EmailAddress, ModelError, ModelResult, StateCode, VehicleType};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Identifier of a driver record.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct DriverId(Uuid);

impl DriverId {
    /// Generates a fresh random identifier.
    pub(crate) fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identifier recovered from storage.
    pub(crate) fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    pub(crate) fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A driver record as persisted in the registry.
///
/// Deletions are soft: the record stays in storage with `is_active` set to false, and every
/// lookup and search skips inactive records.
#[derive(Clone, Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Driver {
    /// Identifier of the record.
    id: DriverId,

    /// The driver's full name.
    name: String,

    /// Contact email address, if known.
    email: Option<EmailAddress>,

    /// Contact phone number, if known.
    phone: Option<String>,

    /// City where the driver operates.
    city: String,

    /// Two-letter state code where the driver operates.
    state: StateCode,

    /// Vehicle categories the driver can operate.
    vehicle_types: BTreeSet<VehicleType>,

    /// Whether the record is live or has been soft-deleted.
    is_active: bool,

    /// Creation time of the record.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time of the last modification to the record.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Driver {
    /// Replaces the vehicle types of this record.
    ///
    /// The row conversions cannot see the join table, so they build the record with an empty set
    /// and the database layer attaches the real one with this.
    pub(crate) fn with_vehicle_types(mut self, vehicle_types: BTreeSet<VehicleType>) -> Self {
        self.vehicle_types = vehicle_types;
        self
    }

    /// Marks this record as soft-deleted as of `now`.
    pub(crate) fn deactivate(mut self, now: OffsetDateTime) -> Self {
        self.is_active = false;
        self.updated_at = now;
        self
    }
}

/// The caller-supplied fields of a driver record.
///
/// This is what create and update operations take: everything else in `Driver` (identifier,
/// activity flag, timestamps) is owned by the service.
#[derive(Clone, Constructor, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct DriverSpec {
    /// The driver's full name.
    name: String,

    /// Contact email address, if known.
    email: Option<EmailAddress>,

    /// Contact phone number, if known.
    phone: Option<String>,

    /// City where the driver operates.
    city: String,

    /// Two-letter state code where the driver operates.
    state: StateCode,

    /// Vehicle categories the driver can operate.
    vehicle_types: BTreeSet<VehicleType>,
}

/// A conjunction of optional search criteria over the drivers registry.
///
/// Every field that is `None` (or empty, for the vehicle types) simply does not constrain the
/// search.  Blank strings are handled when the filter is compiled to predicates, not here.
#[derive(Clone, Constructor, Default, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct DriverFilter {
    /// Free text matched against the name, email and phone fields.
    text: Option<String>,

    /// Exact (case-insensitive) city match.
    city: Option<String>,

    /// Exact state code match.
    state: Option<String>,

    /// Vehicle types that must overlap the driver's set.
    vehicle_types: BTreeSet<VehicleType>,
}

/// The driver fields a search can be ordered by.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum DriverSortBy {
    /// Order by driver name.
    Name,

    /// Order by email address.
    Email,

    /// Order by record creation time.
    #[default]
    CreatedAt,

    /// Order by last modification time.
    UpdatedAt,

    /// Order by city.
    City,

    /// Order by state code.
    State,
}

impl FromStr for DriverSortBy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NAME" => Ok(DriverSortBy::Name),
            "EMAIL" => Ok(DriverSortBy::Email),
            "CREATED_AT" => Ok(DriverSortBy::CreatedAt),
            "UPDATED_AT" => Ok(DriverSortBy::UpdatedAt),
            "CITY" => Ok(DriverSortBy::City),
            "STATE" => Ok(DriverSortBy::State),
            _ => Err(ModelError(format!("Unknown sort field '{}'", s))),
        }
    }
}

/// The direction of a sort.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum SortDirection {
    /// Ascending order.
    Asc,

    /// Descending order.
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(ModelError(format!("Unknown sort direction '{}'", s))),
        }
    }
}

/// A request for one page of search results.
#[derive(Clone, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct PageRequest {
    /// Zero-based index of the requested page.
    page: u32,

    /// Maximum number of items in the page.
    size: u32,

    /// Field the results are ordered by.
    sort_by: DriverSortBy,

    /// Direction of the ordering.
    direction: SortDirection,
}

impl PageRequest {
    /// Default page size when the caller does not specify one.
    pub(crate) const DEFAULT_SIZE: u32 = 5;

    /// Creates a new page request, validating that the page can hold anything at all.
    pub(crate) fn new(
        page: u32,
        size: u32,
        sort_by: DriverSortBy,
        direction: SortDirection,
    ) -> ModelResult<Self> {
        if size == 0 {
            return Err(ModelError("Page size must be at least 1".to_owned()));
        }
        Ok(Self { page, size, sort_by, direction })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
            sort_by: DriverSortBy::default(),
            direction: SortDirection::default(),
        }
    }
}

/// One page of search results plus the pagination counters.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    /// The items in this page.
    content: Vec<T>,

    /// Zero-based index of this page.
    page: u32,

    /// Maximum number of items per page.
    size: u32,

    /// Total number of items matching the search across all pages.
    total_elements: u64,

    /// Total number of pages needed to hold `total_elements`.
    total_pages: u32,
}

impl<T> Page<T> {
    /// Creates a page of `content` for `request`, deriving the page count from `total_elements`.
    pub(crate) fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = *request.size();
        let total_pages = u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
        Self { content, page: *request.page(), size, total_elements, total_pages }
    }

    /// The items in this page.
    pub(crate) fn content(&self) -> &[T] {
        &self.content
    }

    /// Total number of items matching the search across all pages.
    pub(crate) fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Total number of pages needed to hold all matching items.
    #[cfg(test)]
    pub(crate) fn total_pages(&self) -> u32 {
        self.total_pages
    }
}
