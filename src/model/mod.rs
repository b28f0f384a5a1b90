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

//! High-level data types for the drivers registry.

use serde::{Deserialize, Serialize};

mod driver;
pub(crate) use driver::{
    Driver, DriverFilter, DriverId, DriverSortBy, DriverSpec, Page, PageRequest, SortDirection,
};
mod emailaddress;
pub use emailaddress::EmailAddress;
mod passwords;
pub use passwords::Password;
pub(crate) use passwords::HashedPassword;
mod statecode;
pub(crate) use statecode::StateCode;
mod user;
pub(crate) use user::User;
mod vehicletype;
pub(crate) use vehicletype::VehicleType;

/// Errors caused by invalid values in the model types.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub(crate) String);

/// Result type for this module.
pub(crate) type ModelResult<T> = Result<T, ModelError>;

/// An opaque signed token that grants access to the protected APIs.
///
/// The token's contents are only meaningful to the token provider that minted it, so this type
/// does no validation of its own.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct AccessToken(String);

impl AccessToken {
    /// Wraps an already-signed token.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the token.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}
