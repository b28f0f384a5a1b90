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

//! The `User` data type.

use crate::model::{EmailAddress, HashedPassword};
use derive_getters::Getters;
use derive_more::Constructor;

/// An account that can log into the service.
///
/// Users are never created through the API: the only account is the administrator seeded at
/// startup, and its credentials live in the configuration.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct User {
    /// Email address that identifies the user.
    email: EmailAddress,

    /// Hash of the user's password.
    password: HashedPassword,

    /// Whether the user is allowed to log in.
    active: bool,
}
