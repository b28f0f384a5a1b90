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

//! Business logic of the drivers registry.
//!
//! The operations in this module sit between the REST layer and the database: they own record
//! identity, timestamps and the soft-deletion rules, and they never expose raw database errors.

use crate::clocks::Clock;
use crate::db::{Db, DbError};
use crate::model::ModelError;
use crate::tokens::TokenProvider;
use std::sync::Arc;

mod create;
mod delete;
mod get;
mod login;
mod search;
mod seed;
#[cfg(test)]
pub(crate) mod testutils;
mod update;

/// Business logic errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DriverError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Indicates an error in the backing database.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates an error processing the input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Indicates that a requested entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Indicates that the caller is not allowed to perform the requested operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(e.to_string()),
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

impl From<ModelError> for DriverError {
    fn from(e: ModelError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;

/// Entry point to the business logic of the registry.
///
/// This type is cheaply cloneable so the REST layer can keep one copy per in-flight request.
/// Each operation that mutates state opens its own transaction.
#[derive(Clone)]
pub(crate) struct RegistryDriver {
    /// The database that the registry uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Issuer and verifier of the API's bearer tokens.
    tokens: TokenProvider,
}

impl RegistryDriver {
    /// Creates a new driver backed by the given dependencies.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        tokens: TokenProvider,
    ) -> Self {
        Self { db, clock, tokens }
    }

    /// Checks that `token` is a valid, unexpired bearer token issued by this service.
    pub(crate) fn validate_token(&self, token: &str) -> DriverResult<()> {
        self.tokens
            .validate(token, self.clock.now_utc())
            .map_err(|e| DriverError::Unauthorized(e.to_string()))?;
        Ok(())
    }

    /// Lifetime of the tokens issued by the login operation, in milliseconds.
    pub(crate) fn token_expiration_millis(&self) -> u64 {
        self.tokens.expiration_millis()
    }
}
