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

//! API to log into the service and obtain a bearer token.

use crate::driver::RegistryDriver;
use crate::model::{AccessToken, EmailAddress, Password};
use crate::rest::{RestError, RestResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Message of the request to this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(super) struct LoginRequest {
    /// Email address of the account to log into.
    email: String,

    /// Password of the account.
    password: String,
}

/// Message of the response to this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginResponse {
    /// The bearer token to present to the protected APIs.
    token: AccessToken,

    /// Lifetime of the token, in milliseconds, as a string.
    expires_at: String,
}

#[cfg(test)]
impl LoginResponse {
    pub(super) fn token(&self) -> &AccessToken {
        &self.token
    }

    pub(super) fn expires_at(&self) -> &str {
        &self.expires_at
    }
}

/// POST handler for this API.
///
/// Malformed credentials are reported exactly like wrong ones so that the response never tells
/// the caller which accounts exist.
pub(super) async fn handler(
    State(driver): State<RegistryDriver>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> RestResult<Json<LoginResponse>> {
    let Json(request) = payload.map_err(|e| RestError::InvalidRequest(e.body_text()))?;

    let email = EmailAddress::new(request.email)
        .map_err(|_| RestError::Unauthorized("Invalid credentials".to_owned()))?;
    let password = Password::new(request.password)
        .map_err(|_| RestError::Unauthorized("Invalid credentials".to_owned()))?;

    let expires_at = driver.token_expiration_millis().to_string();
    let token = driver.login(email, password).await?;
    Ok(Json(LoginResponse { token, expires_at }))
}
