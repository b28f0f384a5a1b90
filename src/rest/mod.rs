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

//! REST handlers for the drivers registry.
//!
//! Every API is put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This may
//! seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API defines a `route` method that returns the
//! HTTP method and the API path under test.  All integration tests within the module then rely on
//! `route` to obtain this information, ensuring that they all test the desired API.
//!
//! Failed requests are rendered as a JSON envelope that carries the request path and a timestamp
//! next to the error message; see `render_errors` for the details.

use crate::driver::{DriverError, RegistryDriver};
use crate::model::{DriverSpec, EmailAddress, ModelError, StateCode, VehicleType};
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::http::header::AsHeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use time::OffsetDateTime;
use tower_http::cors::CorsLayer;

mod auth;
mod driver_delete;
mod driver_get;
mod driver_put;
mod drivers_get;
mod drivers_post;
mod login_post;
#[cfg(test)]
pub(crate) mod testutils;

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
///
/// The type is cloneable because rendering happens in a separate middleware: `into_response`
/// stashes the error in the response extensions and `render_errors` picks it up from there.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates an authentication problem.
    #[error("{0}")]
    Unauthorized(String),

    /// Indicates that the request body failed validation, with a message per offending field.
    #[error("Validation failed")]
    ValidationFailed(BTreeMap<String, String>),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
            DriverError::Unauthorized(_) => RestError::Unauthorized(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl RestError {
    /// HTTP status code that this error renders as.
    fn status(&self) -> http::StatusCode {
        match self {
            RestError::InternalError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::Unauthorized(_) => http::StatusCode::UNAUTHORIZED,
            RestError::ValidationFailed(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        // The envelope needs the request path, which is not visible from here, so only set the
        // status and let `render_errors` fill in the body.
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct ErrorResponse {
    /// Time at which the error response was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) timestamp: OffsetDateTime,

    /// Numeric HTTP status code of the response.
    pub(crate) status: u16,

    /// Canonical reason of the HTTP status code.
    pub(crate) error: String,

    /// Textual representation of the error message.
    pub(crate) message: String,

    /// Path of the request that failed.
    pub(crate) path: String,

    /// Per-field validation messages, only present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<BTreeMap<String, String>>,
}

/// Middleware that renders any `RestError` stashed in the response as the JSON error envelope.
async fn render_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<RestError>() {
        Some(error) => {
            let status = error.status();
            let fields = match &error {
                RestError::ValidationFailed(fields) => Some(fields.clone()),
                _ => None,
            };
            let payload = ErrorResponse {
                timestamp: OffsetDateTime::now_utc(),
                status: status.as_u16(),
                error: status.canonical_reason().unwrap_or("Unknown").to_owned(),
                message: error.to_string(),
                path,
                fields,
            };
            (status, Json(payload)).into_response()
        }
        None => response,
    }
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::InvalidRequest("Content should be empty".to_owned()))
        }
    }
}

/// Extracts the header `name` from `headers` and ensures it has at most one value.
pub fn get_unique_header<K: AsHeaderName + Copy>(
    headers: &HeaderMap,
    name: K,
) -> RestResult<Option<&HeaderValue>> {
    let mut iter = headers.get_all(name).iter();
    let value = iter.next();
    if iter.next().is_some() {
        return Err(RestError::InvalidRequest(format!(
            "Header {} cannot have more than one value",
            name.as_str()
        )));
    }
    Ok(value)
}

/// JSON payload of the create and update operations.
///
/// Every field is optional at the deserialization level so that all validation problems can be
/// reported at once instead of failing at the first missing field.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug, Default, Serialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriverRequest {
    /// The driver's full name.
    name: Option<String>,

    /// Contact email address.
    email: Option<String>,

    /// Contact phone number.
    phone: Option<String>,

    /// City where the driver operates.
    city: Option<String>,

    /// Two-letter state code where the driver operates.
    state: Option<String>,

    /// Vehicle categories the driver can operate.
    vehicle_types: Option<Vec<String>>,
}

impl DriverRequest {
    /// Maximum length of the phone number per the schema.
    const MAX_PHONE_LENGTH: usize = 50;

    /// Validates the request and converts it into a record spec.
    ///
    /// Blank optional fields are treated as absent.  On failure, returns one message per
    /// offending field, keyed by the field's name in the payload.
    pub(crate) fn into_spec(self) -> Result<DriverSpec, BTreeMap<String, String>> {
        let mut bad_fields = BTreeMap::new();

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => {
                bad_fields.insert("name".to_owned(), "must not be blank".to_owned());
                None
            }
        };

        let email = match self.email {
            Some(email) if !email.trim().is_empty() => match EmailAddress::new(email) {
                Ok(email) => Some(Some(email)),
                Err(e) => {
                    bad_fields.insert("email".to_owned(), e.to_string());
                    None
                }
            },
            _ => Some(None),
        };

        let phone = match self.phone {
            Some(phone) if !phone.trim().is_empty() => {
                if phone.len() > Self::MAX_PHONE_LENGTH {
                    bad_fields.insert(
                        "phone".to_owned(),
                        format!("must be at most {} characters", Self::MAX_PHONE_LENGTH),
                    );
                    None
                } else {
                    Some(Some(phone))
                }
            }
            _ => Some(None),
        };

        let city = match self.city {
            Some(city) if !city.trim().is_empty() => Some(city),
            _ => {
                bad_fields.insert("city".to_owned(), "must not be blank".to_owned());
                None
            }
        };

        let state = match self.state {
            Some(state) => match StateCode::new(state) {
                Ok(state) => Some(state),
                Err(e) => {
                    bad_fields.insert("state".to_owned(), e.to_string());
                    None
                }
            },
            None => {
                bad_fields.insert("state".to_owned(), "must not be blank".to_owned());
                None
            }
        };

        let vehicle_types = match self.vehicle_types {
            Some(raw_types) if !raw_types.is_empty() => {
                let mut vehicle_types = BTreeSet::new();
                let mut valid = true;
                for raw_type in raw_types {
                    match VehicleType::from_str(&raw_type) {
                        Ok(vehicle_type) => {
                            vehicle_types.insert(vehicle_type);
                        }
                        Err(e) => {
                            bad_fields.insert("vehicleTypes".to_owned(), e.to_string());
                            valid = false;
                            break;
                        }
                    }
                }
                if valid { Some(vehicle_types) } else { None }
            }
            _ => {
                bad_fields.insert("vehicleTypes".to_owned(), "must not be empty".to_owned());
                None
            }
        };

        match (name, email, phone, city, state, vehicle_types) {
            (Some(name), Some(email), Some(phone), Some(city), Some(state), Some(vehicle_types))
                if bad_fields.is_empty() =>
            {
                Ok(DriverSpec::new(name, email, phone, city, state, vehicle_types))
            }
            _ => Err(bad_fields),
        }
    }
}

/// Creates the API router for the application.
pub(crate) fn app(driver: RegistryDriver) -> Router {
    let protected = Router::new()
        .route("/drivers", post(drivers_post::handler).get(drivers_get::handler))
        .route(
            "/drivers/:id",
            get(driver_get::handler).put(driver_put::handler).delete(driver_delete::handler),
        )
        .route_layer(middleware::from_fn_with_state(driver.clone(), auth::require_bearer));

    Router::new()
        .route("/auth/login", post(login_post::handler))
        .merge(protected)
        .layer(middleware::from_fn(render_errors))
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
