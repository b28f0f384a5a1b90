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

//! Common test code for the REST server.

use crate::clocks::testutils::SettableClock;
use crate::clocks::Clock;
use crate::db::Db;
use crate::driver::testutils::base_time;
use crate::driver::RegistryDriver;
use crate::model::{EmailAddress, Password};
use crate::rest::ErrorResponse;
use crate::tokens;
use axum::extract::Request;
use axum::http::{self, HeaderName, HeaderValue};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Maximum body size for testing purposes.
const MAX_BODY_SIZE: usize = 16 * 1024;

/// Email address of the administrator account seeded in every test context.
pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";

/// Password of the administrator account seeded in every test context.
pub(crate) const ADMIN_PASSWORD: &str = "the password";

/// State required to test the REST layer against an in-memory database and a controllable clock.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: RegistryDriver,
    app: Router,
}

impl TestContext {
    /// Initializes the test context with defaults and the administrator account seeded.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crate::db::sqlite::testutils::setup().await);
        let clock = Arc::from(SettableClock::new(base_time()));
        let driver = RegistryDriver::new(
            db.clone(),
            clock.clone(),
            tokens::testutils::new_provider(),
        );
        driver
            .clone()
            .seed_admin(EmailAddress::from(ADMIN_EMAIL), Password::from(ADMIN_PASSWORD))
            .await
            .unwrap();
        let app = crate::rest::app(driver.clone());
        Self { db, clock, driver, app }
    }

    /// Returns the application router under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Returns the database the application is backed by.
    pub(crate) fn db(&self) -> &Arc<dyn Db + Send + Sync> {
        &self.db
    }

    /// Returns the clock the application is backed by.
    pub(crate) fn clock(&self) -> &Arc<SettableClock> {
        &self.clock
    }

    /// Returns a new driver sharing this context's state, to prepare or inspect records without
    /// going through the API.
    pub(crate) fn driver(&self) -> RegistryDriver {
        self.driver.clone()
    }

    /// Mints a valid bearer token for the administrator as of the current fake time.
    pub(crate) fn bearer(&self) -> String {
        tokens::testutils::new_provider()
            .issue(&EmailAddress::from(ADMIN_EMAIL), self.clock.now_utc())
            .unwrap()
            .as_str()
            .to_owned()
    }
}

/// Builder for a single request to the API server.
#[must_use]
pub(crate) struct OneShotBuilder {
    /// The router for the app being tested.
    app: Router,

    /// Builder for the request that will be sent to the app.
    builder: axum::http::request::Builder,
}

impl OneShotBuilder {
    /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
    pub(crate) fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
        let builder = Request::builder().method(method).uri(uri.as_ref());
        Self { app, builder }
    }

    /// Extends the URI in the request with a `query`.
    pub(crate) fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
        let uri = self.builder.uri_ref().unwrap().to_string();
        assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
        self.builder =
            self.builder.uri(format!("{}?{}", uri, serde_urlencoded::to_string(query).unwrap()));
        self
    }

    /// Adds bearer authentication to the request.
    pub(crate) fn with_bearer_auth<T>(mut self, token: T) -> Self
    where
        T: fmt::Display,
    {
        let value = format!("Bearer {}", token);
        self.builder = self.builder.header(http::header::AUTHORIZATION, value);
        self
    }

    /// Sets the header `name` to `value` in the outgoing request.
    pub(crate) fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Finishes building the request and sends it with an empty payload.
    pub(crate) async fn send_empty(self) -> ResponseChecker {
        let request = self.builder.body(axum::body::Body::empty()).unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a text payload.
    pub(crate) async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
            .body(axum::body::Body::from(text.into()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a JSON payload.
    pub(crate) async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }
}

/// Type alias for the complex type returned by the `oneshot` function.
type HttpResponse = axum::response::Response;

/// Validator for the outcome of a request sent by a `OneShotBuilder`.
#[must_use]
pub(crate) struct ResponseChecker {
    /// Actual response that we received from the app.
    response: HttpResponse,

    /// Expected HTTP status code in the response above.
    exp_status: http::StatusCode,
}

impl From<HttpResponse> for ResponseChecker {
    fn from(response: HttpResponse) -> Self {
        Self { response, exp_status: http::StatusCode::OK }
    }
}

impl ResponseChecker {
    /// Sets the expected exit HTTP status to `status`.
    pub(crate) fn expect_status(mut self, status: http::StatusCode) -> Self {
        self.exp_status = status;
        self
    }

    /// Performs common validation operations on the response.
    pub(crate) fn verify(&self) {
        assert_eq!(self.exp_status, self.response.status());
    }

    /// Finishes checking the response and expects it to contain an empty body.
    pub(crate) async fn expect_empty(self) {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.is_empty(), "Body not empty; got {}", body);
    }

    /// Finishes checking the response and expects its body to be an error envelope whose
    /// message matches `exp_re`.
    ///
    /// Returns the envelope so that callers can inspect the remaining details.
    pub(crate) async fn expect_error(self, exp_re: &str) -> ErrorResponse {
        self.verify();
        let exp_status = self.exp_status;

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let response: ErrorResponse = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(e) => {
                let body = String::from_utf8(body.to_vec()).unwrap();
                panic!("Invalid error response due to {}; content was {}", e, body);
            }
        };

        assert_eq!(exp_status.as_u16(), response.status);
        let re = regex::Regex::new(exp_re).unwrap();
        assert!(
            re.is_match(&response.message),
            "Response content '{:?}' does not match re '{}'",
            response,
            exp_re
        );
        response
    }

    /// Finishes checking the response and expects it to contain a valid JSON object of type `T`.
    pub(crate) async fn expect_json<T: DeserializeOwned>(self) -> T {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        serde_json::from_slice::<T>(&body).unwrap()
    }
}
