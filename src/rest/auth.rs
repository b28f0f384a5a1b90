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

//! Bearer-token authentication for the protected APIs.

use crate::driver::RegistryDriver;
use crate::rest::{get_unique_header, RestError, RestResult};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that rejects any request without a valid bearer token.
pub(super) async fn require_bearer(
    State(driver): State<RegistryDriver>,
    request: Request,
    next: Next,
) -> RestResult<Response> {
    let value = get_unique_header(request.headers(), &header::AUTHORIZATION)?
        .ok_or_else(|| RestError::Unauthorized("Missing authorization header".to_owned()))?;
    let value = value
        .to_str()
        .map_err(|e| RestError::InvalidRequest(format!("Invalid authorization header: {}", e)))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| RestError::Unauthorized("Invalid authorization scheme".to_owned()))?;

    driver.validate_token(token).map_err(RestError::from)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use crate::rest::testutils::*;
    use axum::http;

    // Exercises the middleware through one representative protected route.
    fn route() -> (http::Method, String) {
        (http::Method::GET, "/drivers".to_owned())
    }

    #[tokio::test]
    async fn test_missing_header() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Missing authorization header")
            .await;
    }

    #[tokio::test]
    async fn test_duplicate_header() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_header(http::header::AUTHORIZATION, format!("Bearer {}", context.bearer()))
            .with_header(http::header::AUTHORIZATION, "Bearer something-else")
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("cannot have more than one value")
            .await;
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_header(http::header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid authorization scheme")
            .await;
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth("this-is-not-a-token")
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid or expired token")
            .await;
    }

    #[tokio::test]
    async fn test_expired_token() {
        let context = TestContext::setup().await;
        let token = context.bearer();

        context.clock().advance(std::time::Duration::from_secs(3600));
        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token)
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid or expired token")
            .await;
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(context.bearer())
            .send_empty()
            .await
            .expect_status(http::StatusCode::OK)
            .verify();
    }

    #[tokio::test]
    async fn test_login_is_not_protected() {
        let context = TestContext::setup().await;

        // No authorization header at all: the route must still be reachable and fail only
        // because of the credentials themselves.
        OneShotBuilder::new(context.app(), (http::Method::POST, "/auth/login".to_owned()))
            .send_json(serde_json::json!({
                "email": "nobody@example.com",
                "password": "nope",
            }))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid credentials")
            .await;
    }
}
