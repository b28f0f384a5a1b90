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

//! Issuance and validation of the signed bearer tokens used by the REST layer.

use crate::env::{get_optional_var, get_required_var};
use crate::model::{AccessToken, EmailAddress, ModelError, ModelResult};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Default value for the `expiration_millis` configuration property (one hour).
const DEFAULT_EXPIRATION_MILLIS: u64 = 60 * 60 * 1000;

/// Options to configure the token provider.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct TokenOptions {
    /// Secret used to sign and verify tokens.
    pub secret: String,

    /// Lifetime of the issued tokens, in milliseconds.
    pub expiration_millis: u64,
}

impl TokenOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_JWT_SECRET` and `<prefix>_JWT_EXPIRATION_MILLIS`.
    pub fn from_env(prefix: &str) -> Result<TokenOptions, String> {
        Ok(TokenOptions {
            secret: get_required_var::<String>(prefix, "JWT_SECRET")?,
            expiration_millis: get_optional_var::<u64>(prefix, "JWT_EXPIRATION_MILLIS")?
                .unwrap_or(DEFAULT_EXPIRATION_MILLIS),
        })
    }
}

/// Claims carried by every token we issue.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct Claims {
    /// Email address of the user the token was issued to.
    pub(crate) sub: String,

    /// Issuance time as seconds since the epoch.
    pub(crate) iat: i64,

    /// Expiration time as seconds since the epoch.
    pub(crate) exp: i64,
}

/// Mints and verifies HS256-signed bearer tokens.
#[derive(Clone)]
pub(crate) struct TokenProvider {
    /// Key used to sign new tokens.
    encoding_key: EncodingKey,

    /// Key used to verify incoming tokens.
    decoding_key: DecodingKey,

    /// Lifetime of the issued tokens, in milliseconds.
    expiration_millis: u64,
}

impl TokenProvider {
    /// Creates a new provider from a set of options.
    pub(crate) fn new(opts: TokenOptions) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(opts.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(opts.secret.as_bytes()),
            expiration_millis: opts.expiration_millis,
        }
    }

    /// Issues a token for `subject` valid from `now` until the configured lifetime elapses.
    pub(crate) fn issue(
        &self,
        subject: &EmailAddress,
        now: OffsetDateTime,
    ) -> ModelResult<AccessToken> {
        let iat = now.unix_timestamp();
        let claims = Claims {
            sub: subject.as_str().to_owned(),
            iat,
            exp: iat + i64::try_from(self.expiration_millis / 1000).unwrap_or(i64::MAX),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ModelError(format!("Cannot sign token: {}", e)))?;
        Ok(AccessToken::new(token))
    }

    /// Verifies the signature of a raw token and checks that it has not expired as of `now`.
    ///
    /// All failures collapse into a single error so that callers cannot leak to the client why
    /// exactly a token was rejected.
    pub(crate) fn validate(&self, token: &str, now: OffsetDateTime) -> ModelResult<Claims> {
        // Expiration is checked by hand against the injected clock, not the system one.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| ModelError("Invalid or expired token".to_owned()))?;
        if data.claims.exp <= now.unix_timestamp() {
            return Err(ModelError("Invalid or expired token".to_owned()));
        }
        Ok(data.claims)
    }

    /// Lifetime of the issued tokens, in milliseconds.
    pub(crate) fn expiration_millis(&self) -> u64 {
        self.expiration_millis
    }
}

/// Test utilities.
#[cfg(test)]
pub(crate) mod testutils {
    use super::*;

    /// Creates a provider with a fixed secret and a one-hour lifetime for tests.
    pub(crate) fn new_provider() -> TokenProvider {
        TokenProvider::new(TokenOptions {
            secret: "test-secret".to_owned(),
            expiration_millis: DEFAULT_EXPIRATION_MILLIS,
        })
    }
}
