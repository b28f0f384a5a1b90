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

//! Extends the driver with the login operation.

use crate::db::{self, DbError};
use crate::driver::{DriverError, DriverResult, RegistryDriver};
use crate::model::{AccessToken, EmailAddress, Password};

impl RegistryDriver {
    /// Validates the credentials of a user and issues a bearer token for the session.
    ///
    /// An unknown email, a wrong password and a deactivated account all produce the exact same
    /// error so that a caller cannot probe for valid accounts.
    pub(crate) async fn login(
        self,
        email: EmailAddress,
        password: Password,
    ) -> DriverResult<AccessToken> {
        let now = self.clock.now_utc();

        let mut ex = self.db.ex().await?;
        let user = match db::get_user_by_email(&mut ex, &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Invalid credentials".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        if !user.active() {
            return Err(DriverError::Unauthorized("Invalid credentials".to_owned()));
        }

        match password.verify(user.password()) {
            Ok(true) => (),
            Ok(false) => {
                return Err(DriverError::Unauthorized("Invalid credentials".to_owned()));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(self.tokens.issue(&email, now)?)
    }
}
