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

//! Extends the driver with the administrator seeding operation.

use crate::db::{self, DbError};
use crate::driver::{DriverResult, RegistryDriver};
use crate::model::{EmailAddress, Password, User};
use log::info;

impl RegistryDriver {
    /// Ensures that the administrator account exists, creating it on first startup.
    ///
    /// If the account already exists its stored credentials win, even if the configured password
    /// has changed since.
    pub(crate) async fn seed_admin(
        self,
        email: EmailAddress,
        password: Password,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        match db::get_user_by_email(tx.ex(), &email).await {
            Ok(_) => return Ok(()),
            Err(DbError::NotFound) => (),
            Err(e) => return Err(e.into()),
        }

        let user = User::new(email.clone(), password.hash()?, true);
        db::create_user(tx.ex(), &user).await?;
        tx.commit().await?;

        info!("Seeded administrator account {}", email.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::driver::testutils::*;
    use crate::model::{EmailAddress, Password};

    #[tokio::test]
    async fn test_seed_admin_creates_active_user() {
        let context = TestContext::setup().await;

        context
            .driver()
            .seed_admin(EmailAddress::from("admin@example.com"), Password::from("the password"))
            .await
            .unwrap();

        let mut ex = context.db().ex().await.unwrap();
        let user =
            db::get_user_by_email(&mut ex, &EmailAddress::from("admin@example.com"))
                .await
                .unwrap();
        assert!(user.active());
        assert!(user.password().as_str().starts_with("$2b$10$"));
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let context = TestContext::setup().await;

        context
            .driver()
            .seed_admin(EmailAddress::from("admin@example.com"), Password::from("first"))
            .await
            .unwrap();
        context
            .driver()
            .seed_admin(EmailAddress::from("admin@example.com"), Password::from("second"))
            .await
            .unwrap();

        // The original credentials survive a reseed attempt.
        context
            .driver()
            .login(EmailAddress::from("admin@example.com"), Password::from("first"))
            .await
            .unwrap();
    }
}
