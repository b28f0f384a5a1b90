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

//! Queries to manipulate the service accounts that can log into the API.

use crate::db::{postgres, sqlite, DbError, DbResult, Executor};
use crate::model::{EmailAddress, HashedPassword, User};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(postgres::map_sqlx_error)?;
        let active: bool = row.try_get("is_active").map_err(postgres::map_sqlx_error)?;

        Ok(User::new(EmailAddress::new(email)?, HashedPassword::new(password), active))
    }
}

impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(sqlite::map_sqlx_error)?;
        let active: bool = row.try_get("is_active").map_err(sqlite::map_sqlx_error)?;

        Ok(User::new(EmailAddress::new(email)?, HashedPassword::new(password), active))
    }
}

/// Persists a new `user`.
pub(crate) async fn create_user(ex: &mut Executor, user: &User) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO users (email, password, is_active) VALUES ($1, $2, $3)";
            let done = sqlx::query(query_str)
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .bind(user.active())
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError("Insertion affected more than one row".into()));
            }
            Ok(())
        }

        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO users (email, password, is_active) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(user.email().as_str())
                .bind(user.password().as_str())
                .bind(user.active())
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError("Insertion affected more than one row".into()));
            }
            Ok(())
        }
    }
}

/// Looks up a user by its `email` address.
pub(crate) async fn get_user_by_email(ex: &mut Executor, email: &EmailAddress) -> DbResult<User> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "SELECT email, password, is_active FROM users WHERE email = $1";
            let row = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            User::try_from(row)
        }

        Executor::Sqlite(ex) => {
            let query_str = "SELECT email, password, is_active FROM users WHERE email = ?";
            let row = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            User::try_from(row)
        }
    }
}
