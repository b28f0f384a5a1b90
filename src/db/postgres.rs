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

//! Common utilities to interact with a PostgreSQL database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use log::{info, warn};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, Postgres};
use sqlx::{Describe, Either, Transaction};
use std::time::Duration;

/// Maximum number of connections to allow when not overridden.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default number of retries when the database is not available at connection time.
const DEFAULT_MAX_RETRIES: u32 = 60;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::Database(e) => match e.downcast_ref::<PgDatabaseError>().code() {
            "23503" => DbError::NotFound,      // foreign_key_violation
            "23505" => DbError::AlreadyExists, // unique_violation
            "53300" => DbError::Unavailable,   // too_many_connections
            number => DbError::BackendError(format!("pgsql error {}: {}", number, e)),
        },
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection against a PostgreSQL database.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 5432).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    pub password: String,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: u32,

    /// Maximum number of connections to allow against the database.
    pub max_connections: u32,

    /// Maximum number of connection attempts before giving up.
    pub max_retries: u32,
}

impl Default for PostgresOptions {
    fn default() -> Self {
        Self {
            host: String::default(),
            port: u16::default(),
            database: String::default(),
            username: String::default(),
            password: String::default(),
            min_connections: 0,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME` and `<prefix>_PASSWORD`.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_required_var::<u16>(prefix, "PORT")?,
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?.unwrap_or(0),
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            max_retries: get_optional_var::<u32>(prefix, "MAX_RETRIES")?
                .unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

/// A generic database executor implementation for PostgreSQL.
#[derive(Debug)]
pub enum PostgresExecutor {
    /// An executor backed by a pool.  Operations issued via this executor aren't guaranteed to
    /// happen on the same connection.
    PoolExec(PoolConnection<Postgres>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Postgres>),
}

impl PostgresExecutor {
    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            PostgresExecutor::PoolExec(_) => {
                unreachable!("Do not call commit on direct executors")
            }
            PostgresExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

impl<'c> sqlx::Executor<'c> for &'c mut PostgresExecutor {
    type Database = Postgres;

    fn fetch_many<'e, 'q: 'e, E>(
        self,
        query: E,
    ) -> BoxStream<
        'e,
        Result<
            Either<
                <Self::Database as sqlx::Database>::QueryResult,
                <Self::Database as sqlx::Database>::Row,
            >,
            sqlx::Error,
        >,
    >
    where
        'c: 'e,
        E: 'q + sqlx::Execute<'q, Self::Database>,
    {
        match self {
            PostgresExecutor::PoolExec(conn) => conn.fetch_many(query),
            PostgresExecutor::TxExec(tx) => tx.fetch_many(query),
        }
    }

    fn fetch_optional<'e, 'q: 'e, E>(
        self,
        query: E,
    ) -> BoxFuture<'e, Result<Option<<Self::Database as sqlx::Database>::Row>, sqlx::Error>>
    where
        'c: 'e,
        E: 'q + sqlx::Execute<'q, Self::Database>,
    {
        match self {
            PostgresExecutor::PoolExec(conn) => conn.fetch_optional(query),
            PostgresExecutor::TxExec(tx) => tx.fetch_optional(query),
        }
    }

    fn prepare_with<'e, 'q: 'e>(
        self,
        sql: &'q str,
        parameters: &'e [<Self::Database as sqlx::Database>::TypeInfo],
    ) -> BoxFuture<'e, Result<<Self::Database as sqlx::Database>::Statement<'q>, sqlx::Error>>
    where
        'c: 'e,
    {
        match self {
            PostgresExecutor::PoolExec(conn) => conn.prepare_with(sql, parameters),
            PostgresExecutor::TxExec(tx) => tx.prepare_with(sql, parameters),
        }
    }

    fn describe<'e, 'q: 'e>(
        self,
        sql: &'q str,
    ) -> BoxFuture<'e, Result<Describe<Self::Database>, sqlx::Error>>
    where
        'c: 'e,
    {
        match self {
            PostgresExecutor::PoolExec(conn) => conn.describe(sql),
            PostgresExecutor::TxExec(tx) => tx.describe(sql),
        }
    }
}

/// Shared connection to a PostgreSQL database.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: PgPool,

    /// Maximum number of connection attempts before giving up.
    max_retries: u32,
}

impl PostgresDb {
    /// Creates a new connection based on the given options.
    ///
    /// Note that this does not block until the connection is actually established because we use
    /// a lazy pool.  The first use of the pool will report errors, if any, and will retry as
    /// configured in the options.
    pub fn connect(opts: PostgresOptions) -> DbResult<PostgresDb> {
        let pg_options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password);

        let pool = PgPoolOptions::new()
            .min_connections(opts.min_connections)
            .max_connections(opts.max_connections)
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy_with(pg_options);

        Ok(PostgresDb { pool, max_retries: opts.max_retries })
    }

    /// Acquires a connection from the pool, retrying up to `max_retries` times when the server
    /// is not yet available.
    async fn acquire_with_retries(&self) -> DbResult<PoolConnection<Postgres>> {
        let mut retries = self.max_retries;
        loop {
            match self.pool.acquire().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    let e = map_sqlx_error(e);
                    if retries == 0 || e != DbError::Unavailable {
                        return Err(e);
                    }
                    retries -= 1;

                    let ms = u64::from(100 + rand::random::<u16>() % 900);
                    info!("Database is not available yet; retrying in {}ms", ms);
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                }
            }
        }
    }
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
            if cfg!(debug_assertions) {
                panic!("Dropping connection without having called close() first");
            }
        }
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.acquire_with_retries().await?;
        Ok(Executor::Postgres(PostgresExecutor::PoolExec(conn)))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Postgres(PostgresExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(e: &mut PostgresExecutor, schema: &str) -> DbResult<()> {
    // Strip out comments from the schema so that we can safely separate the statements by
    // looking for semicolons.
    let schema = regex::RegexBuilder::new("--.*$")
        .multi_line(true)
        .build()
        .expect("Hardcoded regex must be valid")
        .replace_all(schema, "");

    for query_str in schema.split(';') {
        if query_str.trim().is_empty() {
            continue;
        }
        sqlx::query(query_str).execute(&mut *e).await.map_err(map_sqlx_error)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use crate::db::testutils::generate_tests;
    use std::sync::Arc;

    #[test]
    fn test_postgres_options_from_env_all_present() {
        temp_env::with_vars(
            [
                ("PGSQL_HOST", Some("the-host")),
                ("PGSQL_PORT", Some("1234")),
                ("PGSQL_DATABASE", Some("the-database")),
                ("PGSQL_USERNAME", Some("the-username")),
                ("PGSQL_PASSWORD", Some("the-password")),
                ("PGSQL_MIN_CONNECTIONS", Some("10")),
                ("PGSQL_MAX_CONNECTIONS", Some("20")),
                ("PGSQL_MAX_RETRIES", Some("30")),
            ],
            || {
                let opts = PostgresOptions::from_env("PGSQL").unwrap();
                assert_eq!(
                    PostgresOptions {
                        host: "the-host".to_owned(),
                        port: 1234,
                        database: "the-database".to_owned(),
                        username: "the-username".to_owned(),
                        password: "the-password".to_owned(),
                        min_connections: 10,
                        max_connections: 20,
                        max_retries: 30,
                    },
                    opts
                );
            },
        );
    }

    #[test]
    fn test_postgres_options_from_env_required_only() {
        temp_env::with_vars(
            [
                ("PGSQL_HOST", Some("the-host")),
                ("PGSQL_PORT", Some("1234")),
                ("PGSQL_DATABASE", Some("the-database")),
                ("PGSQL_USERNAME", Some("the-username")),
                ("PGSQL_PASSWORD", Some("the-password")),
                ("PGSQL_MIN_CONNECTIONS", None),
                ("PGSQL_MAX_CONNECTIONS", None),
                ("PGSQL_MAX_RETRIES", None),
            ],
            || {
                let opts = PostgresOptions::from_env("PGSQL").unwrap();
                assert_eq!(0, opts.min_connections);
                assert_eq!(DEFAULT_MAX_CONNECTIONS, opts.max_connections);
                assert_eq!(DEFAULT_MAX_RETRIES, opts.max_retries);
            },
        );
    }

    #[test]
    fn test_postgres_options_from_env_missing() {
        temp_env::with_vars(
            [("PGSQL_HOST", Some("the-host")), ("PGSQL_PORT", None::<&str>)],
            || {
                let err = PostgresOptions::from_env("PGSQL").unwrap_err();
                assert!(err.contains("PGSQL_PORT not present"));
            },
        );
    }

    #[test]
    fn test_postgres_options_from_env_invalid_port() {
        temp_env::with_vars(
            [("PGSQL_HOST", Some("the-host")), ("PGSQL_PORT", Some("not a number"))],
            || {
                let err = PostgresOptions::from_env("PGSQL").unwrap_err();
                assert!(
                    err.starts_with("Invalid type in environment variable PGSQL_PORT: Invalid u16")
                );
            },
        );
    }

    generate_tests!(
        #[ignore = "Requires environment configuration and is expensive"],
        {
            let db: Arc<dyn Db + Send + Sync> = Arc::from(setup().await);
            db
        },
        crate::db::tests,
        test_users_create_and_get,
        test_users_get_missing,
        test_users_create_duplicate,
        test_drivers_create_and_get,
        test_drivers_get_missing,
        test_drivers_create_duplicate,
        test_drivers_update,
        test_drivers_update_missing,
        test_drivers_search_empty_filter_returns_active_only,
        test_drivers_search_text,
        test_drivers_search_city,
        test_drivers_search_state,
        test_drivers_search_vehicle_types_overlap,
        test_drivers_search_combined_filters,
        test_drivers_search_sorting,
        test_drivers_search_pagination,
        test_tx_rollback_on_drop
    );
}
