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

//! Queries to manipulate driver records.
//!
//! The vehicle types of a driver live in the `driver_vehicle_types` join table, so the row
//! conversions in this module yield records with an empty set and every query attaches the real
//! set before returning.

use crate::db::filter::{self, PlaceholderStyle};
use crate::db::{postgres, sqlite, DbError, DbResult, Executor};
use crate::model::{
    Driver, DriverFilter, DriverId, DriverSortBy, EmailAddress, Page, PageRequest, SortDirection,
    StateCode, VehicleType,
};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

impl TryFrom<PgRow> for Driver {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let phone: Option<String> = row.try_get("phone").map_err(postgres::map_sqlx_error)?;
        let city: String = row.try_get("city").map_err(postgres::map_sqlx_error)?;
        let state: String = row.try_get("state").map_err(postgres::map_sqlx_error)?;
        let is_active: bool = row.try_get("is_active").map_err(postgres::map_sqlx_error)?;
        let created_at = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        let email = match email {
            Some(email) => Some(EmailAddress::new(email)?),
            None => None,
        };

        Ok(Driver::new(
            DriverId::from_uuid(id),
            name,
            email,
            phone,
            city,
            StateCode::new(&state)?,
            BTreeSet::default(),
            is_active,
            created_at,
            updated_at,
        ))
    }
}

impl TryFrom<SqliteRow> for Driver {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let phone: Option<String> = row.try_get("phone").map_err(sqlite::map_sqlx_error)?;
        let city: String = row.try_get("city").map_err(sqlite::map_sqlx_error)?;
        let state: String = row.try_get("state").map_err(sqlite::map_sqlx_error)?;
        let is_active: bool = row.try_get("is_active").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 =
            row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 =
            row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let id = Uuid::parse_str(&id)
            .map_err(|e| DbError::DataIntegrityError(format!("Invalid id: {}", e)))?;

        let email = match email {
            Some(email) => Some(EmailAddress::new(email)?),
            None => None,
        };

        Ok(Driver::new(
            DriverId::from_uuid(id),
            name,
            email,
            phone,
            city,
            StateCode::new(&state)?,
            BTreeSet::default(),
            is_active,
            sqlite::build_timestamp(created_at_secs, created_at_nsecs)?,
            sqlite::build_timestamp(updated_at_secs, updated_at_nsecs)?,
        ))
    }
}

/// Renders the `ORDER BY` expression of a search for PostgreSQL.
fn order_by_postgres(sort_by: DriverSortBy, direction: SortDirection) -> String {
    let dir = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    let column = match sort_by {
        DriverSortBy::Name => "name",
        DriverSortBy::Email => "email",
        DriverSortBy::CreatedAt => "created_at",
        DriverSortBy::UpdatedAt => "updated_at",
        DriverSortBy::City => "city",
        DriverSortBy::State => "state",
    };
    format!("{} {}", column, dir)
}

/// Renders the `ORDER BY` expression of a search for SQLite.
///
/// Timestamps are stored as two columns so ordering by them has to consider both.
fn order_by_sqlite(sort_by: DriverSortBy, direction: SortDirection) -> String {
    let dir = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    match sort_by {
        DriverSortBy::Name => format!("name {}", dir),
        DriverSortBy::Email => format!("email {}", dir),
        DriverSortBy::CreatedAt => {
            format!("created_at_secs {}, created_at_nsecs {}", dir, dir)
        }
        DriverSortBy::UpdatedAt => {
            format!("updated_at_secs {}, updated_at_nsecs {}", dir, dir)
        }
        DriverSortBy::City => format!("city {}", dir),
        DriverSortBy::State => format!("state {}", dir),
    }
}

/// Persists a new `driver` record with its vehicle types.
pub(crate) async fn create_driver(ex: &mut Executor, driver: &Driver) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO drivers
                    (id, name, email, phone, city, state, is_active, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";
            let done = sqlx::query(query_str)
                .bind(driver.id().as_uuid())
                .bind(driver.name())
                .bind(driver.email().as_ref().map(EmailAddress::as_str))
                .bind(driver.phone())
                .bind(driver.city())
                .bind(driver.state().as_str())
                .bind(driver.is_active())
                .bind(driver.created_at())
                .bind(driver.updated_at())
                .execute(&mut *ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError("Insertion affected more than one row".into()));
            }

            for vehicle_type in driver.vehicle_types() {
                let query_str = "
                    INSERT INTO driver_vehicle_types (driver_id, vehicle_type) VALUES ($1, $2)";
                sqlx::query(query_str)
                    .bind(driver.id().as_uuid())
                    .bind(vehicle_type.as_str())
                    .execute(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
            Ok(())
        }

        Executor::Sqlite(ex) => {
            let (created_at_secs, created_at_nsecs) =
                sqlite::unpack_timestamp(*driver.created_at());
            let (updated_at_secs, updated_at_nsecs) =
                sqlite::unpack_timestamp(*driver.updated_at());

            let query_str = "
                INSERT INTO drivers
                    (id, name, email, phone, city, state, is_active,
                     created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(driver.id().to_string())
                .bind(driver.name())
                .bind(driver.email().as_ref().map(EmailAddress::as_str))
                .bind(driver.phone())
                .bind(driver.city())
                .bind(driver.state().as_str())
                .bind(driver.is_active())
                .bind(created_at_secs)
                .bind(created_at_nsecs)
                .bind(updated_at_secs)
                .bind(updated_at_nsecs)
                .execute(&mut *ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError("Insertion affected more than one row".into()));
            }

            for vehicle_type in driver.vehicle_types() {
                let query_str = "
                    INSERT INTO driver_vehicle_types (driver_id, vehicle_type) VALUES (?, ?)";
                sqlx::query(query_str)
                    .bind(driver.id().to_string())
                    .bind(vehicle_type.as_str())
                    .execute(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
            Ok(())
        }
    }
}

/// Updates all caller-editable fields of the stored `driver` and replaces its vehicle types.
pub(crate) async fn update_driver(ex: &mut Executor, driver: &Driver) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE drivers
                SET name = $1, email = $2, phone = $3, city = $4, state = $5, is_active = $6,
                    updated_at = $7
                WHERE id = $8";
            let done = sqlx::query(query_str)
                .bind(driver.name())
                .bind(driver.email().as_ref().map(EmailAddress::as_str))
                .bind(driver.phone())
                .bind(driver.city())
                .bind(driver.state().as_str())
                .bind(driver.is_active())
                .bind(driver.updated_at())
                .bind(driver.id().as_uuid())
                .execute(&mut *ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match done.rows_affected() {
                0 => return Err(DbError::NotFound),
                1 => (),
                _ => {
                    return Err(DbError::BackendError(
                        "Update affected more than one row".into(),
                    ))
                }
            }

            let query_str = "DELETE FROM driver_vehicle_types WHERE driver_id = $1";
            sqlx::query(query_str)
                .bind(driver.id().as_uuid())
                .execute(&mut *ex)
                .await
                .map_err(postgres::map_sqlx_error)?;

            for vehicle_type in driver.vehicle_types() {
                let query_str = "
                    INSERT INTO driver_vehicle_types (driver_id, vehicle_type) VALUES ($1, $2)";
                sqlx::query(query_str)
                    .bind(driver.id().as_uuid())
                    .bind(vehicle_type.as_str())
                    .execute(&mut *ex)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
            Ok(())
        }

        Executor::Sqlite(ex) => {
            let (updated_at_secs, updated_at_nsecs) =
                sqlite::unpack_timestamp(*driver.updated_at());

            let query_str = "
                UPDATE drivers
                SET name = ?, email = ?, phone = ?, city = ?, state = ?, is_active = ?,
                    updated_at_secs = ?, updated_at_nsecs = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(driver.name())
                .bind(driver.email().as_ref().map(EmailAddress::as_str))
                .bind(driver.phone())
                .bind(driver.city())
                .bind(driver.state().as_str())
                .bind(driver.is_active())
                .bind(updated_at_secs)
                .bind(updated_at_nsecs)
                .bind(driver.id().to_string())
                .execute(&mut *ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match done.rows_affected() {
                0 => return Err(DbError::NotFound),
                1 => (),
                _ => {
                    return Err(DbError::BackendError(
                        "Update affected more than one row".into(),
                    ))
                }
            }

            let query_str = "DELETE FROM driver_vehicle_types WHERE driver_id = ?";
            sqlx::query(query_str)
                .bind(driver.id().to_string())
                .execute(&mut *ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;

            for vehicle_type in driver.vehicle_types() {
                let query_str = "
                    INSERT INTO driver_vehicle_types (driver_id, vehicle_type) VALUES (?, ?)";
                sqlx::query(query_str)
                    .bind(driver.id().to_string())
                    .bind(vehicle_type.as_str())
                    .execute(&mut *ex)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
            Ok(())
        }
    }
}

/// Fetches the record identified by `id` with its vehicle types attached.
///
/// Soft-deleted records are returned as is.  It is up to the business layer to decide whether
/// they should be visible.
pub(crate) async fn get_driver(ex: &mut Executor, id: DriverId) -> DbResult<Driver> {
    let driver = match &mut *ex {
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM drivers WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_one(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Driver::try_from(row)?
        }

        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM drivers WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Driver::try_from(row)?
        }
    };

    let vehicle_types = get_vehicle_types(ex, id).await?;
    Ok(driver.with_vehicle_types(vehicle_types))
}

/// Fetches the vehicle types associated with the driver identified by `id`.
pub(crate) async fn get_vehicle_types(
    ex: &mut Executor,
    id: DriverId,
) -> DbResult<BTreeSet<VehicleType>> {
    let raw: Vec<String> = match ex {
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT vehicle_type FROM driver_vehicle_types WHERE driver_id = $1";
            let rows = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_all(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get("vehicle_type").map_err(postgres::map_sqlx_error))
                .collect::<DbResult<Vec<String>>>()?
        }

        Executor::Sqlite(ex) => {
            let query_str =
                "SELECT vehicle_type FROM driver_vehicle_types WHERE driver_id = ?";
            let rows = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_all(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get("vehicle_type").map_err(sqlite::map_sqlx_error))
                .collect::<DbResult<Vec<String>>>()?
        }
    };

    let mut vehicle_types = BTreeSet::default();
    for name in raw {
        vehicle_types.insert(VehicleType::from_str(&name)?);
    }
    Ok(vehicle_types)
}

/// Runs a paginated search over the active driver records.
pub(crate) async fn search_drivers(
    ex: &mut Executor,
    filter: &DriverFilter,
    request: &PageRequest,
) -> DbResult<Page<Driver>> {
    let predicates = filter::compose(filter);
    let limit = *request.size();
    let offset = u64::from(*request.page()) * u64::from(limit);

    let (total, drivers) = match &mut *ex {
        Executor::Postgres(ex) => {
            let clause = filter::render_where(&predicates, PlaceholderStyle::Numbered);

            let query_str =
                format!("SELECT COUNT(*) AS count FROM drivers WHERE {}", clause.sql);
            let mut query = sqlx::query(&query_str);
            for bind in &clause.binds {
                query = query.bind(bind);
            }
            let row = query.fetch_one(&mut *ex).await.map_err(postgres::map_sqlx_error)?;
            let count: i64 = row.try_get("count").map_err(postgres::map_sqlx_error)?;
            let total = u64::try_from(count)
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid count: {}", e)))?;

            let query_str = format!(
                "SELECT * FROM drivers WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
                clause.sql,
                order_by_postgres(*request.sort_by(), *request.direction()),
                limit,
                offset,
            );
            let mut query = sqlx::query(&query_str);
            for bind in &clause.binds {
                query = query.bind(bind);
            }
            let rows = query.fetch_all(&mut *ex).await.map_err(postgres::map_sqlx_error)?;
            let drivers =
                rows.into_iter().map(Driver::try_from).collect::<DbResult<Vec<Driver>>>()?;
            (total, drivers)
        }

        Executor::Sqlite(ex) => {
            let clause = filter::render_where(&predicates, PlaceholderStyle::Anonymous);

            let query_str =
                format!("SELECT COUNT(*) AS count FROM drivers WHERE {}", clause.sql);
            let mut query = sqlx::query(&query_str);
            for bind in &clause.binds {
                query = query.bind(bind);
            }
            let row = query.fetch_one(&mut *ex).await.map_err(sqlite::map_sqlx_error)?;
            let count: i64 = row.try_get("count").map_err(sqlite::map_sqlx_error)?;
            let total = u64::try_from(count)
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid count: {}", e)))?;

            let query_str = format!(
                "SELECT * FROM drivers WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
                clause.sql,
                order_by_sqlite(*request.sort_by(), *request.direction()),
                limit,
                offset,
            );
            let mut query = sqlx::query(&query_str);
            for bind in &clause.binds {
                query = query.bind(bind);
            }
            let rows = query.fetch_all(&mut *ex).await.map_err(sqlite::map_sqlx_error)?;
            let drivers =
                rows.into_iter().map(Driver::try_from).collect::<DbResult<Vec<Driver>>>()?;
            (total, drivers)
        }
    };

    let mut content = Vec::with_capacity(drivers.len());
    for driver in drivers {
        let id = *driver.id();
        let vehicle_types = get_vehicle_types(ex, id).await?;
        content.push(driver.with_vehicle_types(vehicle_types));
    }
    Ok(Page::new(content, request, total))
}
