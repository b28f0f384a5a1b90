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

//! Composition of driver search filters into SQL `WHERE` clauses.
//!
//! Filters are first turned into a backend-agnostic list of predicates and then rendered into
//! SQL text with the placeholder style of the target database.  The rendered clause and its bind
//! values are kept separate so that all user-supplied values go through sqlx's bindings.

use crate::model::{DriverFilter, VehicleType};
use std::collections::BTreeSet;

/// A single condition over the `drivers` table.
#[derive(Debug, PartialEq)]
pub(crate) enum Predicate {
    /// Restricts results to records that have not been soft-deleted.
    IsActive,

    /// Case-insensitive substring match over the name, email and phone columns.
    TextMatch(String),

    /// Case-insensitive equality on the city column.
    CityMatch(String),

    /// Equality on the uppercased state column.
    StateMatch(String),

    /// Requires the driver to operate at least one of the given vehicle types.
    VehicleTypesOverlap(BTreeSet<VehicleType>),
}

/// Placeholder syntax of the target database.
#[derive(Clone, Copy)]
pub(crate) enum PlaceholderStyle {
    /// Numbered `$1`-style placeholders as used by PostgreSQL.
    Numbered,

    /// Anonymous `?`-style placeholders as used by SQLite.
    Anonymous,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-indexed bind position `n`.
    fn placeholder(&self, n: usize) -> String {
        match self {
            PlaceholderStyle::Numbered => format!("${}", n),
            PlaceholderStyle::Anonymous => "?".to_owned(),
        }
    }
}

/// A rendered `WHERE` clause and the values to bind to it, in order.
pub(crate) struct WhereClause {
    /// SQL text of the clause, without the `WHERE` keyword.
    pub(crate) sql: String,

    /// String values to bind to the clause's placeholders, in positional order.
    pub(crate) binds: Vec<String>,
}

/// Converts a search filter into the list of predicates to apply.
///
/// Blank fields do not contribute predicates, but fields that carry any non-whitespace content
/// are matched with their original, untrimmed value.  The active-records predicate is always
/// present and always comes first.
pub(crate) fn compose(filter: &DriverFilter) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::IsActive];

    if let Some(text) = filter.text() {
        if !text.trim().is_empty() {
            predicates.push(Predicate::TextMatch(text.clone()));
        }
    }

    if let Some(city) = filter.city() {
        if !city.trim().is_empty() {
            predicates.push(Predicate::CityMatch(city.clone()));
        }
    }

    if let Some(state) = filter.state() {
        if !state.trim().is_empty() {
            predicates.push(Predicate::StateMatch(state.clone()));
        }
    }

    if !filter.vehicle_types().is_empty() {
        predicates.push(Predicate::VehicleTypesOverlap(filter.vehicle_types().clone()));
    }

    predicates
}

/// Renders `predicates` into a `WHERE` clause using the given placeholder style.
pub(crate) fn render_where(predicates: &[Predicate], style: PlaceholderStyle) -> WhereClause {
    let mut conditions = Vec::with_capacity(predicates.len());
    let mut binds = vec![];

    for predicate in predicates {
        match predicate {
            Predicate::IsActive => {
                conditions.push("is_active = TRUE".to_owned());
            }

            Predicate::TextMatch(text) => {
                let pattern = format!("%{}%", text.to_lowercase());
                conditions.push(format!(
                    "(LOWER(name) LIKE {} OR LOWER(COALESCE(email, '')) LIKE {} \
                     OR LOWER(COALESCE(phone, '')) LIKE {})",
                    style.placeholder(binds.len() + 1),
                    style.placeholder(binds.len() + 2),
                    style.placeholder(binds.len() + 3),
                ));
                binds.push(pattern.clone());
                binds.push(pattern.clone());
                binds.push(pattern);
            }

            Predicate::CityMatch(city) => {
                conditions.push(format!("LOWER(city) = {}", style.placeholder(binds.len() + 1)));
                binds.push(city.to_lowercase());
            }

            Predicate::StateMatch(state) => {
                conditions.push(format!("state = {}", style.placeholder(binds.len() + 1)));
                binds.push(state.to_uppercase());
            }

            Predicate::VehicleTypesOverlap(types) => {
                let placeholders = (0..types.len())
                    .map(|i| style.placeholder(binds.len() + 1 + i))
                    .collect::<Vec<String>>()
                    .join(", ");
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM driver_vehicle_types \
                     WHERE driver_id = drivers.id AND vehicle_type IN ({}))",
                    placeholders
                ));
                for vehicle_type in types {
                    binds.push(vehicle_type.as_str().to_owned());
                }
            }
        }
    }

    WhereClause { sql: conditions.join(" AND "), binds }
}
