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

//! The `StateCode` data type.

use crate::model::{ModelError, ModelResult};
use serde::Serialize;

/// A two-letter state abbreviation, always stored in its uppercase form.
///
/// Normalization happens at construction time so that any code holding a `StateCode` can rely on
/// the canonical representation, both for persistence and for equality comparisons.
#[derive(Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct StateCode(String);

impl StateCode {
    /// Creates a new state code from an untrusted string `s`, normalizing it to uppercase.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let s = s.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError(format!("State must be a two-letter code, got '{}'", s)));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns a string view of the state code.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&str> for StateCode {
    fn from(raw_code: &str) -> Self {
        Self::new(raw_code).expect("Hardcoded state codes for testing must be valid")
    }
}

#[cfg(test)]
impl<'de> serde::Deserialize<'de> for StateCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StateCode::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statecode_uppercases() {
        assert_eq!("SP", StateCode::new("sp").unwrap().as_str());
        assert_eq!("RJ", StateCode::new("rJ").unwrap().as_str());
        assert_eq!("MG", StateCode::new("MG").unwrap().as_str());
    }

    #[test]
    fn test_statecode_trims() {
        assert_eq!("SP", StateCode::new(" sp ").unwrap().as_str());
    }

    #[test]
    fn test_statecode_error() {
        assert!(StateCode::new("").is_err());
        assert!(StateCode::new("S").is_err());
        assert!(StateCode::new("SPX").is_err());
        assert!(StateCode::new("S1").is_err());
        assert!(StateCode::new("S P").is_err());
    }
}
