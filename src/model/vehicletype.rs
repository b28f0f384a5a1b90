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

//! The `VehicleType` data type.

use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The categories of vehicles a driver can operate.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum VehicleType {
    /// Small cargo van.
    Van,

    /// Single rear axle truck.
    Toco,

    /// Closed box truck.
    Bau,

    /// Curtain-sided truck.
    Sider,

    /// Two rear axle truck.
    Truck,

    /// Three rear axle truck.
    Bitruck,
}

impl VehicleType {
    /// Returns the canonical name used in the API and in the database.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Van => "VAN",
            VehicleType::Toco => "TOCO",
            VehicleType::Bau => "BAU",
            VehicleType::Sider => "SIDER",
            VehicleType::Truck => "TRUCK",
            VehicleType::Bitruck => "BITRUCK",
        }
    }
}

impl FromStr for VehicleType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VAN" => Ok(VehicleType::Van),
            "TOCO" => Ok(VehicleType::Toco),
            "BAU" => Ok(VehicleType::Bau),
            "SIDER" => Ok(VehicleType::Sider),
            "TRUCK" => Ok(VehicleType::Truck),
            "BITRUCK" => Ok(VehicleType::Bitruck),
            s => Err(ModelError(format!("Unknown vehicle type '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicletype_as_str_from_str_all() {
        for vehicle_type in [
            VehicleType::Van,
            VehicleType::Toco,
            VehicleType::Bau,
            VehicleType::Sider,
            VehicleType::Truck,
            VehicleType::Bitruck,
        ] {
            assert_eq!(vehicle_type, VehicleType::from_str(vehicle_type.as_str()).unwrap());
        }
    }

    #[test]
    fn test_vehicletype_from_str_error() {
        assert!(VehicleType::from_str("").is_err());
        assert!(VehicleType::from_str("van").is_err());
        assert!(VehicleType::from_str("CARRETA").is_err());
    }

    #[test]
    fn test_vehicletype_ser_de() {
        assert_eq!("\"BITRUCK\"", serde_json::to_string(&VehicleType::Bitruck).unwrap());
        assert_eq!(VehicleType::Van, serde_json::from_str::<VehicleType>("\"VAN\"").unwrap());
        assert!(serde_json::from_str::<VehicleType>("\"van\"").is_err());
    }
}
