//! Unit identifiers
//!
//! Each conversion domain owns a closed enumeration of units. `Unit` tags a
//! unit with its domain so a value is only meaningful inside the converter
//! that declared it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

/// Mass units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    Kilograms,
    Pounds,
}

/// A unit tagged with its conversion domain
///
/// Serializes as its bare key (`"CELSIUS"`), the same form clients send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Unit {
    Temperature(TemperatureUnit),
    Weight(WeightUnit),
}

impl Unit {
    /// Every unit known to the system, grouped by domain
    pub const ALL: [Unit; 4] = [
        Unit::Temperature(TemperatureUnit::Celsius),
        Unit::Temperature(TemperatureUnit::Fahrenheit),
        Unit::Weight(WeightUnit::Kilograms),
        Unit::Weight(WeightUnit::Pounds),
    ];

    /// Wire key, e.g. "CELSIUS"
    pub fn key(&self) -> &'static str {
        match self {
            Unit::Temperature(TemperatureUnit::Celsius) => "CELSIUS",
            Unit::Temperature(TemperatureUnit::Fahrenheit) => "FAHRENHEIT",
            Unit::Weight(WeightUnit::Kilograms) => "KILOGRAMS",
            Unit::Weight(WeightUnit::Pounds) => "POUNDS",
        }
    }

    /// Look up a unit by wire key (case-insensitive, surrounding whitespace ignored)
    pub fn from_key(key: &str) -> Option<Unit> {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|u| u.key().eq_ignore_ascii_case(key))
    }
}

impl From<TemperatureUnit> for Unit {
    fn from(unit: TemperatureUnit) -> Self {
        Unit::Temperature(unit)
    }
}

impl From<WeightUnit> for Unit {
    fn from(unit: WeightUnit) -> Self {
        Unit::Weight(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A selectable unit with its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitOption {
    pub value: Unit,
    pub label: &'static str,
}

impl UnitOption {
    pub const fn new(value: Unit, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Errors raised by a converter's conversion function
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The converter has no rule for this pair of units
    #[error("unsupported conversion: {from} -> {to}")]
    Unsupported { from: Unit, to: Unit },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(Unit::from_key("CELSIUS"), Some(Unit::Temperature(TemperatureUnit::Celsius)));
        assert_eq!(Unit::from_key(" pounds "), Some(Unit::Weight(WeightUnit::Pounds)));
        assert_eq!(Unit::from_key("KELVIN"), None);
    }

    #[test]
    fn test_key_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(Unit::from_key(unit.key()), Some(unit));
        }
    }

    #[test]
    fn test_serializes_as_bare_key() {
        let json = serde_json::to_string(&Unit::Weight(WeightUnit::Kilograms)).unwrap();
        assert_eq!(json, "\"KILOGRAMS\"");

        let unit: Unit = serde_json::from_str("\"FAHRENHEIT\"").unwrap();
        assert_eq!(unit, Unit::Temperature(TemperatureUnit::Fahrenheit));
    }
}
