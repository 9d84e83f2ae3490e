//! Temperature converter (Celsius, Fahrenheit)

use tandem_plugin::prelude::*;

const CELSIUS: Unit = Unit::Temperature(TemperatureUnit::Celsius);
const FAHRENHEIT: Unit = Unit::Temperature(TemperatureUnit::Fahrenheit);

static TEMPERATURE_UNITS: [UnitOption; 2] = [
    UnitOption::new(CELSIUS, "Celsius (°C)"),
    UnitOption::new(FAHRENHEIT, "Fahrenheit (°F)"),
];

static TEMPERATURE_ICON_PATHS: [&str; 2] = [
    "M15.362 5.214A8.252 8.252 0 0112 21 8.25 8.25 0 016.038 7.048 8.287 8.287 0 009 9.6a8.983 8.983 0 013.362-6.867 8.209 8.209 0 013 2.48Z",
    "M12 18a3.75 3.75 0 00.495-7.467 5.99 5.99 0 00-1.925 3.546 5.974 5.974 0 01-2.133-1A3.75 3.75 0 0012 18Z",
];

/// F = C * 9/5 + 32
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    (c * 9.0 / 5.0) + 32.0
}

/// C = (F - 32) * 5/9
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub struct TemperatureConverter;

impl ConverterPlugin for TemperatureConverter {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            id: "temperature",
            name: "Temperature",
            description: "Convert between Celsius and Fahrenheit",
        }
    }

    fn units(&self) -> &'static [UnitOption] {
        &TEMPERATURE_UNITS
    }

    fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
        match (from, to) {
            (Unit::Temperature(a), Unit::Temperature(b)) if a == b => Ok(value),
            (CELSIUS, FAHRENHEIT) => Ok(celsius_to_fahrenheit(value)),
            (FAHRENHEIT, CELSIUS) => Ok(fahrenheit_to_celsius(value)),
            _ => Err(ConversionError::Unsupported { from, to }),
        }
    }

    fn icon(&self) -> Option<Icon> {
        Some(Icon::new(&TEMPERATURE_ICON_PATHS))
    }
}
