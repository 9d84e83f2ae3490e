//! Tandem Units - built-in converters
//!
//! - Temperature: Celsius, Fahrenheit
//! - Weight: kilograms, pounds
//!
//! Registration order is display order; the first converter is the one a
//! new form starts on.

mod temperature;
mod weight;

pub use temperature::{TemperatureConverter, celsius_to_fahrenheit, fahrenheit_to_celsius};
pub use weight::{WeightConverter, KILOGRAMS_TO_POUNDS};

use tandem_plugin::ConverterRegistry;

/// Load the built-in converters into registry
pub fn load_units_library(registry: ConverterRegistry) -> ConverterRegistry {
    registry
        .with_converter(TemperatureConverter)
        .with_converter(WeightConverter)
}

/// Create registry with the built-in converters
pub fn standard_registry() -> ConverterRegistry {
    load_units_library(ConverterRegistry::new())
}
