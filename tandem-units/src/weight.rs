//! Weight converter (kilograms, pounds)

use tandem_plugin::prelude::*;

/// Pounds per kilogram
pub const KILOGRAMS_TO_POUNDS: f64 = 2.2046226218;

const KILOGRAMS: Unit = Unit::Weight(WeightUnit::Kilograms);
const POUNDS: Unit = Unit::Weight(WeightUnit::Pounds);

static WEIGHT_UNITS: [UnitOption; 2] = [
    UnitOption::new(KILOGRAMS, "Kilograms (kg)"),
    UnitOption::new(POUNDS, "Pounds (lb)"),
];

static WEIGHT_ICON_PATHS: [&str; 1] = [
    "M12 3v17.25m0 0c-1.472 0-2.882.265-4.185.75M12 20.25c1.472 0 2.882.265 4.185.75M18.75 4.97A48.416 48.416 0 0012 4.5c-2.291 0-4.545.16-6.75.47m13.5 0c1.01.143 2.01.317 3 .52m-3-.52l2.286-1.047a1.125 1.125 0 011.472 1.047l-.98 4.873m0 0a3.375 3.375 0 01-6.47 0l-.98-4.873a1.125 1.125 0 011.472-1.047L18.75 4.971m-16.5.52c.99-.203 1.99-.377 3-.52m0 0l2.286-1.047A1.125 1.125 0 016.214 4l-.98 4.873m0 0a3.375 3.375 0 01-6.47 0L5.25 4.97M9 9.75l3 3m0 0l3-3m-3 3v-6m-1.5 6H7.5m6 0H15",
];

pub struct WeightConverter;

impl ConverterPlugin for WeightConverter {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            id: "weight",
            name: "Weight",
            description: "Convert between kilograms and pounds",
        }
    }

    fn units(&self) -> &'static [UnitOption] {
        &WEIGHT_UNITS
    }

    fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
        match (from, to) {
            (Unit::Weight(a), Unit::Weight(b)) if a == b => Ok(value),
            (KILOGRAMS, POUNDS) => Ok(value * KILOGRAMS_TO_POUNDS),
            (POUNDS, KILOGRAMS) => Ok(value / KILOGRAMS_TO_POUNDS),
            _ => Err(ConversionError::Unsupported { from, to }),
        }
    }

    fn icon(&self) -> Option<Icon> {
        Some(Icon::new(&WEIGHT_ICON_PATHS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(value: f64, from: Unit, to: Unit) -> f64 {
        WeightConverter.convert(value, from, to).unwrap()
    }

    #[test]
    fn test_kilograms_to_pounds() {
        assert_eq!(convert(1.0, KILOGRAMS, POUNDS), 2.2046226218);
        assert_eq!(convert(0.0, KILOGRAMS, POUNDS), 0.0);
        assert!((convert(100.0, KILOGRAMS, POUNDS) - 220.46226218).abs() < 1e-9);
    }

    #[test]
    fn test_pounds_to_kilograms() {
        assert_eq!(convert(2.2046226218, POUNDS, KILOGRAMS), 1.0);
        assert!((convert(1.0, POUNDS, KILOGRAMS) - 0.45359237).abs() < 1e-8);
    }

    #[test]
    fn test_identity_is_exact() {
        for value in [0.3, -1.0, 1e-300, 7.5e12] {
            assert_eq!(convert(value, KILOGRAMS, KILOGRAMS), value);
            assert_eq!(convert(value, POUNDS, POUNDS), value);
        }
    }

    #[test]
    fn test_round_trip() {
        for value in [-5.0, 0.0, 0.001, 1.0, 70.3, 1e9] {
            let back = convert(convert(value, POUNDS, KILOGRAMS), KILOGRAMS, POUNDS);
            assert!((back - value).abs() <= 1e-9 * value.abs().max(1.0), "{} -> {}", value, back);
        }
    }

    #[test]
    fn test_foreign_units_unsupported() {
        let celsius = Unit::Temperature(TemperatureUnit::Celsius);
        assert!(WeightConverter.convert(1.0, POUNDS, celsius).is_err());
        assert!(WeightConverter.convert(1.0, celsius, celsius).is_err());
    }
}
