//! Converter Registry

use crate::{ConverterPlugin, Icon};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tandem_core::{TandemError, UnitOption};

/// Sample values used to probe conversion functions during validation
const PROBE_VALUES: [f64; 5] = [0.0, 1.0, -40.0, 98.6, 1.0e6];

/// Relative tolerance for the A -> B -> A round trip
const ROUND_TRIP_TOLERANCE: f64 = 1e-9;

/// Serializable description of a registered converter
#[derive(Debug, Clone, Serialize)]
pub struct ConverterSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub units: Vec<UnitOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

/// Ordered table of converters, keyed by id
///
/// Built once at startup with `with_converter`, then shared read-only.
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn ConverterPlugin>>,
    index: HashMap<String, usize>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a converter. A repeated id keeps the first registration for
    /// lookups; `validate` reports the duplicate.
    pub fn with_converter<C: ConverterPlugin + 'static>(mut self, c: C) -> Self {
        let id = c.meta().id.to_lowercase();
        let position = self.converters.len();
        self.converters.push(Arc::new(c));
        self.index.entry(id).or_insert(position);
        self
    }

    /// Converters in registration order
    pub fn list(&self) -> &[Arc<dyn ConverterPlugin>] {
        &self.converters
    }

    pub fn find(&self, id: &str) -> Option<Arc<dyn ConverterPlugin>> {
        self.index
            .get(&id.trim().to_lowercase())
            .map(|&i| Arc::clone(&self.converters[i]))
    }

    /// Like `find`, but unknown ids become an error with close matches
    pub fn lookup(&self, id: &str) -> Result<Arc<dyn ConverterPlugin>, TandemError> {
        self.find(id).ok_or_else(|| {
            let similar = self.find_similar(id);
            let err = TandemError::unknown_converter(id);
            if similar.is_empty() {
                err
            } else {
                err.with_suggestion(format!("Did you mean: {}?", similar.join(", ")))
            }
        })
    }

    pub fn first(&self) -> Option<Arc<dyn ConverterPlugin>> {
        self.converters.first().cloned()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.meta().id).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn summaries(&self) -> Vec<ConverterSummary> {
        self.converters
            .iter()
            .map(|c| {
                let meta = c.meta();
                ConverterSummary {
                    id: meta.id,
                    name: meta.name,
                    description: meta.description,
                    units: c.units().to_vec(),
                    icon: c.icon(),
                }
            })
            .collect()
    }

    /// Check the registry is usable by a form
    ///
    /// Rejects an empty registry, duplicate ids, converters without units or
    /// with repeated units, and any converter whose function is undefined,
    /// non-finite or not an identity for some probed pair of its own units.
    pub fn validate(&self) -> Result<(), TandemError> {
        if self.converters.is_empty() {
            return Err(TandemError::invalid_registry("no converters registered"));
        }

        let mut seen = HashSet::new();
        for converter in &self.converters {
            let id = converter.meta().id;
            if !seen.insert(id.to_lowercase()) {
                return Err(TandemError::invalid_registry(format!("duplicate converter id '{}'", id)));
            }
            Self::validate_converter(converter.as_ref())?;
        }

        tracing::info!(converters = ?self.ids(), "converter registry validated");
        Ok(())
    }

    fn validate_converter(converter: &dyn ConverterPlugin) -> Result<(), TandemError> {
        let id = converter.meta().id;
        let units = converter.units();
        if units.is_empty() {
            return Err(TandemError::invalid_registry(format!("converter '{}' has no units", id)));
        }

        let mut seen = HashSet::new();
        for opt in units {
            if !seen.insert(opt.value) {
                return Err(TandemError::invalid_registry(format!(
                    "converter '{}' lists unit {} twice", id, opt.value
                )));
            }
        }

        for from in units {
            for to in units {
                for &value in &PROBE_VALUES {
                    let there = converter.convert(value, from.value, to.value)?;
                    if !there.is_finite() {
                        return Err(TandemError::invalid_registry(format!(
                            "converter '{}' produced {} for {} {} -> {}",
                            id, there, value, from.value, to.value
                        )));
                    }
                    if from.value == to.value && there != value {
                        return Err(TandemError::invalid_registry(format!(
                            "converter '{}' is not an identity for {}", id, from.value
                        )));
                    }
                    let back = converter.convert(there, to.value, from.value)?;
                    if (back - value).abs() > ROUND_TRIP_TOLERANCE * value.abs().max(1.0) {
                        return Err(TandemError::invalid_registry(format!(
                            "converter '{}' does not round-trip {} {} via {}",
                            id, value, from.value, to.value
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Find converter ids similar to the given one (for error suggestions)
    fn find_similar(&self, id: &str) -> Vec<&'static str> {
        let query = id.trim().to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = self.converters
            .iter()
            .map(|c| c.meta().id)
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, candidate);
                if score > 0 {
                    Some((candidate, score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, registration order breaks ties
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().take(3).map(|(id, _)| id).collect()
    }

    /// Similarity score between a query and a candidate id; 0 means unrelated
    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query.is_empty() {
            return 0;
        }

        let mut score = 0;
        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();

        // Mostly-shared alphabets count as a near miss ("wieght", "temprature")
        if score == 0 && common * 4 < candidate_chars.len() * 3 {
            return 0;
        }
        score + common * 2
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConverterMeta;
    use tandem_core::{codes, ConversionError, TemperatureUnit, Unit, WeightUnit};

    const KG: Unit = Unit::Weight(WeightUnit::Kilograms);
    const LB: Unit = Unit::Weight(WeightUnit::Pounds);

    static HALVES_UNITS: [UnitOption; 2] = [
        UnitOption::new(KG, "Kilograms"),
        UnitOption::new(LB, "Half-kilograms"),
    ];

    /// Treats "pounds" as half kilograms
    struct Halves;

    impl ConverterPlugin for Halves {
        fn meta(&self) -> ConverterMeta {
            ConverterMeta { id: "halves", name: "Halves", description: "Test converter" }
        }

        fn units(&self) -> &'static [UnitOption] {
            &HALVES_UNITS
        }

        fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
            match (from, to) {
                (a, b) if a == b && self.offers(a) => Ok(value),
                (KG, LB) => Ok(value * 2.0),
                (LB, KG) => Ok(value / 2.0),
                _ => Err(ConversionError::Unsupported { from, to }),
            }
        }
    }

    static ONE_WAY_UNITS: [UnitOption; 2] = [
        UnitOption::new(Unit::Temperature(TemperatureUnit::Celsius), "C"),
        UnitOption::new(Unit::Temperature(TemperatureUnit::Fahrenheit), "F"),
    ];

    /// Knows only Celsius -> Fahrenheit
    struct OneWay;

    impl ConverterPlugin for OneWay {
        fn meta(&self) -> ConverterMeta {
            ConverterMeta { id: "one_way", name: "One way", description: "Broken converter" }
        }

        fn units(&self) -> &'static [UnitOption] {
            &ONE_WAY_UNITS
        }

        fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
            match (from, to) {
                (a, b) if a == b => Ok(value),
                (Unit::Temperature(TemperatureUnit::Celsius), _) => Ok(value * 9.0 / 5.0 + 32.0),
                _ => Err(ConversionError::Unsupported { from, to }),
            }
        }
    }

    struct NoUnits;

    impl ConverterPlugin for NoUnits {
        fn meta(&self) -> ConverterMeta {
            ConverterMeta { id: "empty", name: "Empty", description: "No units" }
        }

        fn units(&self) -> &'static [UnitOption] {
            &[]
        }

        fn convert(&self, value: f64, _from: Unit, _to: Unit) -> Result<f64, ConversionError> {
            Ok(value)
        }
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let registry = ConverterRegistry::new()
            .with_converter(OneWay)
            .with_converter(Halves);
        assert_eq!(registry.ids(), vec!["one_way", "halves"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.first().map(|c| c.meta().id), Some("one_way"));
    }

    #[test]
    fn test_find() {
        let registry = ConverterRegistry::new().with_converter(Halves);
        assert!(registry.find("halves").is_some());
        assert!(registry.find("HALVES").is_some());
        assert!(registry.find("thirds").is_none());
    }

    #[test]
    fn test_lookup_suggests_similar() {
        let registry = ConverterRegistry::new().with_converter(Halves);
        let err = match registry.lookup("halve") {
            Ok(_) => panic!("expected unknown converter"),
            Err(e) => e,
        };
        assert_eq!(err.code, codes::UNKNOWN_CONVERTER);
        assert_eq!(err.suggestion.as_deref(), Some("Did you mean: halves?"));

        let err = match registry.lookup("zzz") {
            Ok(_) => panic!("expected unknown converter"),
            Err(e) => e,
        };
        assert!(!err.suggestion.unwrap_or_default().contains("halves"));
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let registry = ConverterRegistry::new().with_converter(Halves);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_registry() {
        let err = ConverterRegistry::new().validate().unwrap_err();
        assert_eq!(err.code, codes::INVALID_REGISTRY);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_validate_rejects_undefined_pair() {
        let registry = ConverterRegistry::new().with_converter(OneWay);
        let err = registry.validate().unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_CONVERSION);
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let registry = ConverterRegistry::new()
            .with_converter(Halves)
            .with_converter(Halves);
        let err = registry.validate().unwrap_err();
        assert!(err.message.contains("duplicate converter id 'halves'"));
    }

    #[test]
    fn test_validate_rejects_converter_without_units() {
        let registry = ConverterRegistry::new().with_converter(NoUnits);
        let err = registry.validate().unwrap_err();
        assert!(err.message.contains("has no units"));
    }

    #[test]
    fn test_summaries() {
        let registry = ConverterRegistry::new().with_converter(Halves);
        let summaries = registry.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Halves");
        assert_eq!(summaries[0].units.len(), 2);
        assert!(summaries[0].icon.is_none());
    }
}
