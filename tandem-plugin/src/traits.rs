//! Converter plugin trait

use serde::Serialize;
use tandem_core::{ConversionError, Unit, UnitOption};

/// Metadata for a converter plugin
#[derive(Debug, Clone, Serialize)]
pub struct ConverterMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Opaque icon handle for the converter selector
///
/// Carries outline path data for a 24x24 viewbox. Renderers decide how to
/// draw it; `to_svg` produces standalone markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub paths: &'static [&'static str],
}

impl Icon {
    pub const fn new(paths: &'static [&'static str]) -> Self {
        Self { paths }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::from(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" fill=\"none\" viewBox=\"0 0 24 24\" stroke-width=\"1.5\" stroke=\"currentColor\">",
        );
        for path in self.paths {
            svg.push_str(&format!(
                "<path stroke-linecap=\"round\" stroke-linejoin=\"round\" d=\"{}\"/>",
                path
            ));
        }
        svg.push_str("</svg>");
        svg
    }
}

/// A conversion domain: its units and a pure conversion function
///
/// `convert` must return the input unchanged when `from == to`, and must be
/// defined for every ordered pair drawn from `units()`. Units from another
/// domain yield `ConversionError::Unsupported`.
pub trait ConverterPlugin: Send + Sync {
    fn meta(&self) -> ConverterMeta;

    /// Selectable units, in display order. Never empty.
    fn units(&self) -> &'static [UnitOption];

    fn convert(&self, value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError>;

    fn icon(&self) -> Option<Icon> {
        None
    }

    /// Whether `unit` is one of this converter's options
    fn offers(&self, unit: Unit) -> bool {
        self.units().iter().any(|opt| opt.value == unit)
    }

    /// Display label for `unit`, if offered
    fn label_for(&self, unit: Unit) -> Option<&'static str> {
        self.units().iter().find(|opt| opt.value == unit).map(|opt| opt.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_to_svg() {
        let icon = Icon::new(&["M0 0h24"]);
        let svg = icon.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("d=\"M0 0h24\""));
        assert!(svg.ends_with("</svg>"));
    }
}
