//! Input field state

use serde::{Deserialize, Serialize};
use tandem_core::Unit;

/// Which of the two linked fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Label shown when the selected unit has no option label
    pub fn fallback_label(self) -> &'static str {
        match self {
            Side::Left => "From",
            Side::Right => "To",
        }
    }
}

/// Text exactly as typed (or as derived) plus the selected unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldState {
    pub raw_text: String,
    pub unit: Unit,
}

impl FieldState {
    pub fn empty(unit: Unit) -> Self {
        Self {
            raw_text: String::new(),
            unit,
        }
    }

    /// True when the text is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::TemperatureUnit;

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[test]
    fn test_is_blank() {
        let mut field = FieldState::empty(Unit::Temperature(TemperatureUnit::Celsius));
        assert!(field.is_blank());
        field.raw_text = "   ".to_string();
        assert!(field.is_blank());
        field.raw_text = " 0 ".to_string();
        assert!(!field.is_blank());
    }
}
