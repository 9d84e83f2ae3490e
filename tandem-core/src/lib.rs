//! Tandem Core - Fundamental types
//!
//! This crate provides the core types used throughout Tandem:
//! - `Unit`: Domain-scoped unit identifiers and their display options
//! - `parse_input` / `format_number`: Field text to number and back
//! - `TandemError`: Structured errors

mod unit;
mod number;
mod error;

pub use unit::{Unit, UnitOption, TemperatureUnit, WeightUnit, ConversionError};
pub use number::{parse_input, format_number, DECIMAL_PLACES};
pub use error::{TandemError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Unit, UnitOption, TemperatureUnit, WeightUnit, ConversionError,
        TandemError, Severity,
    };
    pub use crate::error::codes;
}
