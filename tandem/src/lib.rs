//! Tandem - linked unit conversion fields
//!
//! A `Form` keeps two input fields consistent: typing into one side, or
//! changing either unit, rewrites the other side through the active
//! converter. Converters come from a `ConverterRegistry`.

mod config;
mod field;
mod form;
mod render;

pub use config::{FormConfig, CONVERTER_ENV};
pub use field::{FieldState, Side};
pub use form::{Form, FormView, FieldView};
pub use render::Renderer;

use std::sync::Arc;
use tandem_core::TandemError;

/// Form over the built-in converters, configured from the environment
pub fn standard_form() -> Result<Form, TandemError> {
    let registry = Arc::new(tandem_units::standard_registry());
    Form::with_config(registry, &FormConfig::from_env())
}
