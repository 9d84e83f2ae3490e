//! Tandem Plugin System
//!
//! A converter plugin describes one conversion domain: its selectable units,
//! a pure conversion function between them and an optional icon. The
//! registry keeps converters in display order and looks them up by id.

mod traits;
mod registry;

pub use traits::{ConverterPlugin, ConverterMeta, Icon};
pub use registry::{ConverterRegistry, ConverterSummary};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{ConverterPlugin, ConverterMeta, ConverterRegistry, Icon};
    pub use tandem_core::prelude::*;
}
