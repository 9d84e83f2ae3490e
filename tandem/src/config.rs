//! Form configuration

use serde::{Deserialize, Serialize};

/// Environment variable naming the converter a new form starts on
pub const CONVERTER_ENV: &str = "TANDEM_CONVERTER";

/// Startup options for a `Form`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Converter selected at startup; `None` means the first registered one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_converter: Option<String>,
}

impl FormConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let initial_converter = lookup(CONVERTER_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Self { initial_converter }
    }

    pub fn with_initial_converter(mut self, id: impl Into<String>) -> Self {
        self.initial_converter = Some(id.into());
        self
    }
}
