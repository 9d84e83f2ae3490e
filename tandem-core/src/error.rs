//! Structured errors
//!
//! Form operations never panic. Rejected operations return a `TandemError`
//! carrying a machine-readable code, a message and, where useful, a hint.

use crate::ConversionError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CONVERTER: &str = "UNKNOWN_CONVERTER";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNSUPPORTED_CONVERSION: &str = "UNSUPPORTED_CONVERSION";
    pub const INVALID_REGISTRY: &str = "INVALID_REGISTRY";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation was rejected, state is unchanged
    Error,
    /// Misconfiguration; the registry or form cannot be used
    Fatal,
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TandemError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl TandemError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    // ========== Common Error Constructors ==========

    pub fn unknown_converter(id: &str) -> Self {
        Self::new(codes::UNKNOWN_CONVERTER, format!("Unknown converter: {}", id))
            .with_suggestion("Use list_converters to see available converters")
    }

    pub fn unknown_unit(unit: &str, converter: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT,
            format!("Unit '{}' is not offered by converter '{}'", unit, converter))
    }

    pub fn unsupported_conversion(details: impl Into<String>) -> Self {
        Self::new(codes::UNSUPPORTED_CONVERSION, format!("Unsupported conversion: {}", details.into()))
            .with_suggestion("The converter registry is misconfigured")
            .with_severity(Severity::Fatal)
    }

    pub fn invalid_registry(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REGISTRY, format!("Invalid registry: {}", details.into()))
            .with_severity(Severity::Fatal)
    }

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_ARGUMENT, format!("Invalid argument: {}", details.into()))
    }
}

impl std::fmt::Display for TandemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for TandemError {}

impl From<ConversionError> for TandemError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Unsupported { from, to } => {
                Self::unsupported_conversion(format!("{} -> {}", from, to))
            }
        }
    }
}
