//! # Error Types
//!
//! Structured error types for analysis_core. Each variant carries enough
//! context (member id, combination, stage) to reproduce the failure, and the
//! whole enum serializes to JSON so callers can act on it programmatically.
//!
//! ## Example
//!
//! ```rust
//! use analysis_core::errors::{AnalysisError, AnalysisResult};
//!
//! fn validate_span(span_ft: f64) -> AnalysisResult<()> {
//!     if span_ft <= 0.0 {
//!         return Err(AnalysisError::invalid_input(
//!             "span_ft",
//!             span_ft.to_string(),
//!             "Span must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_span(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for analysis_core operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Pipeline stage names used in error context and lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    ModelValidation,
    LoadGeneration,
    MemberBuilding,
    MemberAnalysis,
    GlobalAggregation,
    ExternalAnalysis,
    Compliance,
    Foundation,
    Optimization,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ModelValidation => "model validation",
            Stage::LoadGeneration => "load generation",
            Stage::MemberBuilding => "member building",
            Stage::MemberAnalysis => "member analysis",
            Stage::GlobalAggregation => "global aggregation",
            Stage::ExternalAnalysis => "external analysis",
            Stage::Compliance => "code compliance",
            Stage::Foundation => "foundation analysis",
            Stage::Optimization => "optimization",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Structured error type for analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum AnalysisError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Component references a material id that the database does not hold.
    /// The component is skipped; the run continues.
    #[error("Material not found: '{material_id}' (component '{component_id}')")]
    MaterialNotFound {
        material_id: String,
        component_id: String,
    },

    /// Model describes something the engine cannot analyze (unknown
    /// structure type, glazing, or building code). Aborts before load generation.
    #[error("Unsupported model configuration: {setting} = '{value}' - {reason}")]
    UnsupportedModelConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    /// External FEA backend failed or timed out. No partial compliance result
    /// is produced.
    #[error("External analysis failed ({backend}): {reason}")]
    ExternalAnalysisFailure { backend: String, reason: String },

    /// A computation would leave its numeric domain (zero length, division
    /// by zero, non-finite result).
    #[error("Computation domain error during {stage} for member '{member_id}'{}: {reason}", combination_suffix(.combination))]
    ComputationDomain {
        member_id: String,
        combination: Option<String>,
        stage: Stage,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn combination_suffix(combination: &Option<String>) -> String {
    match combination {
        Some(name) => format!(" under '{}'", name),
        None => String::new(),
    }
}

impl AnalysisError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        AnalysisError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>, component_id: impl Into<String>) -> Self {
        AnalysisError::MaterialNotFound {
            material_id: material_id.into(),
            component_id: component_id.into(),
        }
    }

    /// Create an UnsupportedModelConfiguration error
    pub fn unsupported(setting: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::UnsupportedModelConfiguration {
            setting: setting.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an ExternalAnalysisFailure error
    pub fn external_failure(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::ExternalAnalysisFailure {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Create a ComputationDomain error
    pub fn domain(
        member_id: impl Into<String>,
        combination: Option<&str>,
        stage: Stage,
        reason: impl Into<String>,
    ) -> Self {
        AnalysisError::ComputationDomain {
            member_id: member_id.into(),
            combination: combination.map(str::to_string),
            stage,
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// Missing materials and members rejected while building only knock out
    /// the affected component. Everything else propagates to the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AnalysisError::MaterialNotFound { .. }
                | AnalysisError::ComputationDomain {
                    stage: Stage::MemberBuilding,
                    ..
                }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput { .. } => "INVALID_INPUT",
            AnalysisError::MissingField { .. } => "MISSING_FIELD",
            AnalysisError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            AnalysisError::UnsupportedModelConfiguration { .. } => "UNSUPPORTED_MODEL_CONFIGURATION",
            AnalysisError::ExternalAnalysisFailure { .. } => "ANALYSIS_FAILED",
            AnalysisError::ComputationDomain { .. } => "COMPUTATION_DOMAIN",
            AnalysisError::FileError { .. } => "FILE_ERROR",
            AnalysisError::SerializationError { .. } => "SERIALIZATION_ERROR",
            AnalysisError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::SerializationError {
            reason: err.to_string(),
        }
    }
}
