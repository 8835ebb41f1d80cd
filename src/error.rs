//! Error types for schema loading and packet decoding.
//!
//! All errors implement `std::error::Error` and carry structured context.
//! A packet that fails validation is *not* an error: it is reported as
//! [`DecodeOutcome::Dropped`](crate::DecodeOutcome::Dropped). Errors are
//! reserved for schema problems and for decoding before a schema exists.
//!
//! ## Error Categories
//!
//! - **Schema Load Errors**: the schema source could not be read
//! - **Compile Errors**: the schema tree is malformed or names an unknown type
//! - **Usage Errors**: a decode was attempted before any schema was installed
//! - **Parse Errors**: a schema or configuration document could not be decoded
//! - **Configuration Errors**: an inconsistent wire profile
//! - **Source Errors**: a packet source failed while producing packets
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use pod_telemetry::TelemetryError;
//!
//! let error = TelemetryError::source_failed("capture device unplugged");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Failed to load schema from {source_name}")]
    SchemaLoad {
        source_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Schema compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("No schema has been loaded; decoding is unavailable")]
    NotLoaded,

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Packet source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Reasons a schema tree cannot be compiled into a field plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    #[error("schema declares no fields")]
    EmptySchema,

    #[error("{node} node is missing required attribute '{attribute}'")]
    MissingAttribute { node: &'static str, attribute: &'static str },

    #[error("field '{id}' has unknown type '{type_name}'")]
    UnknownType { id: String, type_name: String },

    #[error("field '{id}' has an invalid array length in '{type_spec}'")]
    InvalidArrayLength { id: String, type_spec: String },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::SchemaLoad { .. } => true,
            TelemetryError::Source { .. } => true,
            TelemetryError::Compile(_) => false,
            TelemetryError::NotLoaded => false,
            TelemetryError::Parse { .. } => false,
            TelemetryError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::SchemaLoad { .. } => vec![
                "Check the schema file exists and is readable",
                "Verify the schema path in the deployment configuration",
                "Retry the load once storage is available",
            ],
            TelemetryError::Compile(_) => vec![
                "Check every field declares both 'id' and 'type'",
                "Use a supported primitive type name",
                "Write array lengths as type[N] with N > 0",
            ],
            TelemetryError::NotLoaded => vec![
                "Load a schema before decoding packets",
                "Check that the initial schema load succeeded",
            ],
            TelemetryError::Parse { .. } => vec![
                "Check the document is valid YAML",
                "Verify node kinds are root, struct, fields or field",
            ],
            TelemetryError::Config { .. } => vec![
                "Keep overlay fields between the header and the data offset",
                "Give every overlay field a non-empty key path",
            ],
            TelemetryError::Source { .. } => vec![
                "Check the packet source is still connected",
                "Restart the packet source",
            ],
        }
    }

    /// Helper constructor for schema load errors.
    pub fn schema_load(
        source_name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TelemetryError::SchemaLoad { source_name: source_name.into(), source: Box::new(source) }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        TelemetryError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        TelemetryError::Config { reason: reason.into() }
    }

    /// Helper constructor for packet source failures.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        TelemetryError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for packet source failures with an underlying cause.
    pub fn source_failed_with(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Source { reason: reason.into(), source: Some(source) }
    }
}

impl From<serde_yaml_ng::Error> for TelemetryError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        TelemetryError::Parse { context: "YAML document".to_string(), details: err.to_string() }
    }
}
