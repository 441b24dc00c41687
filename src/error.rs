//! Error types for workbench-mcp.
//!
//! Expected failures (validation, lookup misses, handler errors) are
//! modelled as `Result` values and converted to wire error envelopes at
//! the dispatch boundary. Only unrecoverable transport failures are
//! allowed to terminate the process.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::Violation;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised by a registry at registration time.
///
/// Registration is atomic: a failed `register` leaves the registry
/// unchanged.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An entry with the same key is already registered.
    #[error("{kind} '{key}' is already registered")]
    Duplicate {
        /// Primitive kind ("tool", "resource", "prompt").
        kind: &'static str,
        /// The colliding key.
        key: String,
    },

    /// The entry's declared schema is structurally malformed.
    #[error("{kind} '{key}' has a malformed schema: {reason}")]
    InvalidSchema {
        /// Primitive kind ("tool", "resource", "prompt").
        kind: &'static str,
        /// Key of the rejected entry.
        key: String,
        /// What is wrong with the schema.
        reason: String,
    },

    /// The entry's key is empty.
    #[error("{kind} key must not be empty")]
    EmptyKey {
        /// Primitive kind ("tool", "resource", "prompt").
        kind: &'static str,
    },
}

impl RegistryError {
    /// Returns the machine-readable wire kind for this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "DuplicateKeyError",
            Self::InvalidSchema { .. } | Self::EmptyKey { .. } => "InvalidSchemaError",
        }
    }
}

/// A single failed registration collected during `initialize`.
#[derive(Debug, Clone, Serialize)]
pub struct InitFailure {
    /// Primitive kind ("tool", "resource", "prompt").
    pub kind: &'static str,
    /// Key of the item that failed to register.
    pub key: String,
    /// Why registration failed.
    pub reason: String,
}

/// Errors surfaced by server core operations.
#[derive(Error, Debug)]
pub enum ServerError {
    /// An operation was called before `initialize()`.
    #[error("server not initialized")]
    NotInitialized,

    /// Tool lookup miss.
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    /// Resource lookup miss.
    #[error("Resource '{0}' not found")]
    ResourceNotFound(String),

    /// Prompt lookup miss.
    #[error("Prompt '{0}' not found")]
    PromptNotFound(String),

    /// Input or arguments failed schema validation.
    ///
    /// Carries every violated constraint, not just the first.
    #[error("validation failed with {} violation(s)", violations.len())]
    Validation {
        /// All violations found.
        violations: Vec<Violation>,
    },

    /// A tool handler or prompt generator failed.
    #[error("{message}")]
    Execution {
        /// Human-readable failure description.
        message: String,
        /// Handler-supplied context.
        details: Value,
    },

    /// A resource reader failed.
    #[error("failed to read resource '{uri}': {message}")]
    ResourceRead {
        /// URI of the resource that failed.
        uri: String,
        /// Reader-supplied failure description.
        message: String,
    },

    /// One or more registrations failed during best-effort `initialize`.
    #[error("initialization failed for {} item(s)", failures.len())]
    Initialization {
        /// Every item that failed to register, with its reason.
        failures: Vec<InitFailure>,
    },
}

impl ServerError {
    /// Returns the machine-readable wire kind for this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotInitialized => "ServerNotInitializedError",
            Self::ToolNotFound(_) => "ToolNotFoundError",
            Self::ResourceNotFound(_) => "ResourceNotFoundError",
            Self::PromptNotFound(_) => "PromptNotFoundError",
            Self::Validation { .. } => "ValidationError",
            Self::Execution { .. } => "ExecutionError",
            Self::ResourceRead { .. } => "ResourceReadError",
            Self::Initialization { .. } => "InitializationError",
        }
    }

    /// Returns structured context for the wire error envelope.
    #[must_use]
    pub fn details(&self) -> Value {
        match self {
            Self::Validation { violations } => json!({ "violations": violations }),
            Self::Execution { details, .. } => details.clone(),
            Self::ResourceRead { uri, .. } => json!({ "uri": uri }),
            Self::Initialization { failures } => json!({ "failures": failures }),
            Self::ToolNotFound(name) | Self::PromptNotFound(name) => json!({ "name": name }),
            Self::ResourceNotFound(uri) => json!({ "uri": uri }),
            Self::NotInitialized => json!({}),
        }
    }
}
