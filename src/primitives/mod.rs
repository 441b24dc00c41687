//! The three pluggable primitive kinds a server exposes.
//!
//! - [`Tool`] — a named, schema-validated invokable function
//! - [`Resource`] — a URI-addressed readable data source
//! - [`Prompt`] — a named template producing role-tagged messages
//!
//! Each kind wraps a user-supplied closure with input validation and
//! error normalisation, so handler failures surface as well-formed
//! error values instead of crashing the dispatch loop.

mod prompt;
mod resource;
mod tool;

pub use prompt::{Message, MessageGenerator, Prompt, PromptMetadata, Role};
pub use resource::{Resource, ResourceContent, ResourceMetadata, ResourceReader};
pub use tool::{Tool, ToolHandler, ToolMetadata};

use serde_json::Value;

/// A JSON object, as handlers receive their parameters.
pub type JsonObject = serde_json::Map<String, Value>;

/// A failure produced inside a handler, reader, or generator.
///
/// The executor normalises this into the error taxonomy; handlers never
/// need to know about wire error kinds.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Human-readable failure description.
    pub message: String,
    /// Structured context forwarded into the error envelope.
    pub details: Value,
}

impl Failure {
    /// Creates a failure with empty details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Value::Object(JsonObject::new()),
        }
    }

    /// Attaches structured context.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}

/// A bundle of primitives handed to `ServerCore::initialize`.
///
/// Wire messages cannot carry handler closures, so the primitives a
/// server will expose are staged in one of these at construction time.
#[derive(Default)]
pub struct Catalog {
    /// Tools to register.
    pub tools: Vec<Tool>,
    /// Resources to register.
    pub resources: Vec<Resource>,
    /// Prompts to register.
    pub prompts: Vec<Prompt>,
}

impl Catalog {
    /// Returns `true` if the catalog stages nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.resources.is_empty() && self.prompts.is_empty()
    }
}
