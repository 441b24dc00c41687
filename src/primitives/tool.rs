//! Tools: named, schema-validated invokable functions.

use serde::Serialize;
use serde_json::Value;

use crate::error::ServerError;
use crate::registry::RegistryEntry;
use crate::schema::{Schema, SchemaType, ValidationResult};

use super::{Failure, JsonObject};

/// The closure a tool wraps.
///
/// Receives parameters that already passed schema validation with
/// defaults filled in.
pub type ToolHandler = Box<dyn Fn(&JsonObject) -> Result<Value, Failure> + Send + Sync>;

/// A named, invokable unit of server-exposed functionality.
///
/// Immutable after registration.
pub struct Tool {
    name: String,
    description: String,
    input_schema: Schema,
    output_schema: Option<Schema>,
    handler: ToolHandler,
}

impl Tool {
    /// Creates a tool.
    ///
    /// The input schema must be object-typed at the root; this is
    /// enforced when the tool is registered.
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Schema,
        handler: F,
    ) -> Self
    where
        F: Fn(&JsonObject) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            output_schema: None,
            handler: Box::new(handler),
        }
    }

    /// Declares the shape of the handler's result.
    ///
    /// The output schema is advisory: a mismatching result is logged,
    /// not rejected.
    #[must_use]
    pub fn with_output_schema(mut self, schema: Schema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    #[must_use]
    pub const fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    /// Validates `params` and invokes the handler.
    ///
    /// The handler's return value is passed through as-is.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Validation`] with every violated constraint if
    ///   the parameters fail the input schema
    /// - [`ServerError::Execution`] if the handler fails
    pub fn execute(&self, params: Value) -> Result<Value, ServerError> {
        let mut params = params;

        if let ValidationResult::Fail(violations) =
            self.input_schema.validate_with_defaults(&mut params)
        {
            tracing::debug!(tool = %self.name, count = violations.len(), "parameter validation failed");
            return Err(ServerError::Validation { violations });
        }

        // Validation guarantees an object-typed value here.
        let arguments = params.as_object().cloned().unwrap_or_default();

        tracing::debug!(tool = %self.name, "executing tool");

        let result = (self.handler)(&arguments).map_err(|failure| ServerError::Execution {
            message: failure.message,
            details: failure.details,
        })?;

        if let Some(ref schema) = self.output_schema {
            if let ValidationResult::Fail(violations) = schema.validate(&result) {
                tracing::warn!(
                    tool = %self.name,
                    violations = ?violations,
                    "tool result does not match its declared output schema"
                );
            }
        }

        Ok(result)
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Handler-free view of a tool, returned by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Schema for the tool's input parameters.
    pub input_schema: Schema,
    /// Declared shape of the result, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Schema>,
}

impl RegistryEntry for Tool {
    const KIND: &'static str = "tool";
    type Metadata = ToolMetadata;

    fn key(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<(), String> {
        if self.input_schema.ty != SchemaType::Object {
            return Err("input schema must be an object descriptor".to_string());
        }
        self.input_schema
            .ensure_well_formed()
            .map_err(|e| format!("input schema: {e}"))?;
        if let Some(ref output) = self.output_schema {
            output
                .ensure_well_formed()
                .map_err(|e| format!("output schema: {e}"))?;
        }
        Ok(())
    }

    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
        }
    }
}
