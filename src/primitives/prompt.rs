//! Prompts: named templates producing ordered, role-tagged messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServerError;
use crate::registry::RegistryEntry;
use crate::schema::{Schema, SchemaType, ValidationResult};

use super::{Failure, JsonObject};

/// The speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// Content attributed to the user.
    User,
    /// Content attributed to the assistant.
    Assistant,
}

/// One message in a generated prompt sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who speaks this message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The closure a prompt wraps.
///
/// Receives arguments that already passed schema validation with
/// defaults filled in.
pub type MessageGenerator = Box<dyn Fn(&JsonObject) -> Result<Vec<Message>, Failure> + Send + Sync>;

/// A named template producing an ordered sequence of messages.
pub struct Prompt {
    name: String,
    description: String,
    arguments_schema: Schema,
    generator: MessageGenerator,
}

impl Prompt {
    /// Creates a prompt.
    ///
    /// The arguments schema must be object-typed at the root; this is
    /// enforced when the prompt is registered.
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        arguments_schema: Schema,
        generator: F,
    ) -> Self
    where
        F: Fn(&JsonObject) -> Result<Vec<Message>, Failure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            arguments_schema,
            generator: Box::new(generator),
        }
    }

    /// Returns the prompt name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates `args` and invokes the generator.
    ///
    /// A generator returning an empty sequence is a defect in the
    /// prompt; it is reported as an execution error rather than
    /// forwarded to the caller.
    ///
    /// # Errors
    ///
    /// - [`ServerError::Validation`] if the arguments fail the schema
    /// - [`ServerError::Execution`] if the generator fails or returns
    ///   no messages
    pub fn get_messages(&self, args: Value) -> Result<Vec<Message>, ServerError> {
        let mut args = args;

        if let ValidationResult::Fail(violations) =
            self.arguments_schema.validate_with_defaults(&mut args)
        {
            tracing::debug!(prompt = %self.name, count = violations.len(), "argument validation failed");
            return Err(ServerError::Validation { violations });
        }

        let arguments = args.as_object().cloned().unwrap_or_default();

        tracing::debug!(prompt = %self.name, "generating prompt messages");

        let messages = (self.generator)(&arguments).map_err(|failure| ServerError::Execution {
            message: failure.message,
            details: failure.details,
        })?;

        if messages.is_empty() {
            return Err(ServerError::Execution {
                message: format!("prompt '{}' produced no messages", self.name),
                details: Value::Object(JsonObject::new()),
            });
        }

        Ok(messages)
    }
}

impl std::fmt::Debug for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompt")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Generator-free view of a prompt, returned by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMetadata {
    /// Unique prompt name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Schema for the prompt's arguments.
    pub arguments_schema: Schema,
}

impl RegistryEntry for Prompt {
    const KIND: &'static str = "prompt";
    type Metadata = PromptMetadata;

    fn key(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<(), String> {
        if self.arguments_schema.ty != SchemaType::Object {
            return Err("arguments schema must be an object descriptor".to_string());
        }
        self.arguments_schema
            .ensure_well_formed()
            .map_err(|e| format!("arguments schema: {e}"))
    }

    fn metadata(&self) -> PromptMetadata {
        PromptMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            arguments_schema: self.arguments_schema.clone(),
        }
    }
}
