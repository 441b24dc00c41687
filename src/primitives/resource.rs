//! Resources: URI-addressed readable data sources.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServerError;
use crate::registry::RegistryEntry;

use super::Failure;

/// The closure a resource wraps. Takes no input.
pub type ResourceReader = Box<dyn Fn() -> Result<Value, Failure> + Send + Sync>;

/// A readable data source, static or dynamic.
///
/// Static resources are expected to return identical content on
/// repeated reads; dynamic ones may vary (e.g. embed a timestamp). The
/// distinction is contractual, not enforced.
pub struct Resource {
    uri: String,
    name: String,
    description: String,
    mime_type: String,
    dynamic: bool,
    reader: ResourceReader,
}

impl Resource {
    /// Creates a static resource with the default `text/plain` MIME type.
    pub fn new<F>(
        uri: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        reader: F,
    ) -> Self
    where
        F: Fn() -> Result<Value, Failure> + Send + Sync + 'static,
    {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: description.into(),
            mime_type: "text/plain".to_string(),
            dynamic: false,
            reader: Box::new(reader),
        }
    }

    /// Sets the MIME type of the content.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Marks the resource as dynamic.
    #[must_use]
    pub const fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Returns the resource URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns `true` if the content may vary between reads.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Invokes the reader and wraps its content.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ResourceRead`] if the reader fails.
    pub fn read(&self) -> Result<ResourceContent, ServerError> {
        tracing::debug!(uri = %self.uri, "reading resource");

        let content = (self.reader)().map_err(|failure| ServerError::ResourceRead {
            uri: self.uri.clone(),
            message: failure.message,
        })?;

        Ok(ResourceContent {
            uri: self.uri.clone(),
            mime_type: self.mime_type.clone(),
            content,
        })
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("uri", &self.uri)
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}

/// Content returned by a successful read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    /// URI of the resource that was read.
    pub uri: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// The content itself.
    pub content: Value,
}

/// Reader-free view of a resource, returned by listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    /// Unique resource URI.
    pub uri: String,
    /// Human-readable resource name.
    pub name: String,
    /// Resource description.
    pub description: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Whether the content may vary between reads.
    pub is_dynamic: bool,
}

impl RegistryEntry for Resource {
    const KIND: &'static str = "resource";
    type Metadata = ResourceMetadata;

    fn key(&self) -> &str {
        &self.uri
    }

    fn check(&self) -> Result<(), String> {
        // Resources declare no schema; nothing further to validate.
        Ok(())
    }

    fn metadata(&self) -> ResourceMetadata {
        ResourceMetadata {
            uri: self.uri.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
            is_dynamic: self.dynamic,
        }
    }
}
