//! Server core: owns the three primitive registries and the
//! initialisation state machine.
//!
//! # Lifecycle
//!
//! A core starts `Uninitialized`. [`ServerCore::initialize`] registers
//! the supplied primitives best-effort; if every registration succeeds
//! the core becomes `Initialized` and stays that way for the process
//! lifetime. If any registration fails the core reports every failure
//! and remains `Uninitialized`.
//!
//! All listing and invocation operations require the `Initialized`
//! state; [`ServerCore::info`] is available in either state.
//!
//! The registries are the only mutable state. They are written during
//! `initialize` (and through the explicit `register_*` escape hatches)
//! and read-only during dispatch, so the sequential request loop needs
//! no locking.

use serde::Serialize;
use serde_json::Value;

use crate::config::ServerSettings;
use crate::error::{InitFailure, ServerError};
use crate::primitives::{
    Catalog, Message, Prompt, PromptMetadata, Resource, ResourceContent, ResourceMetadata, Tool,
    ToolMetadata,
};
use crate::registry::{Registry, RegistryEntry};

/// Server metadata reported by `server.info`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
    /// Primitive kinds with at least one registered entry.
    pub capabilities: Vec<&'static str>,
    /// Whether `initialize` has completed successfully.
    pub initialized: bool,
    /// Number of registered tools.
    pub tool_count: usize,
    /// Number of registered resources.
    pub resource_count: usize,
    /// Number of registered prompts.
    pub prompt_count: usize,
}

/// The server core: three registries plus an initialized flag.
///
/// Registries are owned, constructor-injected state; tests build a
/// fresh core per case instead of sharing a process-wide singleton.
#[derive(Debug)]
pub struct ServerCore {
    identity: ServerSettings,
    tools: Registry<Tool>,
    resources: Registry<Resource>,
    prompts: Registry<Prompt>,
    initialized: bool,
}

impl ServerCore {
    /// Creates an uninitialized core with empty registries.
    #[must_use]
    pub fn new(identity: ServerSettings) -> Self {
        tracing::info!(name = %identity.name, version = %identity.version, "server core created");
        Self {
            identity,
            tools: Registry::new(),
            resources: Registry::new(),
            prompts: Registry::new(),
            initialized: false,
        }
    }

    /// Returns `true` once `initialize` has completed successfully.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Registers the supplied primitives and moves to `Initialized`.
    ///
    /// Registration is best-effort: one bad primitive does not prevent
    /// the others from registering, but any failure keeps the core
    /// `Uninitialized` and is reported with the key and reason of every
    /// failed item.
    ///
    /// Calling `initialize` on an already-initialized core is a logged
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Initialization`] listing each failed
    /// registration.
    pub fn initialize(&mut self, catalog: Catalog) -> Result<(), ServerError> {
        if self.initialized {
            tracing::warn!("server already initialized");
            return Ok(());
        }

        tracing::info!("initializing server");

        let mut failures = Vec::new();

        for tool in catalog.tools {
            let key = tool.key().to_string();
            if let Err(error) = self.tools.register(tool) {
                failures.push(Self::failure(Tool::KIND, key, &error));
            }
        }
        for resource in catalog.resources {
            let key = resource.key().to_string();
            if let Err(error) = self.resources.register(resource) {
                failures.push(Self::failure(Resource::KIND, key, &error));
            }
        }
        for prompt in catalog.prompts {
            let key = prompt.key().to_string();
            if let Err(error) = self.prompts.register(prompt) {
                failures.push(Self::failure(Prompt::KIND, key, &error));
            }
        }

        if !failures.is_empty() {
            tracing::error!(failed = failures.len(), "initialization failed");
            return Err(ServerError::Initialization { failures });
        }

        self.initialized = true;
        tracing::info!(
            tools = self.tools.len(),
            resources = self.resources.len(),
            prompts = self.prompts.len(),
            "server initialized"
        );

        Ok(())
    }

    /// Records one failed registration.
    fn failure(
        kind: &'static str,
        key: String,
        error: &crate::error::RegistryError,
    ) -> InitFailure {
        let reason = error.to_string();
        tracing::warn!(kind, key = %key, %reason, "registration failed");
        InitFailure { kind, key, reason }
    }

    /// Registers a single tool after initialization.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotInitialized`] before `initialize`, or
    /// an [`ServerError::Execution`] wrapping the registry failure.
    pub fn register_tool(&mut self, tool: Tool) -> Result<(), ServerError> {
        self.require_initialized()?;
        self.tools.register(tool).map_err(Self::registration_error)
    }

    /// Registers a single resource after initialization.
    ///
    /// # Errors
    ///
    /// See [`ServerCore::register_tool`].
    pub fn register_resource(&mut self, resource: Resource) -> Result<(), ServerError> {
        self.require_initialized()?;
        self.resources
            .register(resource)
            .map_err(Self::registration_error)
    }

    /// Registers a single prompt after initialization.
    ///
    /// # Errors
    ///
    /// See [`ServerCore::register_tool`].
    pub fn register_prompt(&mut self, prompt: Prompt) -> Result<(), ServerError> {
        self.require_initialized()?;
        self.prompts
            .register(prompt)
            .map_err(Self::registration_error)
    }

    fn registration_error(error: crate::error::RegistryError) -> ServerError {
        ServerError::Execution {
            message: error.to_string(),
            details: serde_json::json!({ "kind": error.kind() }),
        }
    }

    /// Lists metadata of all registered tools, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotInitialized`] before `initialize`.
    pub fn list_tools(&self) -> Result<Vec<ToolMetadata>, ServerError> {
        self.require_initialized()?;
        Ok(self.tools.list())
    }

    /// Lists metadata of all registered resources, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotInitialized`] before `initialize`.
    pub fn list_resources(&self) -> Result<Vec<ResourceMetadata>, ServerError> {
        self.require_initialized()?;
        Ok(self.resources.list())
    }

    /// Lists metadata of all registered prompts, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotInitialized`] before `initialize`.
    pub fn list_prompts(&self) -> Result<Vec<PromptMetadata>, ServerError> {
        self.require_initialized()?;
        Ok(self.prompts.list())
    }

    /// Executes a tool by name.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotInitialized`], [`ServerError::ToolNotFound`],
    /// or whatever the tool's executor reports.
    pub fn execute_tool(&self, name: &str, params: Value) -> Result<Value, ServerError> {
        self.require_initialized()?;

        tracing::info!(tool = name, "executing tool");

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ServerError::ToolNotFound(name.to_string()))?;

        tool.execute(params)
    }

    /// Reads a resource by URI.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotInitialized`], [`ServerError::ResourceNotFound`],
    /// or [`ServerError::ResourceRead`] from the reader.
    pub fn read_resource(&self, uri: &str) -> Result<ResourceContent, ServerError> {
        self.require_initialized()?;

        tracing::info!(uri, "reading resource");

        let resource = self
            .resources
            .get(uri)
            .ok_or_else(|| ServerError::ResourceNotFound(uri.to_string()))?;

        resource.read()
    }

    /// Generates a prompt's messages by name.
    ///
    /// # Errors
    ///
    /// [`ServerError::NotInitialized`], [`ServerError::PromptNotFound`],
    /// or whatever the prompt's executor reports.
    pub fn prompt_messages(&self, name: &str, args: Value) -> Result<Vec<Message>, ServerError> {
        self.require_initialized()?;

        tracing::info!(prompt = name, "generating prompt messages");

        let prompt = self
            .prompts
            .get(name)
            .ok_or_else(|| ServerError::PromptNotFound(name.to_string()))?;

        prompt.get_messages(args)
    }

    /// Reports server metadata. Available in either state.
    #[must_use]
    pub fn info(&self) -> ServerInfo {
        let mut capabilities = Vec::new();
        if !self.tools.is_empty() {
            capabilities.push("tools");
        }
        if !self.resources.is_empty() {
            capabilities.push("resources");
        }
        if !self.prompts.is_empty() {
            capabilities.push("prompts");
        }

        ServerInfo {
            name: self.identity.name.clone(),
            version: self.identity.version.clone(),
            capabilities,
            initialized: self.initialized,
            tool_count: self.tools.len(),
            resource_count: self.resources.len(),
            prompt_count: self.prompts.len(),
        }
    }

    /// Clears all registries and resets the initialized flag.
    ///
    /// Intended for test isolation: after `shutdown` the core is
    /// indistinguishable from a freshly constructed one and may be
    /// initialized again.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            tracing::warn!("server not initialized, nothing to shut down");
            return;
        }

        tracing::info!(
            tools = self.tools.len(),
            resources = self.resources.len(),
            prompts = self.prompts.len(),
            "shutting down server"
        );

        self.tools.clear();
        self.resources.clear();
        self.prompts.clear();
        self.initialized = false;
    }

    fn require_initialized(&self) -> Result<(), ServerError> {
        if self.initialized {
            Ok(())
        } else {
            Err(ServerError::NotInitialized)
        }
    }
}
