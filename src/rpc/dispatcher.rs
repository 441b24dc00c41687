//! Method routing: maps a request envelope to a server core operation.
//!
//! The routing table is fixed; exactly eight methods exist:
//!
//! | method | core operation |
//! |---|---|
//! | `server.info` | `info()` |
//! | `server.initialize` | `initialize(staged catalog)` |
//! | `tool.list` | `list_tools()` |
//! | `tool.execute` | `execute_tool(name, parameters)` |
//! | `resource.list` | `list_resources()` |
//! | `resource.read` | `read_resource(uri)` |
//! | `prompt.list` | `list_prompts()` |
//! | `prompt.get_messages` | `prompt_messages(name, arguments)` |
//!
//! Every core error is converted to a wire error envelope here; this
//! single catch point is what keeps one bad request from crashing the
//! dispatch loop.

use serde::Serialize;
use serde_json::{json, Value};

use crate::primitives::Catalog;
use crate::rpc::envelope::{ErrorData, RequestEnvelope, ResponseEnvelope};
use crate::server::ServerCore;

/// Routes request envelopes to the server core.
pub struct Dispatcher {
    core: ServerCore,
    /// Primitives to register on `server.initialize`. Wire messages
    /// cannot carry handler closures, so they are staged up front and
    /// consumed by the first initialize request.
    staged: Option<Catalog>,
}

impl Dispatcher {
    /// Creates a dispatcher with a catalog staged for initialization.
    #[must_use]
    pub fn new(core: ServerCore, catalog: Catalog) -> Self {
        Self {
            core,
            staged: Some(catalog),
        }
    }

    /// Returns the server core, for inspection in tests.
    #[must_use]
    pub const fn core(&self) -> &ServerCore {
        &self.core
    }

    /// Handles one request and produces its response.
    ///
    /// Never panics and never propagates an error; the request `id` is
    /// always echoed back.
    pub fn handle(&mut self, request: &RequestEnvelope) -> ResponseEnvelope {
        tracing::info!(id = %request.id, method = %request.method, "handling request");

        match self.route(&request.method, &request.params) {
            Ok(result) => ResponseEnvelope::success(request.id.clone(), result),
            Err(error) => {
                tracing::debug!(id = %request.id, kind = %error.kind, "request failed");
                ResponseEnvelope::failure(Some(request.id.clone()), error)
            }
        }
    }

    /// The fixed method table.
    fn route(&mut self, method: &str, params: &Value) -> Result<Value, ErrorData> {
        match method {
            "server.info" => encode(&self.core.info()),
            "server.initialize" => self.handle_initialize(),
            "tool.list" => {
                let tools = self.core.list_tools().map_err(|e| ErrorData::from(&e))?;
                Ok(json!({ "tools": tools }))
            }
            "tool.execute" => self.handle_tool_execute(params),
            "resource.list" => {
                let resources = self.core.list_resources().map_err(|e| ErrorData::from(&e))?;
                Ok(json!({ "resources": resources }))
            }
            "resource.read" => self.handle_resource_read(params),
            "prompt.list" => {
                let prompts = self.core.list_prompts().map_err(|e| ErrorData::from(&e))?;
                Ok(json!({ "prompts": prompts }))
            }
            "prompt.get_messages" => self.handle_prompt_get_messages(params),
            _ => Err(ErrorData::method_not_found(method)),
        }
    }

    /// Handles `server.initialize`.
    fn handle_initialize(&mut self) -> Result<Value, ErrorData> {
        let catalog = self.staged.take().unwrap_or_default();

        self.core
            .initialize(catalog)
            .map_err(|e| ErrorData::from(&e))?;

        let info = self.core.info();
        Ok(json!({
            "status": "initialized",
            "tools": info.tool_count,
            "resources": info.resource_count,
            "prompts": info.prompt_count,
        }))
    }

    /// Handles `tool.execute`.
    fn handle_tool_execute(&self, params: &Value) -> Result<Value, ErrorData> {
        let name = require_str(params, "name")?;
        let parameters = params
            .get("parameters")
            .cloned()
            .unwrap_or_else(|| json!({}));

        self.core
            .execute_tool(name, parameters)
            .map_err(|e| ErrorData::from(&e))
    }

    /// Handles `resource.read`.
    fn handle_resource_read(&self, params: &Value) -> Result<Value, ErrorData> {
        let uri = require_str(params, "uri")?;

        let content = self
            .core
            .read_resource(uri)
            .map_err(|e| ErrorData::from(&e))?;

        encode(&content)
    }

    /// Handles `prompt.get_messages`.
    fn handle_prompt_get_messages(&self, params: &Value) -> Result<Value, ErrorData> {
        let name = require_str(params, "name")?;
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let messages = self
            .core
            .prompt_messages(name, arguments)
            .map_err(|e| ErrorData::from(&e))?;

        Ok(json!({ "prompt": name, "messages": messages }))
    }
}

/// Extracts a required string parameter from the params object.
fn require_str<'a>(params: &'a Value, name: &str) -> Result<&'a str, ErrorData> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ErrorData::missing_param(name))
}

/// Serialises a core result into a wire value.
fn encode<T: Serialize>(value: &T) -> Result<Value, ErrorData> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "failed to serialise result");
        ErrorData::new("ExecutionError", "failed to serialise result")
    })
}
