//! Integration tests for the server core and registries.
//!
//! These exercise the registration lifecycle, the initialization state
//! machine, and the per-kind executors through the public API.

use serde_json::{json, Value};

use workbench_mcp::config::ServerSettings;
use workbench_mcp::error::ServerError;
use workbench_mcp::primitives::{Catalog, Failure, Message, Prompt, Resource, Tool};
use workbench_mcp::registry::{Registry, RegistryEntry};
use workbench_mcp::schema::Schema;
use workbench_mcp::server::ServerCore;

fn calculator() -> Tool {
    Tool::new(
        "calculator",
        "Perform basic arithmetic operations",
        Schema::object()
            .with_property(
                "operation",
                Schema::string().with_enum(vec![json!("add"), json!("subtract")]),
            )
            .with_property("a", Schema::number())
            .with_property("b", Schema::number())
            .with_required(["operation", "a", "b"]),
        |params| {
            let a = params.get("a").and_then(Value::as_f64).unwrap_or(0.0);
            let b = params.get("b").and_then(Value::as_f64).unwrap_or(0.0);
            let operation = params
                .get("operation")
                .and_then(Value::as_str)
                .unwrap_or("add");

            let result = match operation {
                "subtract" => a - b,
                _ => a + b,
            };
            Ok(json!({ "result": result }))
        },
    )
}

fn initialized_core() -> ServerCore {
    let mut core = ServerCore::new(ServerSettings::default());
    core.initialize(Catalog {
        tools: vec![calculator()],
        resources: vec![Resource::new(
            "data://fixture",
            "Fixture",
            "Static fixture data",
            || Ok(json!({"fixture": true})),
        )
        .with_mime_type("application/json")],
        prompts: vec![Prompt::new(
            "ask",
            "Asks a question",
            Schema::object()
                .with_property("question", Schema::string())
                .with_required(["question"]),
            |args| {
                let question = args
                    .get("question")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(vec![
                    Message::system("Answer concisely."),
                    Message::user(question.to_string()),
                ])
            },
        )],
    })
    .unwrap();
    core
}

// =============================================================================
// Registry Round-Trips
// =============================================================================

#[test]
fn test_register_then_get_returns_registered_tool() {
    let mut registry: Registry<Tool> = Registry::new();
    registry.register(calculator()).unwrap();

    let tool = registry.get("calculator").unwrap();
    assert_eq!(tool.key(), "calculator");
    assert_eq!(tool.description(), "Perform basic arithmetic operations");
}

#[test]
fn test_duplicate_registration_fails_and_state_unchanged() {
    let mut registry: Registry<Tool> = Registry::new();
    registry.register(calculator()).unwrap();

    let err = registry.register(calculator()).unwrap_err();
    assert_eq!(err.kind(), "DuplicateKeyError");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.list().len(), 1);
}

#[test]
fn test_list_returns_metadata_in_registration_order() {
    let mut registry: Registry<Resource> = Registry::new();
    for uri in ["c://1", "a://2", "b://3"] {
        registry
            .register(Resource::new(uri, "R", "resource", || Ok(Value::Null)))
            .unwrap();
    }

    let uris: Vec<String> = registry.list().into_iter().map(|m| m.uri).collect();
    assert_eq!(uris, ["c://1", "a://2", "b://3"]);
}

#[test]
fn test_metadata_has_no_handler_field() {
    let mut registry: Registry<Tool> = Registry::new();
    registry.register(calculator()).unwrap();

    let listing = serde_json::to_value(registry.list()).unwrap();
    let entry = &listing[0];
    assert!(entry.get("handler").is_none());
    assert!(entry.get("inputSchema").is_some());
}

#[test]
fn test_invalid_schema_rejected_at_registration() {
    let mut registry: Registry<Tool> = Registry::new();

    let tool = Tool::new(
        "bad-pattern",
        "Pattern does not compile",
        Schema::object().with_property("id", Schema::string().with_pattern("[unclosed")),
        |_| Ok(Value::Null),
    );

    let err = registry.register(tool).unwrap_err();
    assert_eq!(err.kind(), "InvalidSchemaError");
    assert!(registry.is_empty());
}

// =============================================================================
// Initialization State Machine
// =============================================================================

#[test]
fn test_operations_fail_before_initialize_and_succeed_after() {
    let mut core = ServerCore::new(ServerSettings::default());

    assert!(matches!(
        core.list_tools(),
        Err(ServerError::NotInitialized)
    ));

    core.initialize(Catalog {
        tools: vec![calculator()],
        ..Catalog::default()
    })
    .unwrap();

    assert_eq!(core.list_tools().unwrap().len(), 1);
}

#[test]
fn test_initialize_collects_all_failures() {
    let mut core = ServerCore::new(ServerSettings::default());

    let err = core
        .initialize(Catalog {
            tools: vec![calculator(), calculator()],
            resources: vec![
                Resource::new("dup://x", "A", "first", || Ok(Value::Null)),
                Resource::new("dup://x", "B", "second", || Ok(Value::Null)),
            ],
            ..Catalog::default()
        })
        .unwrap_err();

    let ServerError::Initialization { failures } = err else {
        panic!("expected Initialization, got {err:?}");
    };
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].key, "calculator");
    assert_eq!(failures[1].key, "dup://x");
    assert!(!core.is_initialized());
}

#[test]
fn test_shutdown_then_reinitialize_with_zero_tools() {
    let mut core = initialized_core();
    assert_eq!(core.info().tool_count, 1);

    core.shutdown();
    assert!(!core.is_initialized());

    core.initialize(Catalog::default()).unwrap();
    assert!(core.list_tools().unwrap().is_empty());
    assert!(core.list_resources().unwrap().is_empty());
    assert!(core.list_prompts().unwrap().is_empty());
}

#[test]
fn test_info_reflects_registered_capabilities() {
    let core = initialized_core();
    let info = core.info();

    assert_eq!(info.capabilities, vec!["tools", "resources", "prompts"]);
    assert!(info.initialized);
    assert_eq!(info.name, "workbench-mcp");
}

// =============================================================================
// Tool Execution
// =============================================================================

#[test]
fn test_calculator_add_scenario() {
    let core = initialized_core();

    let result = core
        .execute_tool("calculator", json!({"operation": "add", "a": 5, "b": 3}))
        .unwrap();

    assert_eq!(result, json!({"result": 8.0}));
}

#[test]
fn test_unknown_tool_yields_not_found() {
    let core = initialized_core();

    let err = core.execute_tool("nonexistent", json!({})).unwrap_err();
    assert_eq!(err.kind(), "ToolNotFoundError");
    assert_eq!(err.to_string(), "Tool 'nonexistent' not found");
}

#[test]
fn test_validation_reports_every_missing_field() {
    let core = initialized_core();

    let err = core.execute_tool("calculator", json!({})).unwrap_err();

    let ServerError::Validation { violations } = err else {
        panic!("expected Validation, got {err:?}");
    };
    let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"operation"));
    assert!(paths.contains(&"a"));
    assert!(paths.contains(&"b"));
}

#[test]
fn test_throwing_handler_never_propagates() {
    let mut core = ServerCore::new(ServerSettings::default());
    core.initialize(Catalog {
        tools: vec![Tool::new(
            "explosive",
            "Always fails",
            Schema::object(),
            |_| Err(Failure::new("handler blew up").with_details(json!({"code": 500}))),
        )],
        ..Catalog::default()
    })
    .unwrap();

    let err = core.execute_tool("explosive", json!({})).unwrap_err();
    assert_eq!(err.kind(), "ExecutionError");
    assert_eq!(err.to_string(), "handler blew up");
    assert_eq!(err.details()["code"], 500);
}

// =============================================================================
// Resources and Prompts
// =============================================================================

#[test]
fn test_resource_read_wraps_content() {
    let core = initialized_core();

    let content = core.read_resource("data://fixture").unwrap();
    assert_eq!(content.uri, "data://fixture");
    assert_eq!(content.mime_type, "application/json");
    assert_eq!(content.content["fixture"], true);
}

#[test]
fn test_unknown_resource_yields_not_found() {
    let core = initialized_core();

    let err = core.read_resource("missing://x").unwrap_err();
    assert_eq!(err.kind(), "ResourceNotFoundError");
}

#[test]
fn test_prompt_messages_generated_in_order() {
    let core = initialized_core();

    let messages = core
        .prompt_messages("ask", json!({"question": "why?"}))
        .unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "why?");
}

#[test]
fn test_unknown_prompt_yields_not_found() {
    let core = initialized_core();

    let err = core.prompt_messages("missing", json!({})).unwrap_err();
    assert_eq!(err.kind(), "PromptNotFoundError");
}
