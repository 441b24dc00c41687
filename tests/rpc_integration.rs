//! Integration tests for the wire protocol layer.
//!
//! These verify envelope parsing, the fixed method table, id echoing,
//! malformed-input handling, and framing round-trips.

use serde_json::{json, Value};

use workbench_mcp::catalog;
use workbench_mcp::config::{Config, ServerSettings};
use workbench_mcp::rpc::envelope::parse_request;
use workbench_mcp::rpc::{Dispatcher, RequestEnvelope, ResponseEnvelope, Transport};
use workbench_mcp::server::ServerCore;

fn standard_dispatcher() -> Dispatcher {
    let config = Config::default();
    Dispatcher::new(
        ServerCore::new(ServerSettings::default()),
        catalog::standard(&config),
    )
}

fn initialized_dispatcher() -> Dispatcher {
    let mut dispatcher = standard_dispatcher();
    let response = dispatcher.handle(&request("init", "server.initialize", Value::Null));
    assert!(response.success);
    dispatcher
}

fn request(id: &str, method: &str, params: Value) -> RequestEnvelope {
    RequestEnvelope {
        id: id.to_string(),
        method: method.to_string(),
        params,
    }
}

// =============================================================================
// Envelope Parsing
// =============================================================================

#[test]
fn test_parse_execute_request() {
    let line = r#"{
        "id": "42",
        "method": "tool.execute",
        "params": {
            "name": "calculator",
            "parameters": {"operation": "add", "a": 5, "b": 3}
        }
    }"#;
    // the wire allows any whitespace inside one line's JSON; the framing
    // layer has already stripped the newline terminator
    let line = line.replace('\n', " ");

    let envelope = parse_request(&line).unwrap();
    assert_eq!(envelope.id, "42");
    assert_eq!(envelope.method, "tool.execute");
    assert_eq!(envelope.params["name"], "calculator");
}

#[test]
fn test_parse_invalid_json_is_unrecoverable() {
    let failure = parse_request("this is not json").unwrap_err();
    assert!(failure.id.is_none());
}

#[test]
fn test_parse_recovers_id_from_invalid_envelope() {
    let failure = parse_request(r#"{"id": "req-7", "params": {}}"#).unwrap_err();
    assert_eq!(failure.id.as_deref(), Some("req-7"));
}

// =============================================================================
// Method Table
// =============================================================================

#[test]
fn test_all_eight_methods_are_routable() {
    let mut dispatcher = initialized_dispatcher();

    let calls = [
        ("server.info", Value::Null),
        ("tool.list", Value::Null),
        (
            "tool.execute",
            json!({"name": "echo", "parameters": {"message": "hi"}}),
        ),
        ("resource.list", Value::Null),
        ("resource.read", json!({"uri": "status://system"})),
        ("prompt.list", Value::Null),
        (
            "prompt.get_messages",
            json!({"name": "summarize", "arguments": {"text": "abc"}}),
        ),
    ];

    for (method, params) in calls {
        let response = dispatcher.handle(&request("1", method, params));
        assert!(response.success, "method {method} failed: {response:?}");
    }

    // server.initialize already consumed the staged catalog; a second
    // call is a no-op success
    let response = dispatcher.handle(&request("1", "server.initialize", Value::Null));
    assert!(response.success);
}

#[test]
fn test_unknown_method_never_escapes_dispatcher() {
    let mut dispatcher = initialized_dispatcher();

    let response = dispatcher.handle(&request("9", "registry.drop", Value::Null));

    assert!(!response.success);
    let error = response.error.unwrap();
    assert_eq!(error.kind, "MethodNotFoundError");
    assert_eq!(error.message, "unknown method 'registry.drop'");
    assert_eq!(response.id.as_deref(), Some("9"));
}

#[test]
fn test_calculator_scenario_over_the_wire() {
    let mut dispatcher = initialized_dispatcher();

    let response = dispatcher.handle(&request(
        "calc-1",
        "tool.execute",
        json!({"name": "calculator", "parameters": {"operation": "add", "a": 5, "b": 3}}),
    ));

    assert!(response.success);
    assert_eq!(response.result.unwrap(), json!({"result": 8.0}));
}

#[test]
fn test_nonexistent_tool_scenario_over_the_wire() {
    let mut dispatcher = initialized_dispatcher();

    let response = dispatcher.handle(&request(
        "calc-2",
        "tool.execute",
        json!({"name": "nonexistent", "parameters": {}}),
    ));

    assert!(!response.success);
    let error = response.error.unwrap();
    assert_eq!(error.kind, "ToolNotFoundError");
    assert_eq!(error.message, "Tool 'nonexistent' not found");
}

#[test]
fn test_validation_error_lists_missing_fields() {
    let mut dispatcher = initialized_dispatcher();

    let response = dispatcher.handle(&request(
        "v-1",
        "tool.execute",
        json!({"name": "calculator", "parameters": {"operation": "add"}}),
    ));

    let error = response.error.unwrap();
    assert_eq!(error.kind, "ValidationError");

    let violations = error.details["violations"].as_array().unwrap();
    let paths: Vec<&str> = violations
        .iter()
        .filter_map(|v| v["path"].as_str())
        .collect();
    assert!(paths.contains(&"a"));
    assert!(paths.contains(&"b"));
}

#[test]
fn test_gated_methods_fail_before_initialize() {
    let mut dispatcher = standard_dispatcher();

    for method in ["tool.list", "resource.list", "prompt.list"] {
        let response = dispatcher.handle(&request("1", method, Value::Null));
        assert_eq!(
            response.error.unwrap().kind,
            "ServerNotInitializedError",
            "method {method}"
        );
    }

    // server.info is available in either state
    let response = dispatcher.handle(&request("1", "server.info", Value::Null));
    assert!(response.success);
}

#[test]
fn test_dynamic_status_resource_varies_between_reads() {
    let mut dispatcher = initialized_dispatcher();

    let first = dispatcher
        .handle(&request("1", "resource.read", json!({"uri": "status://system"})))
        .result
        .unwrap();
    let second = dispatcher
        .handle(&request("2", "resource.read", json!({"uri": "status://system"})))
        .result
        .unwrap();

    assert_eq!(first["content"]["read_count"], 1);
    assert_eq!(second["content"]["read_count"], 2);
}

// =============================================================================
// Framing
// =============================================================================

#[tokio::test]
async fn test_response_round_trips_through_framing() {
    use tokio::io::AsyncWriteExt;

    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let (client_read, mut client_write) = tokio::io::split(client);

    let mut server_transport = Transport::new(server_read, server_write);
    let mut client_transport = Transport::new(client_read, tokio::io::sink());

    client_write
        .write_all(b"{\"id\":\"rt-1\",\"method\":\"tool.execute\",\"params\":{\"name\":\"echo\",\"parameters\":{\"message\":\"round trip\"}}}\n")
        .await
        .unwrap();

    let mut dispatcher = initialized_dispatcher();
    let line = server_transport.read_line().await.unwrap().unwrap();
    let req = parse_request(&line).unwrap();
    let response = dispatcher.handle(&req);
    server_transport.write_response(&response).await.unwrap();

    // what the client decodes is structurally identical to what the
    // server sent
    let echoed = client_transport.read_line().await.unwrap().unwrap();
    let decoded: ResponseEnvelope = serde_json::from_str(&echoed).unwrap();
    assert_eq!(decoded, response);
    assert_eq!(decoded.result.unwrap()["echo"], "round trip");
}

#[tokio::test]
async fn test_full_session_over_in_memory_stream() {
    let input = concat!(
        "{\"id\":\"1\",\"method\":\"server.initialize\",\"params\":{}}\n",
        "not even json\n",
        "{\"id\":\"2\",\"method\":\"tool.execute\",\"params\":{\"name\":\"calculator\",\"parameters\":{\"operation\":\"multiply\",\"a\":6,\"b\":7}}}\n",
        "{\"id\":\"3\",\"method\":\"bogus.method\"}\n",
    );

    let mut transport = Transport::new(input.as_bytes(), Vec::new());
    let mut dispatcher = standard_dispatcher();
    let mut responses = Vec::new();

    // drive the same read → parse → dispatch → respond sequence the
    // run loop performs, against in-memory streams
    while let Some(line) = transport.read_line().await.unwrap() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_request(&line) {
            Ok(request) => {
                let response = dispatcher.handle(&request);
                transport.write_response(&response).await.unwrap();
                responses.push(response);
            }
            Err(failure) => {
                // unrecoverable id: dropped, loop continues
                assert!(failure.id.is_none());
            }
        }
    }

    // the malformed line was discarded; three requests got responses,
    // in request order
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].id.as_deref(), Some("1"));
    assert!(responses[0].success);
    assert_eq!(responses[1].id.as_deref(), Some("2"));
    assert_eq!(responses[1].result.as_ref().unwrap()["result"], 42.0);
    assert_eq!(responses[2].id.as_deref(), Some("3"));
    assert_eq!(
        responses[2].error.as_ref().unwrap().kind,
        "MethodNotFoundError"
    );
}
