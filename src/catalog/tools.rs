//! Built-in example tools.

use serde_json::{json, Value};

use crate::primitives::{Failure, JsonObject, Tool};
use crate::schema::Schema;

/// Extracts a numeric parameter the schema already validated.
fn number(params: &JsonObject, key: &str) -> Result<f64, Failure> {
    params
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| Failure::new(format!("parameter '{key}' must be a number")))
}

/// Extracts a string parameter the schema already validated.
fn string<'a>(params: &'a JsonObject, key: &str) -> Result<&'a str, Failure> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Failure::new(format!("parameter '{key}' must be a string")))
}

/// Basic arithmetic over two operands.
#[must_use]
pub fn calculator() -> Tool {
    Tool::new(
        "calculator",
        "Perform basic arithmetic operations (add, subtract, multiply, divide)",
        Schema::object()
            .with_property(
                "operation",
                Schema::string()
                    .with_enum(vec![
                        json!("add"),
                        json!("subtract"),
                        json!("multiply"),
                        json!("divide"),
                    ])
                    .with_description("Arithmetic operation to perform"),
            )
            .with_property("a", Schema::number().with_description("First operand"))
            .with_property("b", Schema::number().with_description("Second operand"))
            .with_required(["operation", "a", "b"]),
        |params| {
            let operation = string(params, "operation")?;
            let a = number(params, "a")?;
            let b = number(params, "b")?;

            let result = match operation {
                "add" => a + b,
                "subtract" => a - b,
                "multiply" => a * b,
                "divide" => {
                    if b == 0.0 {
                        return Err(Failure::new("Division by zero is not allowed")
                            .with_details(json!({ "a": a, "b": b })));
                    }
                    a / b
                }
                other => {
                    // unreachable behind the enum constraint
                    return Err(Failure::new(format!("Invalid operation: {other}")));
                }
            };

            Ok(json!({ "result": result }))
        },
    )
    .with_output_schema(
        Schema::object()
            .with_property("result", Schema::number().with_description("Calculation result")),
    )
}

/// Returns the input message unchanged.
#[must_use]
pub fn echo() -> Tool {
    Tool::new(
        "echo",
        "Echo back the provided message",
        Schema::object()
            .with_property(
                "message",
                Schema::string().with_description("Message to echo back"),
            )
            .with_required(["message"]),
        |params| {
            let message = string(params, "message")?;
            Ok(json!({ "echo": message }))
        },
    )
    .with_output_schema(
        Schema::object()
            .with_property("echo", Schema::string().with_description("Echoed message")),
    )
}

/// The transform applied to each batch item.
fn process_item(number: f64) -> f64 {
    let mut result = number * number;
    for i in 0..1000 {
        result = (result + f64::from(i) * 0.0001) % 1_000_000.0;
    }
    result
}

/// Applies a compute-heavy transform to a batch of numbers.
///
/// Items are processed in input order and results line up index for
/// index with the input.
#[must_use]
pub fn batch_processor() -> Tool {
    Tool::new(
        "batch_processor",
        "Process a batch of numbers with a compute-heavy transform",
        Schema::object()
            .with_property(
                "items",
                Schema::array_of(Schema::number())
                    .with_description("Numbers to process, in order"),
            )
            .with_required(["items"]),
        |params| {
            let items = params
                .get("items")
                .and_then(Value::as_array)
                .ok_or_else(|| Failure::new("parameter 'items' must be an array"))?;

            let results: Vec<f64> = items
                .iter()
                .filter_map(Value::as_f64)
                .map(process_item)
                .collect();

            Ok(json!({ "results": results, "count": results.len() }))
        },
    )
    .with_output_schema(
        Schema::object()
            .with_property("results", Schema::array_of(Schema::number()))
            .with_property("count", Schema::integer()),
    )
}
