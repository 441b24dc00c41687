//! Built-in example prompts.

use serde_json::{json, Value};

use crate::primitives::{JsonObject, Message, Prompt};
use crate::schema::Schema;

fn argument<'a>(args: &'a JsonObject, key: &str, fallback: &'a str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

/// Guides the model through a code review.
#[must_use]
pub fn code_review() -> Prompt {
    Prompt::new(
        "code_review",
        "Guide model to review code for quality and best practices",
        Schema::object()
            .with_property("code", Schema::string().with_description("The code to review"))
            .with_property(
                "language",
                Schema::string()
                    .with_description("Programming language of the code")
                    .with_default(json!("unknown")),
            )
            .with_property(
                "focus",
                Schema::string()
                    .with_description("Specific aspects to focus on (e.g. security, performance)")
                    .with_default(json!("general best practices")),
            )
            .with_required(["code"]),
        |args| {
            let code = argument(args, "code", "");
            let language = argument(args, "language", "unknown");
            let focus = argument(args, "focus", "general best practices");

            Ok(vec![
                Message::system(format!(
                    "You are an expert code reviewer. Review the following {language} code \
                     with focus on: {focus}. Provide constructive feedback on code quality, \
                     potential issues, and suggested improvements."
                )),
                Message::user(format!(
                    "Please review this code:\n\n```{language}\n{code}\n```"
                )),
            ])
        },
    )
}

/// Guides the model through summarising a text.
#[must_use]
pub fn summarize() -> Prompt {
    Prompt::new(
        "summarize",
        "Guide model to summarize text content",
        Schema::object()
            .with_property("text", Schema::string().with_description("The text to summarize"))
            .with_property(
                "length",
                Schema::string()
                    .with_description("Desired summary length")
                    .with_enum(vec![json!("short"), json!("medium"), json!("long")])
                    .with_default(json!("medium")),
            )
            .with_required(["text"]),
        |args| {
            let text = argument(args, "text", "");
            let length = argument(args, "length", "medium");

            Ok(vec![
                Message::system(format!(
                    "You are a helpful assistant that creates {length} summaries. \
                     Provide a clear, concise summary of the given text."
                )),
                Message::user(format!(
                    "Please summarize the following text:\n\n{text}"
                )),
            ])
        },
    )
}
