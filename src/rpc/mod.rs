//! The line-delimited JSON protocol layer.
//!
//! Carries `{id, method, params}` requests and
//! `{id, success, result | error}` responses, one JSON object per
//! newline-terminated line over stdin/stdout.
//!
//! # Architecture
//!
//! ```text
//! byte stream → Transport (framing) → Dispatcher (routing)
//!             → ServerCore (execute) → Dispatcher (envelope)
//!             → Transport (framing) → byte stream
//! ```
//!
//! The loop is single-threaded and strictly sequential: responses are
//! emitted in the order their requests were received. The `id` echoed
//! in every response is what would allow a future concurrent transport
//! to pipeline requests instead.

pub mod dispatcher;
pub mod envelope;
pub mod server;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use envelope::{parse_request, ErrorData, RequestEnvelope, ResponseEnvelope};
pub use server::RpcServer;
pub use transport::{StdioTransport, Transport};
