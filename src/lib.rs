//! workbench-mcp: an MCP-style server exposing pluggable tools,
//! resources, and prompts over stdio.
//!
//! The server stores three kinds of primitives in per-kind registries
//! and makes them reachable through a line-delimited JSON protocol:
//!
//! - **Tools** — named, schema-validated invokable functions
//! - **Resources** — URI-addressed readable data sources
//! - **Prompts** — named templates producing role-tagged messages
//!
//! # Architecture
//!
//! ```text
//! byte stream → framing → dispatcher → server core → registries
//! ```
//!
//! The request loop is single-threaded and strictly sequential; the
//! registries are written once during initialization and read-only
//! during dispatch.
//!
//! # Modules
//!
//! - [`catalog`] — Built-in example primitives
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`primitives`] — Tool, Resource, and Prompt definitions
//! - [`registry`] — Uniqueness-enforcing primitive catalogs
//! - [`rpc`] — Wire protocol, framing, dispatch, and the run loop
//! - [`schema`] — Schema descriptors and validation
//! - [`server`] — The server core state machine

pub mod catalog;
pub mod config;
pub mod error;
pub mod primitives;
pub mod registry;
pub mod rpc;
pub mod schema;
pub mod server;
