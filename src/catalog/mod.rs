//! Built-in example primitives.
//!
//! These are the demonstration tools, resources, and prompts the
//! server ships with. They exercise the public primitive API exactly
//! as an embedding application would, with no special access to server
//! internals.

pub mod prompts;
pub mod resources;
pub mod tools;

use crate::config::Config;
use crate::primitives::Catalog;

/// Assembles the standard catalog staged at server start.
#[must_use]
pub fn standard(config: &Config) -> Catalog {
    Catalog {
        tools: vec![
            tools::calculator(),
            tools::echo(),
            tools::batch_processor(),
        ],
        resources: vec![
            resources::config_resource(config),
            resources::status_resource(),
        ],
        prompts: vec![prompts::code_review(), prompts::summarize()],
    }
}
