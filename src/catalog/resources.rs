//! Built-in example resources.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::json;

use crate::config::Config;
use crate::primitives::Resource;

/// Static resource exposing the loaded configuration.
///
/// The configuration is captured at construction, so repeated reads
/// return identical content.
#[must_use]
pub fn config_resource(config: &Config) -> Resource {
    let snapshot = serde_json::to_value(config).unwrap_or_else(|_| json!({}));

    Resource::new(
        "config://app",
        "Application Configuration",
        "Read-only access to application configuration",
        move || Ok(snapshot.clone()),
    )
    .with_mime_type("application/json")
}

/// Dynamic resource reporting current server status.
///
/// Each read embeds a fresh timestamp and bumps a read counter, so
/// content varies between reads.
#[must_use]
pub fn status_resource() -> Resource {
    let read_count = Arc::new(AtomicU64::new(0));

    Resource::new(
        "status://system",
        "System Status",
        "Real-time system status information",
        move || {
            let count = read_count.fetch_add(1, Ordering::Relaxed) + 1;

            Ok(json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "status": "operational",
                "read_count": count,
            }))
        },
    )
    .with_mime_type("application/json")
    .dynamic()
}
