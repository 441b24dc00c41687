//! Uniqueness-enforcing catalogs for server primitives.
//!
//! One [`Registry`] instance exists per primitive kind (tools,
//! resources, prompts), owned by the server core. Registries are plain
//! values with no global state: tests construct fresh instances instead
//! of clearing a process-wide singleton.
//!
//! Listing order is registration order. Lookup is O(1).

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::RegistryError;

/// Contract a primitive must satisfy to live in a [`Registry`].
pub trait RegistryEntry {
    /// Kind label used in log lines and error messages.
    const KIND: &'static str;

    /// Handler-free view returned by [`Registry::list`].
    type Metadata: Serialize;

    /// The unique key (name or URI) of this entry.
    fn key(&self) -> &str;

    /// Validates the entry's declared schemas.
    ///
    /// # Errors
    ///
    /// Returns a description of the structural problem, which the
    /// registry wraps into [`RegistryError::InvalidSchema`].
    fn check(&self) -> Result<(), String>;

    /// Returns the metadata view of this entry.
    fn metadata(&self) -> Self::Metadata;
}

/// A catalog of one primitive kind, keyed by name or URI.
#[derive(Debug)]
pub struct Registry<T: RegistryEntry> {
    entries: IndexMap<String, T>,
}

impl<T: RegistryEntry> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Registers an entry.
    ///
    /// Registration is atomic: on failure the registry is unchanged.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyKey`] if the entry's key is empty
    /// - [`RegistryError::Duplicate`] if the key is already registered
    /// - [`RegistryError::InvalidSchema`] if the entry's declared schema
    ///   is structurally malformed
    pub fn register(&mut self, entry: T) -> Result<(), RegistryError> {
        let key = entry.key();

        if key.is_empty() {
            return Err(RegistryError::EmptyKey { kind: T::KIND });
        }

        if self.entries.contains_key(key) {
            return Err(RegistryError::Duplicate {
                kind: T::KIND,
                key: key.to_string(),
            });
        }

        entry.check().map_err(|reason| RegistryError::InvalidSchema {
            kind: T::KIND,
            key: key.to_string(),
            reason,
        })?;

        let key = key.to_string();
        tracing::info!(kind = T::KIND, key = %key, "registered");
        self.entries.insert(key, entry);

        Ok(())
    }

    /// Looks up an entry by key.
    ///
    /// Absence is not an error here; callers decide whether a miss is.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Returns metadata views of all entries, in registration order.
    ///
    /// Never exposes handlers and never fails.
    #[must_use]
    pub fn list(&self) -> Vec<T::Metadata> {
        self.entries.values().map(RegistryEntry::metadata).collect()
    }

    /// Iterates over registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Removes an entry if present.
    ///
    /// Returns `true` if something was removed; a miss is a no-op.
    pub fn unregister(&mut self, key: &str) -> bool {
        // shift_remove keeps the remaining entries in registration order
        let removed = self.entries.shift_remove(key).is_some();
        if removed {
            tracing::info!(kind = T::KIND, key, "unregistered");
        }
        removed
    }

    /// Removes all entries, resetting the registry to its initial state.
    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::debug!(kind = T::KIND, "registry cleared");
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the key is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl<T: RegistryEntry> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        key: String,
        sound: String,
        valid: bool,
    }

    impl Widget {
        fn new(key: &str) -> Self {
            Self {
                key: key.to_string(),
                sound: "beep".to_string(),
                valid: true,
            }
        }

        fn malformed(key: &str) -> Self {
            Self {
                valid: false,
                ..Self::new(key)
            }
        }
    }

    #[derive(serde::Serialize)]
    struct WidgetMetadata {
        key: String,
    }

    impl RegistryEntry for Widget {
        const KIND: &'static str = "widget";
        type Metadata = WidgetMetadata;

        fn key(&self) -> &str {
            &self.key
        }

        fn check(&self) -> Result<(), String> {
            if self.valid {
                Ok(())
            } else {
                Err("broken schema".to_string())
            }
        }

        fn metadata(&self) -> WidgetMetadata {
            WidgetMetadata {
                key: self.key.clone(),
            }
        }
    }

    #[test]
    fn register_then_get_round_trips() {
        let mut registry = Registry::new();
        registry.register(Widget::new("a")).unwrap();

        let entry = registry.get("a").unwrap();
        assert_eq!(entry.key(), "a");
        assert_eq!(entry.sound, "beep");
    }

    #[test]
    fn duplicate_key_rejected_and_state_unchanged() {
        let mut registry = Registry::new();
        registry.register(Widget::new("a")).unwrap();

        let err = registry.register(Widget::new("a")).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_key_rejected() {
        let mut registry = Registry::new();
        let err = registry.register(Widget::new("")).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyKey { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_schema_rejected() {
        let mut registry = Registry::new();
        let err = registry.register(Widget::malformed("bad")).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchema { .. }));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn list_preserves_registration_order() {
        let mut registry = Registry::new();
        for key in ["c", "a", "b"] {
            registry.register(Widget::new(key)).unwrap();
        }

        let keys: Vec<String> = registry.list().into_iter().map(|m| m.key).collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }

    #[test]
    fn unregister_missing_is_noop() {
        let mut registry = Registry::new();
        registry.register(Widget::new("a")).unwrap();

        assert!(!registry.unregister("missing"));
        assert!(registry.unregister("a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_resets_to_initial_state() {
        let mut registry = Registry::new();
        registry.register(Widget::new("a")).unwrap();
        registry.register(Widget::new("b")).unwrap();

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
        // a cleared registry accepts the same keys again
        registry.register(Widget::new("a")).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
