//! Saving and restoring the document snapshot.
//!
//! The snapshot is the serialized document under a single key. Restoring
//! never fails: a missing or unreadable snapshot yields the built-in default
//! document instead.

use inkpad_doc::Value;

use crate::store::Store;
use crate::CoreResult;

const DEFAULT_VALUE_JSON: &str = include_str!("../assets/default_value.json");

/// The document shown when nothing has been saved yet.
pub fn default_value() -> Value {
    match Value::from_json(DEFAULT_VALUE_JSON) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Built-in default document is invalid: {}", e);
            Value::empty()
        }
    }
}

/// Reads and writes the snapshot through a [`Store`].
pub struct PersistenceController {
    store: Box<dyn Store>,
    key: String,
}

impl PersistenceController {
    /// Creates a controller storing the snapshot under `key`.
    pub fn new(store: Box<dyn Store>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes the document and writes it under the key.
    ///
    /// `restore` normalizes what it reads, so it gives back `value` exactly
    /// only if `value` was already normalized. Every value a `Session`
    /// commits is.
    ///
    /// Failures are logged and returned; the caller's value is untouched.
    pub fn save(&mut self, value: &Value) -> CoreResult<()> {
        let result: CoreResult<()> = value
            .to_json()
            .map_err(Into::into)
            .and_then(|json| self.store.set(&self.key, &json).map_err(Into::into));
        match &result {
            Ok(()) => tracing::info!(
                "Saved snapshot under {:?} ({} top-level nodes)",
                self.key,
                value.top_level_node_count()
            ),
            Err(e) => tracing::error!("Failed to save snapshot under {:?}: {}", self.key, e),
        }
        result
    }

    /// Reads the snapshot, or the default document if there is none or it
    /// cannot be parsed.
    pub fn restore(&self) -> Value {
        let json = match self.store.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!("No snapshot under {:?}, using default document", self.key);
                return default_value();
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot under {:?}: {}", self.key, e);
                return default_value();
            }
        };

        match Value::from_json(&json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Snapshot under {:?} is malformed, using default: {}", self.key, e);
                default_value()
            }
        }
    }

    /// Discards `current` and returns the last snapshot.
    pub fn cancel(&self, current: Value) -> Value {
        drop(current);
        self.restore()
    }

    /// Returns true if a snapshot is stored.
    pub fn has_snapshot(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use inkpad_doc::{Document, Node};
    use proptest::prelude::*;

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    impl Store for ReadOnlyStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    fn controller_with(json: Option<&str>) -> PersistenceController {
        let mut store = MemoryStore::new();
        if let Some(json) = json {
            store.set("content", json).unwrap();
        }
        PersistenceController::new(Box::new(store), "content")
    }

    #[test]
    fn test_default_document_shape() {
        let value = default_value();
        assert_eq!(value.top_level_node_count(), 4);
        assert!(value.document().plain_text().contains("A wise quote."));
    }

    #[test]
    fn test_restore_without_snapshot_returns_default() {
        let controller = controller_with(None);
        assert!(!controller.has_snapshot());
        assert_eq!(controller.restore().document(), default_value().document());
    }

    #[test]
    fn test_restore_malformed_returns_default() {
        for json in ["{not json", "null", r#"{"document": {"nodes": [{"object": "gizmo"}]}}"#] {
            let controller = controller_with(Some(json));
            assert_eq!(controller.restore().document(), default_value().document());
        }
    }

    #[test]
    fn test_save_then_restore() {
        let mut controller = controller_with(None);
        let mut value = Value::new(Document::new(vec![Node::paragraph("kept")]));
        value.normalize();

        controller.save(&value).unwrap();
        assert!(controller.has_snapshot());
        assert_eq!(controller.restore().document(), value.document());
    }

    #[test]
    fn test_restore_normalizes_what_was_saved() {
        let mut controller = controller_with(None);
        let value = Value::new(Document::new(vec![Node::image("https://example.com/a.png")]));
        controller.save(&value).unwrap();

        let restored = controller.restore();
        assert_ne!(restored.document(), value.document());
        assert_eq!(restored.top_level_node_count(), 2);
        assert!(restored.document().nodes[0].is_void());
    }

    #[test]
    fn test_cancel_discards_current() {
        let mut controller = controller_with(None);
        let saved = Value::new(Document::new(vec![Node::paragraph("saved")]));
        controller.save(&saved).unwrap();

        let edited = Value::new(Document::new(vec![Node::paragraph("unsaved")]));
        let restored = controller.cancel(edited);
        assert_eq!(restored.document().plain_text(), "saved");
    }

    #[test]
    fn test_save_failure_is_reported_not_fatal() {
        let mut controller = PersistenceController::new(Box::new(ReadOnlyStore), "content");
        assert!(controller.save(&default_value()).is_err());
        assert_eq!(controller.restore().document(), default_value().document());
    }

    proptest! {
        #[test]
        fn save_restore_round_trip(texts in proptest::collection::vec("[a-zA-Z0-9 ]{1,12}", 1..8)) {
            let mut controller = controller_with(None);
            let mut value = Value::new(Document::new(
                texts.iter().map(|text| Node::paragraph(text.as_str())).collect(),
            ));
            value.normalize();

            controller.save(&value).unwrap();
            let restored = controller.restore();
            prop_assert_eq!(restored.document(), value.document());
        }
    }
}
