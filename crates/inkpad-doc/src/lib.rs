//! # Inkpad Doc
//!
//! The rich-text document model: a tree of blocks, inlines and marked text
//! runs, a selection into it, and the edit operations on both.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Enums for Tree Nodes
//! - `Node` is a closed set of variants, so every traversal is an exhaustive
//!   `match` and the compiler flags any kind a function forgets to handle
//!
//! ### Ownership & Borrowing
//! - A `Value` owns its whole tree; edits take `&mut self`
//! - Queries like `Value::selected_blocks()` borrow nodes out of the tree
//!
//! ### Serde Without Derive Mirrors
//! - The stored JSON layout lives in private `Raw*` types; public types
//!   implement `Serialize`/`Deserialize` by converting through them

mod history;
mod json;
mod node;
mod normalize;
mod runs;
mod selection;
mod transform;
mod value;

pub use history::{EditKind, History};
pub use json::raw_top_level_node_count;
pub use node::{Block, BlockKind, Data, Image, Inline, Mark, Marks, Node, Text};
pub use selection::{Point, Selection};
pub use value::{Document, Path, Value};

/// Result type for document operations
pub type DocResult<T> = Result<T, DocError>;

/// Errors that can occur while parsing or editing a document
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("Invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown node object: {0}")]
    UnknownObject(String),

    #[error("{0} node is missing its type")]
    MissingType(&'static str),

    #[error("Expected exactly one node, got {0}")]
    NodeCount(usize),

    #[error("Block {0} is out of bounds")]
    BlockOutOfBounds(usize),

    #[error("Offset {offset} is out of bounds in block {block}")]
    OffsetOutOfBounds { block: usize, offset: usize },

    #[error("No node at path {0:?}")]
    InvalidPath(Vec<usize>),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "object": "value",
        "document": {
            "object": "document",
            "data": {},
            "nodes": [
                {"object": "block", "type": "heading-one", "data": {}, "nodes": [
                    {"object": "text", "text": "Title", "marks": []}
                ]},
                {"object": "block", "type": "paragraph", "data": {}, "nodes": [
                    {"object": "text", "text": "Some ", "marks": []},
                    {"object": "text", "text": "bold", "marks": [{"object": "mark", "type": "bold", "data": {}}]}
                ]}
            ]
        }
    }"#;

    #[test]
    fn test_value_json_round_trip() {
        let value = Value::from_json(SAMPLE).unwrap();
        assert_eq!(value.top_level_node_count(), 2);

        let json = value.to_json().unwrap();
        let again = Value::from_json(&json).unwrap();
        assert_eq!(again.document(), value.document());
    }

    #[test]
    fn test_from_json_normalizes() {
        let value = Value::from_json(
            r#"{"document": {"nodes": [{"object": "block", "type": "image", "data": {"src": "a.png"}}]}}"#,
        )
        .unwrap();
        assert_eq!(value.top_level_node_count(), 2);
        assert!(value.document().nodes[0].is_void());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(Value::from_json("{not json"), Err(DocError::Parse(_))));
        assert!(Value::from_json(r#"{"document": {"nodes": [{"object": "block"}]}}"#).is_err());
    }

    #[test]
    fn test_edit_then_serialize() {
        let mut value = Value::from_json(SAMPLE).unwrap();
        value.select_block(1).unwrap();
        value.insert_text("!").unwrap();
        value.normalize();
        assert!(value.to_json().unwrap().contains("bold!"));
    }
}
