//! The mutation gate: a ceiling on the number of top-level nodes.
//!
//! The gate is a pure predicate. It has no state of its own; the session
//! owns the ceiling and asks the gate about every candidate value.

use inkpad_doc::{Value, raw_top_level_node_count};

/// Outcome of evaluating a candidate against a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict {
    pub accepted: bool,
    /// Top-level node count of the candidate
    pub proposed: usize,
    pub ceiling: usize,
}

/// Returns true if `candidate` has at most `ceiling` top-level nodes.
pub fn accept(candidate: &Value, ceiling: usize) -> bool {
    candidate.top_level_node_count() <= ceiling
}

/// Like [`accept`], for an untyped JSON value. A value without
/// `document.nodes` counts as 0 nodes.
pub fn accept_raw(candidate: &serde_json::Value, ceiling: usize) -> bool {
    raw_top_level_node_count(candidate) <= ceiling
}

/// Evaluates `candidate` and reports the counts involved.
pub fn evaluate(candidate: &Value, ceiling: usize) -> GateVerdict {
    let proposed = candidate.top_level_node_count();
    GateVerdict {
        accepted: proposed <= ceiling,
        proposed,
        ceiling,
    }
}

/// Parses the text of the ceiling input.
///
/// Empty input means 0. Negative or non-numeric input yields `None`, and the
/// caller keeps its previous ceiling.
pub fn parse_ceiling(input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    input.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_doc::{Document, Node};
    use proptest::prelude::*;
    use serde_json::json;

    fn with_nodes(count: usize) -> Value {
        Value::new(Document::new(
            (0..count).map(|i| Node::paragraph(format!("p{i}"))).collect(),
        ))
    }

    #[test]
    fn test_zero_ceiling_rejects_non_empty() {
        assert!(!accept(&with_nodes(1), 0));
        assert!(accept(&Value::new(Document::default()), 0));
    }

    #[test]
    fn test_boundary() {
        assert!(accept(&with_nodes(3), 3));
        assert!(!accept(&with_nodes(4), 3));
        assert_eq!(
            evaluate(&with_nodes(4), 3),
            GateVerdict {
                accepted: false,
                proposed: 4,
                ceiling: 3
            }
        );
    }

    #[test]
    fn test_malformed_raw_counts_as_zero() {
        assert!(accept_raw(&json!({"unexpected": true}), 0));
        assert!(accept_raw(&json!("text"), 0));
        assert!(!accept_raw(&json!({"document": {"nodes": [{}]}}), 0));
    }

    #[test]
    fn test_parse_ceiling() {
        assert_eq!(parse_ceiling(""), Some(0));
        assert_eq!(parse_ceiling(" 7 "), Some(7));
        assert_eq!(parse_ceiling("-2"), None);
        assert_eq!(parse_ceiling("many"), None);
    }

    proptest! {
        #[test]
        fn accept_matches_count(count in 0usize..40, ceiling in 0usize..40) {
            let value = with_nodes(count);
            prop_assert_eq!(accept(&value, ceiling), count <= ceiling);
            prop_assert_eq!(evaluate(&value, ceiling).proposed, count);
        }

        #[test]
        fn accept_raw_agrees_with_typed(count in 0usize..20, ceiling in 0usize..20) {
            let value = with_nodes(count);
            let raw: serde_json::Value = serde_json::from_str(&value.to_json().unwrap()).unwrap();
            prop_assert_eq!(accept_raw(&raw, ceiling), accept(&value, ceiling));
        }
    }
}
