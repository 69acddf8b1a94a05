//! Schema normalization.
//!
//! After every edit the tree is brought back to a canonical shape:
//!
//! - containers hold either blocks or text, never both; stray text and
//!   inlines next to blocks are wrapped in a paragraph
//! - leaf blocks hold at least one text run, with neighbouring runs of equal
//!   marks merged
//! - the last top-level node is a paragraph, so there is always somewhere to
//!   type after a trailing image or list

use crate::node::{Block, BlockKind, Node};
use crate::runs;
use crate::selection::{Point, Selection};
use crate::value::{Document, Value};

impl Document {
    /// Normalizes the tree in place.
    pub fn normalize(&mut self) {
        normalize_container(&mut self.nodes);

        let ends_with_paragraph = matches!(
            self.nodes.last(),
            Some(Node::Block(block)) if block.kind == BlockKind::Paragraph
        );
        if !ends_with_paragraph {
            self.nodes.push(Node::paragraph(""));
        }
    }
}

fn normalize_container(nodes: &mut Vec<Node>) {
    let mut normalized = Vec::with_capacity(nodes.len());
    let mut stray: Vec<Node> = Vec::new();

    for node in nodes.drain(..) {
        match node {
            Node::Text(_) | Node::Inline(_) => stray.push(node),
            Node::Image(_) => {
                flush_stray(&mut stray, &mut normalized);
                normalized.push(node);
            }
            Node::Block(mut block) => {
                flush_stray(&mut stray, &mut normalized);
                normalize_block(&mut block);
                normalized.push(Node::Block(block));
            }
        }
    }
    flush_stray(&mut stray, &mut normalized);

    *nodes = normalized;
}

fn normalize_block(block: &mut Block) {
    if block.has_block_children() {
        normalize_container(&mut block.nodes);
    } else {
        runs::normalize_runs(&mut block.nodes);
    }
}

/// Wraps collected text and inlines in a paragraph, unless they hold no text.
fn flush_stray(stray: &mut Vec<Node>, out: &mut Vec<Node>) {
    if stray.is_empty() {
        return;
    }
    let mut nodes: Vec<Node> = std::mem::take(stray);
    if runs::text_len(&nodes) == 0 {
        return;
    }
    runs::normalize_runs(&mut nodes);
    out.push(Node::Block(Block::new(BlockKind::Paragraph, nodes)));
}

impl Value {
    /// Normalizes the document and clamps the selection into it.
    pub fn normalize(&mut self) {
        self.document.normalize();
        self.selection = Selection::new(self.clamp(self.selection.anchor), self.clamp(self.selection.focus));
    }

    fn clamp(&self, point: Point) -> Point {
        let last = self.leaf_block_count().saturating_sub(1);
        let block = point.block.min(last);
        let len = self.leaf_len(block).unwrap_or(0);
        Point::new(block, point.offset.min(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Mark, Text};

    #[test]
    fn test_trailing_paragraph_added() {
        let mut document = Document::new(vec![Node::image("a.png")]);
        document.normalize();
        assert_eq!(document.top_level_node_count(), 2);
        assert_eq!(document.nodes[1], Node::paragraph(""));

        let mut empty = Document::default();
        empty.normalize();
        assert_eq!(empty.nodes, vec![Node::paragraph("")]);
    }

    #[test]
    fn test_stray_text_wrapped() {
        let mut document = Document::new(vec![
            Node::Text(Text::new("loose")),
            Node::paragraph("kept"),
            Node::Text(Text::new("")),
        ]);
        document.normalize();
        assert_eq!(
            document.nodes,
            vec![Node::paragraph("loose"), Node::paragraph("kept")]
        );
    }

    #[test]
    fn test_leaf_runs_merged() {
        let mut document = Document::new(vec![Node::Block(Block::new(
            BlockKind::HeadingTwo,
            vec![
                Node::Text(Text::with_marks("a", [Mark::Bold])),
                Node::Text(Text::with_marks("b", [Mark::Bold])),
            ],
        ))]);
        document.normalize();
        assert_eq!(
            document.nodes[0],
            Node::Block(Block::new(
                BlockKind::HeadingTwo,
                vec![Node::Text(Text::with_marks("ab", [Mark::Bold]))],
            ))
        );
    }

    #[test]
    fn test_selection_clamped() {
        let mut value = Value::new(Document::new(vec![Node::paragraph("abc")]));
        value.selection = Selection::new(Point::new(0, 99), Point::new(7, 2));
        value.normalize();
        assert_eq!(value.selection().anchor, Point::new(0, 3));
        assert_eq!(value.selection().focus, Point::new(0, 2));
    }
}
