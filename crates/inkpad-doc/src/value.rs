//! The document tree and the editor value that wraps it.

use crate::node::{Block, BlockKind, Data, Marks, Node};
use crate::selection::{Point, Selection};
use crate::{DocError, DocResult};

/// A path from the document root to a node: child indices, outermost first.
pub type Path = Vec<usize>;

/// The root of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub data: Data,
    pub nodes: Vec<Node>,
}

impl Document {
    /// Creates a document from top-level nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            data: Data::new(),
            nodes,
        }
    }

    /// Number of direct children of the root.
    pub fn top_level_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node at `path`.
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for &index in rest {
            node = node.children()?.get(index)?;
        }
        Some(node)
    }

    /// Returns the node at `path` mutably.
    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for &index in rest {
            node = node.children_mut()?.get_mut(index)?;
        }
        Some(node)
    }

    /// Returns the child list at `path`. The empty path is the root's list.
    pub fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.nodes);
        }
        self.node_mut(path)?.children_mut()
    }

    /// Paths of all leaf blocks in document order.
    ///
    /// A leaf block is an image, or a block none of whose children are
    /// blocks. Selection points index into this list.
    pub fn leaf_block_paths(&self) -> Vec<Path> {
        fn walk(nodes: &[Node], prefix: &mut Path, out: &mut Vec<Path>) {
            for (index, node) in nodes.iter().enumerate() {
                prefix.push(index);
                match node {
                    Node::Image(_) => out.push(prefix.clone()),
                    Node::Block(block) if block.has_block_children() => {
                        walk(&block.nodes, prefix, out)
                    }
                    Node::Block(_) => out.push(prefix.clone()),
                    Node::Inline(_) | Node::Text(_) => {}
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut Vec::new(), &mut out);
        out
    }

    /// Returns the closest ancestor of `path` (excluding the node itself)
    /// whose block kind is `kind`.
    pub fn closest_ancestor(&self, path: &[usize], kind: &BlockKind) -> Option<Path> {
        (1..path.len())
            .rev()
            .map(|len| &path[..len])
            .find(|ancestor| self.node(ancestor).and_then(Node::block_kind) == Some(kind))
            .map(<[usize]>::to_vec)
    }

    /// Concatenated text of every node.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(Node::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The editor value: a document plus the selection within it.
///
/// ## Learning: Value Semantics
///
/// Edits never mutate the value the session is showing. The session clones
/// it, edits the clone, and only swaps it in once the clone is accepted.
/// Cloning a tree of a few hundred nodes is cheap next to a redraw.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Value {
    pub(crate) document: Document,
    pub(crate) selection: Selection,
    /// Marks to apply to the next inserted text
    pub(crate) pending_marks: Option<Marks>,
}

impl Value {
    /// Wraps a document, with the caret at the start.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: Selection::default(),
            pending_marks: None,
        }
    }

    /// A document with a single empty paragraph.
    pub fn empty() -> Self {
        Self::new(Document::new(vec![Node::Block(Block::with_text(
            BlockKind::Paragraph,
            "",
        ))]))
    }

    /// Parses the stored JSON form and normalizes the result.
    pub fn from_json(json: &str) -> DocResult<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        value.normalize();
        Ok(value)
    }

    /// Serializes the document to the stored JSON form.
    pub fn to_json(&self) -> DocResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn pending_marks(&self) -> Option<&Marks> {
        self.pending_marks.as_ref()
    }

    /// Number of direct children of the document root.
    pub fn top_level_node_count(&self) -> usize {
        self.document.top_level_node_count()
    }

    /// Number of leaf blocks (valid values of `Point::block`).
    pub fn leaf_block_count(&self) -> usize {
        self.document.leaf_block_paths().len()
    }

    /// Path of the leaf block with the given ordinal.
    pub fn leaf_path(&self, ordinal: usize) -> DocResult<Path> {
        self.document
            .leaf_block_paths()
            .into_iter()
            .nth(ordinal)
            .ok_or(DocError::BlockOutOfBounds(ordinal))
    }

    /// Returns the leaf block with the given ordinal.
    pub fn leaf(&self, ordinal: usize) -> DocResult<&Node> {
        let path = self.leaf_path(ordinal)?;
        self.document
            .node(&path)
            .ok_or(DocError::BlockOutOfBounds(ordinal))
    }

    /// Character length of a leaf block. Images have length 0.
    pub fn leaf_len(&self, ordinal: usize) -> DocResult<usize> {
        Ok(self.leaf(ordinal)?.plain_text().chars().count())
    }

    /// Returns an error unless `point` addresses an existing position.
    pub fn check_point(&self, point: Point) -> DocResult<()> {
        let len = self.leaf_len(point.block)?;
        if point.offset > len {
            return Err(DocError::OffsetOutOfBounds {
                block: point.block,
                offset: point.offset,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Text;

    fn nested() -> Document {
        Document::new(vec![
            Node::paragraph("intro"),
            Node::Block(Block::new(
                BlockKind::BulletedList,
                vec![
                    Node::Block(Block::with_text(BlockKind::ListItem, "one")),
                    Node::Block(Block::with_text(BlockKind::ListItem, "two")),
                ],
            )),
            Node::image("pic.png"),
        ])
    }

    #[test]
    fn test_leaf_block_paths() {
        let doc = nested();
        assert_eq!(
            doc.leaf_block_paths(),
            vec![vec![0], vec![1, 0], vec![1, 1], vec![2]]
        );
        assert_eq!(doc.top_level_node_count(), 3);
    }

    #[test]
    fn test_node_lookup() {
        let doc = nested();
        assert_eq!(
            doc.node(&[1, 1, 0]),
            Some(&Node::Text(Text::new("two")))
        );
        assert!(doc.node(&[5]).is_none());
        assert!(doc.node(&[]).is_none());
    }

    #[test]
    fn test_closest_ancestor() {
        let doc = nested();
        assert_eq!(
            doc.closest_ancestor(&[1, 0], &BlockKind::BulletedList),
            Some(vec![1])
        );
        assert_eq!(doc.closest_ancestor(&[1, 0], &BlockKind::NumberedList), None);
        assert_eq!(doc.closest_ancestor(&[0], &BlockKind::Paragraph), None);
    }

    #[test]
    fn test_leaf_len_and_bounds() {
        let value = Value::new(nested());
        assert_eq!(value.leaf_len(1).unwrap(), 3);
        assert_eq!(value.leaf_len(3).unwrap(), 0);
        assert!(value.check_point(Point::new(0, 5)).is_ok());
        assert!(matches!(
            value.check_point(Point::new(0, 6)),
            Err(DocError::OffsetOutOfBounds { .. })
        ));
        assert!(matches!(
            value.leaf(9),
            Err(DocError::BlockOutOfBounds(9))
        ));
    }
}
