//! Document tree nodes.
//!
//! ## Learning: Sum Types Instead of Type Tags
//!
//! The stored format identifies nodes by strings (`"object": "block"`,
//! `"type": "heading-one"`). In memory every known kind is an enum variant,
//! so rendering and editing code is an exhaustive `match`. Kinds we don't
//! know survive in `Other(String)` variants and round-trip unchanged.

use std::collections::BTreeSet;
use std::fmt;

/// Key/value data attached to blocks, inlines and the document.
pub type Data = serde_json::Map<String, serde_json::Value>;

/// The kind of a (non-void) block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    NumberedList,
    BulletedList,
    ListItem,
    /// A block type defined outside this crate
    Other(String),
}

impl BlockKind {
    /// The type tag used in the stored format.
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::HeadingOne => "heading-one",
            BlockKind::HeadingTwo => "heading-two",
            BlockKind::BlockQuote => "block-quote",
            BlockKind::NumberedList => "numbered-list",
            BlockKind::BulletedList => "bulleted-list",
            BlockKind::ListItem => "list-item",
            BlockKind::Other(name) => name,
        }
    }

    /// Maps a type tag to a kind. Unknown tags become `Other`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "paragraph" => BlockKind::Paragraph,
            "heading-one" => BlockKind::HeadingOne,
            "heading-two" => BlockKind::HeadingTwo,
            "block-quote" => BlockKind::BlockQuote,
            "numbered-list" => BlockKind::NumberedList,
            "bulleted-list" => BlockKind::BulletedList,
            "list-item" => BlockKind::ListItem,
            other => BlockKind::Other(other.to_string()),
        }
    }

    /// Returns true for the two list wrapper kinds.
    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::NumberedList | BlockKind::BulletedList)
    }

    /// For a list kind, returns the other list kind.
    pub fn other_list(&self) -> Option<BlockKind> {
        match self {
            BlockKind::NumberedList => Some(BlockKind::BulletedList),
            BlockKind::BulletedList => Some(BlockKind::NumberedList),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A style annotation on a text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    Bold,
    Italic,
    Underlined,
    Code,
    /// A mark type defined outside this crate
    Other(String),
}

impl Mark {
    /// The type tag used in the stored format.
    pub fn as_str(&self) -> &str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underlined => "underlined",
            Mark::Code => "code",
            Mark::Other(name) => name,
        }
    }

    /// Maps a type tag to a mark. Unknown tags become `Other`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "bold" => Mark::Bold,
            "italic" => Mark::Italic,
            "underlined" => Mark::Underlined,
            "code" => Mark::Code,
            other => Mark::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of marks on a run.
pub type Marks = BTreeSet<Mark>;

/// A run of text sharing one set of marks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub text: String,
    pub marks: Marks,
}

impl Text {
    /// Creates an unmarked run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::new(),
        }
    }

    /// Creates a run with the given marks.
    pub fn with_marks(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Self {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A block element with children.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub data: Data,
    pub nodes: Vec<Node>,
}

impl Block {
    /// Creates a block with the given children.
    pub fn new(kind: BlockKind, nodes: Vec<Node>) -> Self {
        Self {
            kind,
            data: Data::new(),
            nodes,
        }
    }

    /// Creates a block holding a single unmarked run.
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        Self::new(kind, vec![Node::Text(Text::new(text))])
    }

    /// Returns true if any child is itself a block or image.
    pub fn has_block_children(&self) -> bool {
        self.nodes.iter().any(Node::is_block_like)
    }
}

/// The void image block. Its only content is `src`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    /// Any data keys besides `src`
    pub data: Data,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            data: Data::new(),
        }
    }
}

/// An inline element (a link, a mention) wrapping text runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Inline {
    pub kind: String,
    pub data: Data,
    pub nodes: Vec<Node>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Image(Image),
    Inline(Inline),
    Text(Text),
}

impl Node {
    /// Shorthand for an unmarked paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Block(Block::with_text(BlockKind::Paragraph, text))
    }

    /// Shorthand for an image block.
    pub fn image(src: impl Into<String>) -> Self {
        Node::Image(Image::new(src))
    }

    /// Returns true for blocks and images.
    pub fn is_block_like(&self) -> bool {
        matches!(self, Node::Block(_) | Node::Image(_))
    }

    /// Returns true if this node takes no children.
    pub fn is_void(&self) -> bool {
        matches!(self, Node::Image(_))
    }

    /// Returns the block kind, if this is a non-void block.
    pub fn block_kind(&self) -> Option<&BlockKind> {
        match self {
            Node::Block(block) => Some(&block.kind),
            _ => None,
        }
    }

    /// Returns the children, if this node can have any.
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Block(block) => Some(&block.nodes),
            Node::Inline(inline) => Some(&inline.nodes),
            Node::Image(_) | Node::Text(_) => None,
        }
    }

    /// Returns the children mutably, if this node can have any.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Block(block) => Some(&mut block.nodes),
            Node::Inline(inline) => Some(&mut inline.nodes),
            Node::Image(_) | Node::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(text) => text.text.clone(),
            Node::Image(_) => String::new(),
            Node::Block(Block { nodes, .. }) | Node::Inline(Inline { nodes, .. }) => {
                nodes.iter().map(Node::plain_text).collect()
            }
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Image> for Node {
    fn from(image: Image) -> Self {
        Node::Image(image)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind_tags() {
        for kind in [
            BlockKind::Paragraph,
            BlockKind::HeadingOne,
            BlockKind::HeadingTwo,
            BlockKind::BlockQuote,
            BlockKind::NumberedList,
            BlockKind::BulletedList,
            BlockKind::ListItem,
        ] {
            assert_eq!(BlockKind::parse(kind.as_str()), kind);
        }
        assert_eq!(
            BlockKind::parse("callout"),
            BlockKind::Other("callout".to_string())
        );
    }

    #[test]
    fn test_other_list() {
        assert_eq!(
            BlockKind::NumberedList.other_list(),
            Some(BlockKind::BulletedList)
        );
        assert_eq!(BlockKind::Paragraph.other_list(), None);
    }

    #[test]
    fn test_mark_tags() {
        assert_eq!(Mark::parse("underlined"), Mark::Underlined);
        assert_eq!(Mark::parse("strike"), Mark::Other("strike".to_string()));
        assert_eq!(Mark::Code.to_string(), "code");
    }

    #[test]
    fn test_plain_text() {
        let block = Node::Block(Block::new(
            BlockKind::Paragraph,
            vec![
                Node::Text(Text::new("one ")),
                Node::Inline(Inline {
                    kind: "link".to_string(),
                    data: Data::new(),
                    nodes: vec![Node::Text(Text::with_marks("two", [Mark::Bold]))],
                }),
            ],
        ));
        assert_eq!(block.plain_text(), "one two");
        assert!(Node::image("a.png").is_void());
    }
}
