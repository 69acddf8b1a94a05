//! The stored JSON format.
//!
//! Nodes are stored with an `object` tag and a `type` string:
//!
//! ```json
//! {"object":"block","type":"paragraph","data":{},"nodes":[
//!   {"object":"text","text":"Hi","marks":[{"object":"mark","type":"bold","data":{}}]}
//! ]}
//! ```
//!
//! The older layout where a text node holds `leaves` is accepted on read and
//! expands into one text node per leaf, which is why conversion goes
//! through `RawNode::into_nodes` (one raw node may become several).
//!
//! Marks keep only their type. Any `data` a stored mark carries is dropped
//! on read and written back as `{}`, since a run's marks form an ordered set
//! keyed by type. Block, inline and image `data` survive a round trip.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::node::{Block, BlockKind, Data, Image, Inline, Mark, Marks, Node, Text};
use crate::value::{Document, Value};
use crate::{DocError, DocResult};

const IMAGE_TYPE: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
struct RawValue {
    #[serde(default = "value_object")]
    object: String,
    document: RawDocument,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDocument {
    #[serde(default = "document_object")]
    object: String,
    #[serde(default)]
    data: Data,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawNode {
    object: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nodes: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<RawMark>>,
    #[serde(default, skip_serializing)]
    leaves: Option<Vec<RawLeaf>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawLeaf {
    #[serde(default)]
    text: String,
    #[serde(default)]
    marks: Vec<RawMark>,
}

/// Marks are usually objects, but a bare type string is accepted too.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMark {
    Object {
        #[serde(default = "mark_object")]
        object: String,
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        data: Data,
    },
    Tag(String),
}

fn value_object() -> String {
    "value".to_string()
}

fn document_object() -> String {
    "document".to_string()
}

fn mark_object() -> String {
    "mark".to_string()
}

impl RawMark {
    fn into_mark(self) -> Mark {
        match self {
            RawMark::Object { kind, .. } | RawMark::Tag(kind) => Mark::parse(&kind),
        }
    }
}

impl From<&Mark> for RawMark {
    fn from(mark: &Mark) -> Self {
        RawMark::Object {
            object: mark_object(),
            kind: mark.as_str().to_string(),
            data: Data::new(),
        }
    }
}

fn collect_marks(raw: Vec<RawMark>) -> Marks {
    raw.into_iter().map(RawMark::into_mark).collect()
}

fn convert_children(nodes: Option<Vec<RawNode>>) -> DocResult<Vec<Node>> {
    let mut converted = Vec::new();
    for raw in nodes.unwrap_or_default() {
        converted.extend(raw.into_nodes()?);
    }
    Ok(converted)
}

impl RawNode {
    fn into_nodes(self) -> DocResult<Vec<Node>> {
        match self.object.as_str() {
            "block" => {
                let kind = self.kind.ok_or(DocError::MissingType("block"))?;
                let mut data = self.data.unwrap_or_default();
                if kind == IMAGE_TYPE {
                    let src = match data.remove("src") {
                        Some(serde_json::Value::String(src)) => src,
                        Some(other) => other.to_string(),
                        None => String::new(),
                    };
                    return Ok(vec![Node::Image(Image { src, data })]);
                }
                Ok(vec![Node::Block(Block {
                    kind: BlockKind::parse(&kind),
                    data,
                    nodes: convert_children(self.nodes)?,
                })])
            }
            "inline" => {
                let kind = self.kind.ok_or(DocError::MissingType("inline"))?;
                Ok(vec![Node::Inline(Inline {
                    kind,
                    data: self.data.unwrap_or_default(),
                    nodes: convert_children(self.nodes)?,
                })])
            }
            "text" => match self.leaves {
                Some(leaves) => Ok(leaves
                    .into_iter()
                    .map(|leaf| {
                        Node::Text(Text {
                            text: leaf.text,
                            marks: collect_marks(leaf.marks),
                        })
                    })
                    .collect()),
                None => Ok(vec![Node::Text(Text {
                    text: self.text.unwrap_or_default(),
                    marks: collect_marks(self.marks.unwrap_or_default()),
                })]),
            },
            other => Err(DocError::UnknownObject(other.to_string())),
        }
    }
}

impl From<&Node> for RawNode {
    fn from(node: &Node) -> Self {
        let empty = RawNode {
            object: String::new(),
            kind: None,
            data: None,
            nodes: None,
            text: None,
            marks: None,
            leaves: None,
        };
        match node {
            Node::Block(block) => RawNode {
                object: "block".to_string(),
                kind: Some(block.kind.as_str().to_string()),
                data: Some(block.data.clone()),
                nodes: Some(block.nodes.iter().map(RawNode::from).collect()),
                ..empty
            },
            Node::Image(image) => {
                let mut data = image.data.clone();
                data.insert(
                    "src".to_string(),
                    serde_json::Value::String(image.src.clone()),
                );
                RawNode {
                    object: "block".to_string(),
                    kind: Some(IMAGE_TYPE.to_string()),
                    data: Some(data),
                    nodes: Some(Vec::new()),
                    ..empty
                }
            }
            Node::Inline(inline) => RawNode {
                object: "inline".to_string(),
                kind: Some(inline.kind.clone()),
                data: Some(inline.data.clone()),
                nodes: Some(inline.nodes.iter().map(RawNode::from).collect()),
                ..empty
            },
            Node::Text(text) => RawNode {
                object: "text".to_string(),
                text: Some(text.text.clone()),
                marks: Some(text.marks.iter().map(RawMark::from).collect()),
                ..empty
            },
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawNode::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawNode::deserialize(deserializer)?;
        let mut nodes = raw.into_nodes().map_err(D::Error::custom)?;
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Err(D::Error::custom(DocError::NodeCount(nodes.len())))
        }
    }
}

impl From<&Document> for RawDocument {
    fn from(document: &Document) -> Self {
        RawDocument {
            object: document_object(),
            data: document.data.clone(),
            nodes: document.nodes.iter().map(RawNode::from).collect(),
        }
    }
}

impl TryFrom<RawDocument> for Document {
    type Error = DocError;

    fn try_from(raw: RawDocument) -> DocResult<Self> {
        Ok(Document {
            data: raw.data,
            nodes: convert_children(Some(raw.nodes))?,
        })
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawDocument::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDocument::deserialize(deserializer)?;
        Document::try_from(raw).map_err(D::Error::custom)
    }
}

/// Only the document is stored; selection and pending marks are session state.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawValue {
            object: value_object(),
            document: RawDocument::from(self.document()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawValue::deserialize(deserializer)?;
        let document = Document::try_from(raw.document).map_err(D::Error::custom)?;
        Ok(Value::new(document))
    }
}

/// Counts `document.nodes` in an untyped value. Anything malformed counts as 0.
pub fn raw_top_level_node_count(json: &serde_json::Value) -> usize {
    json.get("document")
        .and_then(|document| document.get("nodes"))
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_with_marks() {
        let node: Node = serde_json::from_value(json!({
            "object": "text",
            "text": "bold words",
            "marks": [{"object": "mark", "type": "bold", "data": {}}, "italic"]
        }))
        .unwrap();
        assert_eq!(
            node,
            Node::Text(Text::with_marks("bold words", [Mark::Bold, Mark::Italic]))
        );
    }

    #[test]
    fn test_mark_data_is_not_kept() {
        let node: Node = serde_json::from_value(json!({
            "object": "text",
            "text": "link",
            "marks": [{"object": "mark", "type": "link", "data": {"href": "https://example.com"}}]
        }))
        .unwrap();
        assert_eq!(
            node,
            Node::Text(Text::with_marks("link", [Mark::Other("link".to_string())]))
        );

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["marks"][0]["type"], json!("link"));
        assert_eq!(back["marks"][0]["data"], json!({}));
    }

    #[test]
    fn test_image_src_moves_out_of_data() {
        let node: Node = serde_json::from_value(json!({
            "object": "block",
            "type": "image",
            "data": {"src": "https://example.com/cat.png", "alt": "cat"},
            "nodes": [{"object": "text", "text": ""}]
        }))
        .unwrap();
        let Node::Image(image) = &node else {
            panic!("expected an image, got {node:?}");
        };
        assert_eq!(image.src, "https://example.com/cat.png");
        assert_eq!(image.data.get("alt"), Some(&json!("cat")));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["data"]["src"], json!("https://example.com/cat.png"));
        assert_eq!(back["type"], json!("image"));
    }

    #[test]
    fn test_leaves_expand_into_runs() {
        let document: Document = serde_json::from_value(json!({
            "object": "document",
            "nodes": [{
                "object": "block",
                "type": "paragraph",
                "nodes": [{
                    "object": "text",
                    "leaves": [
                        {"object": "leaf", "text": "plain ", "marks": []},
                        {"object": "leaf", "text": "code", "marks": [{"type": "code"}]}
                    ]
                }]
            }]
        }))
        .unwrap();
        let Node::Block(block) = &document.nodes[0] else {
            panic!("expected a block");
        };
        assert_eq!(block.nodes.len(), 2);
        assert_eq!(block.nodes[1], Node::Text(Text::with_marks("code", [Mark::Code])));
    }

    #[test]
    fn test_unknown_object_is_an_error() {
        let result: Result<Node, _> = serde_json::from_value(json!({"object": "widget"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_count_tolerates_malformed_input() {
        assert_eq!(raw_top_level_node_count(&json!(null)), 0);
        assert_eq!(raw_top_level_node_count(&json!({"document": {}})), 0);
        assert_eq!(
            raw_top_level_node_count(&json!({"document": {"nodes": [{}, {}]}})),
            2
        );
    }
}
