//! Character-offset operations on the children of a leaf block.
//!
//! A leaf block holds text runs, possibly nested inside inlines. Offsets
//! count characters across all of them in order.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::node::{Inline, Marks, Node, Text};

/// Character length of a run list.
pub(crate) fn text_len(nodes: &[Node]) -> usize {
    nodes.iter().map(node_len).sum()
}

fn node_len(node: &Node) -> usize {
    match node {
        Node::Text(text) => text.len(),
        Node::Inline(inline) => text_len(&inline.nodes),
        Node::Block(_) | Node::Image(_) => 0,
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Ensures a run boundary exists at `offset`, splitting a text if needed.
pub(crate) fn split_at(nodes: &mut Vec<Node>, offset: usize) {
    let mut start = 0;
    for index in 0..nodes.len() {
        let len = node_len(&nodes[index]);
        if offset > start && offset < start + len {
            let right = match &mut nodes[index] {
                Node::Text(text) => {
                    let at = byte_index(&text.text, offset - start);
                    Some(Node::Text(Text {
                        text: text.text.split_off(at),
                        marks: text.marks.clone(),
                    }))
                }
                Node::Inline(inline) => {
                    split_at(&mut inline.nodes, offset - start);
                    None
                }
                Node::Block(_) | Node::Image(_) => None,
            };
            if let Some(right) = right {
                nodes.insert(index + 1, right);
            }
            return;
        }
        start += len;
    }
}

/// Applies `f` to every text lying inside `range`, splitting runs at the
/// range boundaries first.
pub(crate) fn update_range<F>(nodes: &mut Vec<Node>, range: Range<usize>, f: &mut F)
where
    F: FnMut(&mut Text),
{
    if range.is_empty() {
        return;
    }
    split_at(nodes, range.start);
    split_at(nodes, range.end);
    visit_range(nodes, 0, &range, f);
}

fn visit_range<F>(nodes: &mut [Node], mut start: usize, range: &Range<usize>, f: &mut F)
where
    F: FnMut(&mut Text),
{
    for node in nodes.iter_mut() {
        let len = node_len(node);
        let end = start + len;
        if len > 0 && start < range.end && end > range.start {
            match node {
                Node::Text(text) => f(text),
                Node::Inline(inline) => visit_range(&mut inline.nodes, start, range, f),
                Node::Block(_) | Node::Image(_) => {}
            }
        }
        start = end;
    }
}

/// Texts with at least one character inside `range`.
pub(crate) fn texts_in_range(nodes: &[Node], range: Range<usize>) -> Vec<&Text> {
    fn collect<'a>(nodes: &'a [Node], mut start: usize, range: &Range<usize>, out: &mut Vec<&'a Text>) {
        for node in nodes {
            let len = node_len(node);
            let end = start + len;
            if len > 0 && start < range.end && end > range.start {
                match node {
                    Node::Text(text) => out.push(text),
                    Node::Inline(inline) => collect(&inline.nodes, start, range, out),
                    Node::Block(_) | Node::Image(_) => {}
                }
            }
            start = end;
        }
    }

    let mut out = Vec::new();
    collect(nodes, 0, &range, &mut out);
    out
}

/// The text a caret at `offset` belongs to: the one ending at or spanning
/// the offset, or the first text for offset 0.
pub(crate) fn text_at(nodes: &[Node], offset: usize) -> Option<&Text> {
    let mut start = 0;
    for node in nodes {
        let len = node_len(node);
        if offset == 0 || (start < offset && offset <= start + len) {
            match node {
                Node::Text(text) => return Some(text),
                Node::Inline(inline) => return text_at(&inline.nodes, offset - start),
                Node::Block(_) | Node::Image(_) => {}
            }
        }
        start += len;
    }
    None
}

fn text_at_mut(nodes: &mut [Node], offset: usize) -> Option<(&mut Text, usize)> {
    let mut start = 0;
    for node in nodes.iter_mut() {
        let len = node_len(node);
        if offset == 0 || (start < offset && offset <= start + len) {
            match node {
                Node::Text(text) => return Some((text, offset - start)),
                Node::Inline(inline) => return text_at_mut(&mut inline.nodes, offset - start),
                Node::Block(_) | Node::Image(_) => {}
            }
        }
        start += len;
    }
    None
}

/// Inserts a new run at a boundary. Returns false if no boundary was found.
fn insert_run(nodes: &mut Vec<Node>, offset: usize, run: Text) -> bool {
    let mut start = 0;
    for index in 0..nodes.len() {
        if start == offset {
            nodes.insert(index, Node::Text(run));
            return true;
        }
        let len = node_len(&nodes[index]);
        if start < offset && offset < start + len {
            return match &mut nodes[index] {
                Node::Inline(inline) => insert_run(&mut inline.nodes, offset - start, run),
                _ => false,
            };
        }
        start += len;
    }
    if start == offset {
        nodes.push(Node::Text(run));
        return true;
    }
    false
}

/// Inserts `text` at `offset`.
///
/// Without `marks`, or when `marks` equal those of the run at the caret, the
/// text extends that run. Otherwise it becomes a run of its own.
pub(crate) fn insert_text(nodes: &mut Vec<Node>, offset: usize, text: &str, marks: Option<&Marks>) {
    let same_marks = match (marks, text_at(nodes, offset)) {
        (None, _) => true,
        (Some(marks), Some(current)) => &current.marks == marks,
        (Some(marks), None) => marks.is_empty(),
    };

    if same_marks {
        if let Some((run, local)) = text_at_mut(nodes, offset) {
            let at = byte_index(&run.text, local);
            run.text.insert_str(at, text);
            return;
        }
    }

    split_at(nodes, offset);
    let run = Text {
        text: text.to_string(),
        marks: marks.cloned().unwrap_or_default(),
    };
    insert_run(nodes, offset, run);
}

/// Clears the characters in `range`. Empty runs are left for normalization.
pub(crate) fn remove_range(nodes: &mut Vec<Node>, range: Range<usize>) {
    update_range(nodes, range, &mut |text: &mut Text| text.text.clear());
}

/// Splits the runs at `offset` and returns everything after it.
pub(crate) fn split_off(nodes: &mut Vec<Node>, offset: usize) -> Vec<Node> {
    split_at(nodes, offset);
    let mut start = 0;
    for index in 0..nodes.len() {
        if start >= offset {
            return nodes.split_off(index);
        }
        let len = node_len(&nodes[index]);
        if start + len > offset {
            if let Node::Inline(inline) = &mut nodes[index] {
                let right = Inline {
                    kind: inline.kind.clone(),
                    data: inline.data.clone(),
                    nodes: split_off(&mut inline.nodes, offset - start),
                };
                let mut rest = nodes.split_off(index + 1);
                rest.insert(0, Node::Inline(right));
                return rest;
            }
            return nodes.split_off(index + 1);
        }
        start += len;
    }
    Vec::new()
}

/// Merges neighbouring texts with equal marks and drops empty runs and
/// inlines. Always leaves at least one text.
pub(crate) fn normalize_runs(nodes: &mut Vec<Node>) {
    for node in nodes.iter_mut() {
        if let Node::Inline(inline) = node {
            normalize_runs(&mut inline.nodes);
        }
    }
    nodes.retain(|node| match node {
        Node::Inline(inline) => text_len(&inline.nodes) > 0,
        Node::Text(_) => true,
        Node::Block(_) | Node::Image(_) => false,
    });

    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        if let (Some(Node::Text(prev)), Node::Text(text)) = (merged.last_mut(), &node) {
            if text.text.is_empty() || prev.marks == text.marks {
                prev.text.push_str(&text.text);
                continue;
            }
            if prev.text.is_empty() {
                *prev = text.clone();
                continue;
            }
        }
        merged.push(node);
    }

    if merged.is_empty() {
        merged.push(Node::Text(Text::default()));
    }
    *nodes = merged;
}

fn grapheme_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut chars = 0;
    for grapheme in text.graphemes(true) {
        chars += grapheme.chars().count();
        boundaries.push(chars);
    }
    boundaries
}

/// Character offset of the grapheme boundary before `offset`.
pub(crate) fn prev_boundary(text: &str, offset: usize) -> usize {
    grapheme_boundaries(text)
        .into_iter()
        .rev()
        .find(|&boundary| boundary < offset)
        .unwrap_or(0)
}

/// Character offset of the grapheme boundary after `offset`.
pub(crate) fn next_boundary(text: &str, offset: usize) -> usize {
    grapheme_boundaries(text)
        .into_iter()
        .find(|&boundary| boundary > offset)
        .unwrap_or(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Data, Mark};

    fn runs(parts: &[(&str, &[Mark])]) -> Vec<Node> {
        parts
            .iter()
            .map(|(text, marks)| Node::Text(Text::with_marks(*text, marks.iter().cloned())))
            .collect()
    }

    #[test]
    fn test_split_at_inside_text() {
        let mut nodes = runs(&[("hello", &[Mark::Bold])]);
        split_at(&mut nodes, 2);
        assert_eq!(
            nodes,
            runs(&[("he", &[Mark::Bold]), ("llo", &[Mark::Bold])])
        );
        split_at(&mut nodes, 2);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_update_range_marks_only_the_range() {
        let mut nodes = runs(&[("hello world", &[])]);
        update_range(&mut nodes, 6..11, &mut |text: &mut Text| {
            text.marks.insert(Mark::Italic);
        });
        assert_eq!(nodes, runs(&[("hello ", &[]), ("world", &[Mark::Italic])]));
    }

    #[test]
    fn test_insert_text_extends_or_starts_run() {
        let mut nodes = runs(&[("ab", &[])]);
        insert_text(&mut nodes, 1, "X", None);
        assert_eq!(nodes, runs(&[("aXb", &[])]));

        let bold: Marks = [Mark::Bold].into_iter().collect();
        insert_text(&mut nodes, 3, "!", Some(&bold));
        assert_eq!(nodes, runs(&[("aXb", &[]), ("!", &[Mark::Bold])]));
    }

    #[test]
    fn test_insert_text_handles_multibyte() {
        let mut nodes = runs(&[("héllo", &[])]);
        insert_text(&mut nodes, 2, "-", None);
        assert_eq!(nodes, runs(&[("hé-llo", &[])]));
    }

    #[test]
    fn test_split_off_through_inline() {
        let mut nodes = vec![
            Node::Text(Text::new("go ")),
            Node::Inline(Inline {
                kind: "link".to_string(),
                data: Data::new(),
                nodes: runs(&[("here", &[])]),
            }),
        ];
        let tail = split_off(&mut nodes, 5);
        assert_eq!(text_len(&nodes), 5);
        assert_eq!(text_len(&tail), 2);
        assert!(matches!(&tail[0], Node::Inline(inline) if inline.kind == "link"));
    }

    #[test]
    fn test_normalize_runs_merges_and_drops_empty() {
        let mut nodes = runs(&[("a", &[]), ("", &[Mark::Code]), ("b", &[]), ("c", &[Mark::Bold])]);
        normalize_runs(&mut nodes);
        assert_eq!(nodes, runs(&[("ab", &[]), ("c", &[Mark::Bold])]));

        let mut empty = Vec::new();
        normalize_runs(&mut empty);
        assert_eq!(empty, runs(&[("", &[])]));
    }

    #[test]
    fn test_grapheme_boundaries() {
        // "e" + combining acute accent is one grapheme of two chars
        let text = "ae\u{301}b";
        assert_eq!(prev_boundary(text, 3), 1);
        assert_eq!(next_boundary(text, 1), 3);
        assert_eq!(prev_boundary(text, 0), 0);
    }
}
