//! Edit operations on a `Value`.
//!
//! Every operation edits the document and moves the selection. None of them
//! normalize; callers run `Value::normalize` once the edit is complete.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::node::{Block, BlockKind, Mark, Marks, Node, Text};
use crate::runs;
use crate::selection::{Point, Selection};
use crate::value::{Path, Value};
use crate::{DocError, DocResult};

impl Value {
    // ==================== Queries ====================

    /// Paths of the leaf blocks the selection touches.
    pub fn selected_leaf_paths(&self) -> Vec<Path> {
        let range = self.selection.blocks();
        self.document
            .leaf_block_paths()
            .into_iter()
            .enumerate()
            .filter(|(ordinal, _)| range.contains(ordinal))
            .map(|(_, path)| path)
            .collect()
    }

    /// The leaf blocks the selection touches.
    pub fn selected_blocks(&self) -> Vec<&Node> {
        self.selected_leaf_paths()
            .iter()
            .filter_map(|path| self.document.node(path))
            .collect()
    }

    /// Returns true if any selected block has the given kind.
    pub fn has_block(&self, kind: &BlockKind) -> bool {
        self.selected_blocks()
            .iter()
            .any(|node| node.block_kind() == Some(kind))
    }

    /// Returns true if any selected block sits inside a block of `kind`.
    pub fn is_inside(&self, kind: &BlockKind) -> bool {
        self.selected_leaf_paths()
            .iter()
            .any(|path| self.document.closest_ancestor(path, kind).is_some())
    }

    /// Kind of the parent of the first selected block, if it has one.
    pub fn first_block_parent_kind(&self) -> Option<&BlockKind> {
        let first = self.selected_leaf_paths().into_iter().next()?;
        let parent = &first[..first.len().checked_sub(1)?];
        self.document.node(parent)?.block_kind()
    }

    /// Character range of each selected leaf block that the selection covers.
    fn block_ranges(&self) -> Vec<(usize, Range<usize>)> {
        let (start, end) = (self.selection.start(), self.selection.end());
        let paths = self.document.leaf_block_paths();
        (start.block..=end.block)
            .filter_map(|ordinal| {
                let node = self.document.node(paths.get(ordinal)?)?;
                let len = node.plain_text().chars().count();
                let from = if ordinal == start.block { start.offset } else { 0 };
                let to = if ordinal == end.block { end.offset } else { len };
                Some((ordinal, from..to))
            })
            .collect()
    }

    /// Marks that apply to the whole selection, or to the next typed text
    /// when the selection is collapsed.
    pub fn active_marks(&self) -> Marks {
        if let Some(pending) = &self.pending_marks {
            return pending.clone();
        }

        if self.selection.is_collapsed() {
            let focus = self.selection.focus;
            return match self.leaf(focus.block) {
                Ok(Node::Block(block)) => runs::text_at(&block.nodes, focus.offset)
                    .map(|text| text.marks.clone())
                    .unwrap_or_default(),
                _ => Marks::new(),
            };
        }

        let mut shared: Option<Marks> = None;
        for (ordinal, range) in self.block_ranges() {
            if let Ok(Node::Block(block)) = self.leaf(ordinal) {
                for text in runs::texts_in_range(&block.nodes, range) {
                    shared = Some(match shared {
                        None => text.marks.clone(),
                        Some(acc) => acc.intersection(&text.marks).cloned().collect(),
                    });
                }
            }
        }
        shared.unwrap_or_default()
    }

    /// Returns true if `mark` is active for the selection.
    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.active_marks().contains(mark)
    }

    // ==================== Selection ====================

    /// Replaces the selection. Clears pending marks.
    pub fn select(&mut self, selection: Selection) -> DocResult<()> {
        self.check_point(selection.anchor)?;
        self.check_point(selection.focus)?;
        self.selection = selection;
        self.pending_marks = None;
        Ok(())
    }

    /// Puts the caret at the end of a leaf block.
    pub fn select_block(&mut self, ordinal: usize) -> DocResult<()> {
        let len = self.leaf_len(ordinal)?;
        self.select(Selection::collapsed(Point::new(ordinal, len)))
    }

    /// Moves the caret one grapheme back, or collapses an expanded selection
    /// to its start.
    pub fn move_left(&mut self) -> DocResult<()> {
        if !self.selection.is_collapsed() {
            self.selection.collapse_to_start();
            self.pending_marks = None;
            return Ok(());
        }
        let focus = self.selection.focus;
        let target = if focus.offset > 0 {
            let text = self.leaf(focus.block)?.plain_text();
            Point::new(focus.block, runs::prev_boundary(&text, focus.offset))
        } else if focus.block > 0 {
            Point::new(focus.block - 1, self.leaf_len(focus.block - 1)?)
        } else {
            focus
        };
        self.select(Selection::collapsed(target))
    }

    /// Moves the caret one grapheme forward, or collapses an expanded
    /// selection to its end.
    pub fn move_right(&mut self) -> DocResult<()> {
        if !self.selection.is_collapsed() {
            self.selection.collapse_to_end();
            self.pending_marks = None;
            return Ok(());
        }
        let focus = self.selection.focus;
        let len = self.leaf_len(focus.block)?;
        let target = if focus.offset < len {
            let text = self.leaf(focus.block)?.plain_text();
            Point::new(focus.block, runs::next_boundary(&text, focus.offset))
        } else if focus.block + 1 < self.leaf_block_count() {
            Point::new(focus.block + 1, 0)
        } else {
            focus
        };
        self.select(Selection::collapsed(target))
    }

    // ==================== Text ====================

    fn leaf_node_mut(&mut self, ordinal: usize) -> DocResult<&mut Node> {
        let path = self.leaf_path(ordinal)?;
        self.document
            .node_mut(&path)
            .ok_or(DocError::BlockOutOfBounds(ordinal))
    }

    /// Inserts text at the caret, replacing any selected content.
    ///
    /// Typing with an image selected starts a new paragraph after it.
    pub fn insert_text(&mut self, text: &str) -> DocResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        if !self.selection.is_collapsed() {
            self.delete_selection()?;
        }

        let focus = self.selection.focus;
        let pending = self.pending_marks.take();
        if self.leaf(focus.block)?.is_void() {
            let paragraph = Block::new(
                BlockKind::Paragraph,
                vec![Node::Text(Text {
                    text: text.to_string(),
                    marks: pending.unwrap_or_default(),
                })],
            );
            return self.insert_block(Node::Block(paragraph));
        }
        if let Node::Block(block) = self.leaf_node_mut(focus.block)? {
            runs::insert_text(&mut block.nodes, focus.offset, text, pending.as_ref());
        }

        let offset = focus.offset + text.chars().count();
        self.selection = Selection::collapsed(Point::new(focus.block, offset));
        Ok(())
    }

    /// Deletes the selection, or the grapheme before the caret.
    pub fn delete_backward(&mut self) -> DocResult<()> {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }

        let focus = self.selection.focus;
        let path = self.leaf_path(focus.block)?;
        if matches!(self.document.node(&path), Some(Node::Image(_))) {
            self.remove_node(&path)?;
            let target = match focus.block.checked_sub(1) {
                Some(prev) => Point::new(prev, self.leaf_len(prev)?),
                None => Point::ZERO,
            };
            self.selection = Selection::collapsed(target);
            self.pending_marks = None;
            return Ok(());
        }

        if focus.offset > 0 {
            let text = self.leaf(focus.block)?.plain_text();
            let start = runs::prev_boundary(&text, focus.offset);
            if let Node::Block(block) = self.leaf_node_mut(focus.block)? {
                runs::remove_range(&mut block.nodes, start..focus.offset);
            }
            self.selection = Selection::collapsed(Point::new(focus.block, start));
            self.pending_marks = None;
        } else if focus.block > 0 {
            self.merge_into_previous(focus.block)?;
        }
        Ok(())
    }

    /// Removes the selected content and collapses the selection to its start.
    pub fn delete_selection(&mut self) -> DocResult<()> {
        if self.selection.is_collapsed() {
            return Ok(());
        }
        let (start, end) = (self.selection.start(), self.selection.end());
        self.pending_marks = None;

        if start.block == end.block {
            if let Node::Block(block) = self.leaf_node_mut(start.block)? {
                runs::remove_range(&mut block.nodes, start.offset..end.offset);
            }
            self.selection = Selection::collapsed(start);
            return Ok(());
        }

        let start_len = self.leaf_len(start.block)?;
        if let Node::Block(block) = self.leaf_node_mut(start.block)? {
            runs::remove_range(&mut block.nodes, start.offset..start_len);
        }
        if let Node::Block(block) = self.leaf_node_mut(end.block)? {
            runs::remove_range(&mut block.nodes, 0..end.offset);
        }

        // Later paths first, so earlier ones stay valid.
        let paths = self.document.leaf_block_paths();
        for path in paths[start.block + 1..end.block].iter().rev() {
            self.remove_node(path)?;
        }

        self.selection = Selection::collapsed(start);
        self.merge_into_previous(start.block + 1)
    }

    /// Joins leaf block `ordinal` onto the one before it. An image on either
    /// side is removed instead of merged.
    fn merge_into_previous(&mut self, ordinal: usize) -> DocResult<()> {
        let prev = ordinal
            .checked_sub(1)
            .ok_or(DocError::BlockOutOfBounds(ordinal))?;
        let prev_path = self.leaf_path(prev)?;
        let path = self.leaf_path(ordinal)?;
        let prev_len = self.leaf_len(prev)?;

        let prev_is_image = matches!(self.document.node(&prev_path), Some(Node::Image(_)));
        let is_image = matches!(self.document.node(&path), Some(Node::Image(_)));

        let target = if prev_is_image {
            self.remove_node(&prev_path)?;
            Point::new(prev, 0)
        } else if is_image {
            self.remove_node(&path)?;
            Point::new(prev, prev_len)
        } else {
            let removed = self.remove_node(&path)?;
            if let (Node::Block(removed), Some(Node::Block(target))) =
                (removed, self.document.node_mut(&prev_path))
            {
                target.nodes.extend(removed.nodes);
            }
            Point::new(prev, prev_len)
        };

        self.selection = Selection::collapsed(target);
        self.pending_marks = None;
        Ok(())
    }

    /// Removes the node at `path`, then any ancestors left without children.
    fn remove_node(&mut self, path: &[usize]) -> DocResult<Node> {
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| DocError::InvalidPath(path.to_vec()))?;
        let siblings = self
            .document
            .children_mut(parent)
            .filter(|siblings| index < siblings.len())
            .ok_or_else(|| DocError::InvalidPath(path.to_vec()))?;
        let removed = siblings.remove(index);
        if siblings.is_empty() && !parent.is_empty() {
            self.remove_node(parent)?;
        }
        Ok(removed)
    }

    // ==================== Marks ====================

    /// Toggles a mark.
    ///
    /// With a collapsed selection this only changes the pending marks. With
    /// an expanded selection the mark is removed if every selected character
    /// has it, and added everywhere otherwise.
    pub fn toggle_mark(&mut self, mark: Mark) -> DocResult<()> {
        if self.selection.is_collapsed() {
            let mut marks = self.active_marks();
            if !marks.remove(&mark) {
                marks.insert(mark);
            }
            self.pending_marks = Some(marks);
            return Ok(());
        }

        let remove = self.has_mark(&mark);
        for (ordinal, range) in self.block_ranges() {
            if let Node::Block(block) = self.leaf_node_mut(ordinal)? {
                runs::update_range(&mut block.nodes, range, &mut |text: &mut Text| {
                    if remove {
                        text.marks.remove(&mark);
                    } else {
                        text.marks.insert(mark.clone());
                    }
                });
            }
        }
        Ok(())
    }

    // ==================== Blocks ====================

    /// Splits the block at the caret. The second half keeps the block kind.
    pub fn split_block(&mut self) -> DocResult<()> {
        if !self.selection.is_collapsed() {
            self.delete_selection()?;
        }
        let focus = self.selection.focus;
        let path = self.leaf_path(focus.block)?;
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| DocError::InvalidPath(path.clone()))?;

        let second = match self.document.node_mut(&path) {
            Some(Node::Block(block)) => Node::Block(Block {
                kind: block.kind.clone(),
                data: block.data.clone(),
                nodes: runs::split_off(&mut block.nodes, focus.offset),
            }),
            Some(_) => Node::paragraph(""),
            None => return Err(DocError::BlockOutOfBounds(focus.block)),
        };

        self.document
            .children_mut(parent)
            .ok_or_else(|| DocError::InvalidPath(parent.to_vec()))?
            .insert(index + 1, second);
        self.selection = Selection::collapsed(Point::new(focus.block + 1, 0));
        self.pending_marks = None;
        Ok(())
    }

    /// Inserts a block next to the block at the caret and moves the caret to
    /// the end of the inserted block.
    ///
    /// After an image, an empty block, or a caret at the end of its block the
    /// new block goes after it; with the caret at the start it goes before;
    /// otherwise the block is split and the new block goes in between.
    pub fn insert_block(&mut self, node: Node) -> DocResult<()> {
        if !self.selection.is_collapsed() {
            self.delete_selection()?;
        }
        let point = self.selection.start();
        let path = self.leaf_path(point.block)?;
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| DocError::InvalidPath(path.clone()))?;

        let (is_void, len) = match self.document.node(&path) {
            Some(node) => (node.is_void(), node.plain_text().chars().count()),
            None => return Err(DocError::BlockOutOfBounds(point.block)),
        };
        let at = if is_void || len == 0 || point.offset == len {
            index + 1
        } else if point.offset == 0 {
            index
        } else {
            self.split_block()?;
            index + 1
        };

        self.document
            .children_mut(parent)
            .ok_or_else(|| DocError::InvalidPath(parent.to_vec()))?
            .insert(at, node);

        let mut inserted = parent.to_vec();
        inserted.push(at);
        let ordinal = self
            .document
            .leaf_block_paths()
            .iter()
            .position(|leaf| leaf.starts_with(&inserted))
            .ok_or(DocError::InvalidPath(inserted))?;
        let end = self.leaf_len(ordinal)?;
        self.selection = Selection::collapsed(Point::new(ordinal, end));
        self.pending_marks = None;
        Ok(())
    }

    /// Inserts an image, optionally at a target selection first.
    pub fn insert_image(&mut self, src: impl Into<String>, target: Option<Selection>) -> DocResult<()> {
        if let Some(target) = target {
            self.select(target)?;
        }
        self.insert_block(Node::image(src))
    }

    /// Sets the kind of every selected leaf block. Images are left alone.
    pub fn set_blocks(&mut self, kind: BlockKind) -> DocResult<()> {
        for path in self.selected_leaf_paths() {
            if let Some(Node::Block(block)) = self.document.node_mut(&path) {
                block.kind = kind.clone();
            }
        }
        Ok(())
    }

    /// Wraps the selected blocks in a new block of `kind`.
    ///
    /// The wrapper goes into the deepest block containing every selected
    /// block and takes the children of it that hold the selection.
    pub fn wrap_block(&mut self, kind: BlockKind) -> DocResult<()> {
        let paths = self.selected_leaf_paths();
        let (Some(first), Some(last)) = (paths.first(), paths.last()) else {
            return Ok(());
        };

        let mut common: Path = first[..first.len() - 1].to_vec();
        for path in &paths {
            let parent = &path[..path.len() - 1];
            let shared = common
                .iter()
                .zip(parent)
                .take_while(|(a, b)| a == b)
                .count();
            common.truncate(shared);
        }

        let depth = common.len();
        let (from, to) = (first[depth], last[depth]);
        let children = self
            .document
            .children_mut(&common)
            .ok_or_else(|| DocError::InvalidPath(common.clone()))?;
        let wrapped: Vec<Node> = children.drain(from..=to).collect();
        children.insert(from, Node::Block(Block::new(kind, wrapped)));
        Ok(())
    }

    /// Lifts the selected blocks out of their closest ancestor of `kind`.
    ///
    /// Unselected siblings stay wrapped: the ancestor is split into the part
    /// before and the part after the selection.
    pub fn unwrap_block(&mut self, kind: BlockKind) -> DocResult<()> {
        let mut groups: BTreeMap<Path, (usize, usize)> = BTreeMap::new();
        for path in self.selected_leaf_paths() {
            if let Some(ancestor) = self.document.closest_ancestor(&path, &kind) {
                let child = path[ancestor.len()];
                groups
                    .entry(ancestor)
                    .and_modify(|(lo, hi)| {
                        *lo = (*lo).min(child);
                        *hi = (*hi).max(child);
                    })
                    .or_insert((child, child));
            }
        }

        let ancestors: Vec<Path> = groups.keys().cloned().collect();
        // Reverse document order keeps the remaining paths valid.
        for (ancestor, (lo, hi)) in groups.into_iter().rev() {
            let nested = ancestors
                .iter()
                .any(|other| other.len() > ancestor.len() && other.starts_with(&ancestor));
            if !nested {
                self.lift_children(&ancestor, lo, hi)?;
            }
        }
        Ok(())
    }

    fn lift_children(&mut self, path: &[usize], lo: usize, hi: usize) -> DocResult<()> {
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| DocError::InvalidPath(path.to_vec()))?;
        let siblings = self
            .document
            .children_mut(parent)
            .filter(|siblings| index < siblings.len())
            .ok_or_else(|| DocError::InvalidPath(path.to_vec()))?;

        let wrapper = match siblings.remove(index) {
            Node::Block(block) => block,
            other => {
                siblings.insert(index, other);
                return Err(DocError::InvalidPath(path.to_vec()));
            }
        };

        let Block {
            kind,
            data,
            nodes: mut before,
        } = wrapper;
        let after = before.split_off(hi + 1);
        let lifted = before.split_off(lo);

        let mut replacement = Vec::with_capacity(lifted.len() + 2);
        if !before.is_empty() {
            replacement.push(Node::Block(Block {
                kind: kind.clone(),
                data: data.clone(),
                nodes: before,
            }));
        }
        replacement.extend(lifted);
        if !after.is_empty() {
            replacement.push(Node::Block(Block {
                kind,
                data,
                nodes: after,
            }));
        }
        siblings.splice(index..index, replacement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Document;

    fn paragraphs(texts: &[&str]) -> Value {
        let mut value = Value::new(Document::new(
            texts.iter().map(|text| Node::paragraph(*text)).collect(),
        ));
        value.normalize();
        value
    }

    fn select(value: &mut Value, anchor: (usize, usize), focus: (usize, usize)) {
        value
            .select(Selection::new(
                Point::new(anchor.0, anchor.1),
                Point::new(focus.0, focus.1),
            ))
            .unwrap();
    }

    fn texts(value: &Value) -> Vec<String> {
        value
            .document()
            .leaf_block_paths()
            .iter()
            .map(|path| value.document().node(path).unwrap().plain_text())
            .collect()
    }

    #[test]
    fn test_insert_text_moves_caret() {
        let mut value = paragraphs(&["hello"]);
        select(&mut value, (0, 5), (0, 5));
        value.insert_text(" world").unwrap();
        assert_eq!(texts(&value)[0], "hello world");
        assert_eq!(value.selection().focus, Point::new(0, 11));
    }

    #[test]
    fn test_toggle_mark_on_range_and_back() {
        let mut value = paragraphs(&["hello world"]);
        let before = value.document().clone();
        select(&mut value, (0, 0), (0, 5));

        value.toggle_mark(Mark::Bold).unwrap();
        value.normalize();
        assert!(value.has_mark(&Mark::Bold));

        value.toggle_mark(Mark::Bold).unwrap();
        value.normalize();
        assert!(!value.has_mark(&Mark::Bold));
        assert_eq!(value.document(), &before);
    }

    #[test]
    fn test_toggle_mark_collapsed_sets_pending() {
        let mut value = paragraphs(&["ab"]);
        select(&mut value, (0, 2), (0, 2));
        value.toggle_mark(Mark::Italic).unwrap();
        assert!(value.has_mark(&Mark::Italic));

        value.insert_text("c").unwrap();
        value.normalize();
        assert!(value.pending_marks().is_none());
        select(&mut value, (0, 2), (0, 3));
        assert!(value.has_mark(&Mark::Italic));
        select(&mut value, (0, 0), (0, 3));
        assert!(!value.has_mark(&Mark::Italic));
    }

    #[test]
    fn test_delete_backward_merges_blocks() {
        let mut value = paragraphs(&["one", "two"]);
        select(&mut value, (1, 0), (1, 0));
        value.delete_backward().unwrap();
        value.normalize();
        assert_eq!(texts(&value), vec!["onetwo".to_string()]);
        assert_eq!(value.selection().focus, Point::new(0, 3));
    }

    #[test]
    fn test_delete_selection_across_blocks() {
        let mut value = paragraphs(&["alpha", "beta", "gamma"]);
        select(&mut value, (0, 2), (2, 3));
        value.delete_selection().unwrap();
        value.normalize();
        assert_eq!(texts(&value), vec!["alma".to_string()]);
        assert_eq!(value.selection(), Selection::collapsed(Point::new(0, 2)));
    }

    #[test]
    fn test_split_block_keeps_kind() {
        let mut value = paragraphs(&["headline"]);
        value.set_blocks(BlockKind::HeadingOne).unwrap();
        select(&mut value, (0, 4), (0, 4));
        value.split_block().unwrap();
        value.normalize();
        assert_eq!(texts(&value)[..2], ["head".to_string(), "line".to_string()]);
        assert_eq!(value.leaf(1).unwrap().block_kind(), Some(&BlockKind::HeadingOne));
        assert_eq!(value.selection().focus, Point::new(1, 0));
    }

    #[test]
    fn test_insert_image_placement() {
        let mut value = paragraphs(&["before after"]);
        select(&mut value, (0, 7), (0, 7));
        value.insert_image("cat.png", None).unwrap();
        value.normalize();
        assert_eq!(value.top_level_node_count(), 3);
        assert!(matches!(value.leaf(1).unwrap(), Node::Image(image) if image.src == "cat.png"));
        assert_eq!(value.selection().focus, Point::new(1, 0));

        let mut value = paragraphs(&["text"]);
        select(&mut value, (0, 0), (0, 0));
        value.insert_image("first.png", None).unwrap();
        assert!(value.leaf(0).unwrap().is_void());
    }

    #[test]
    fn test_insert_image_at_target() {
        let mut value = paragraphs(&["one", "two"]);
        value
            .insert_image("dog.gif", Some(Selection::collapsed(Point::new(0, 3))))
            .unwrap();
        value.normalize();
        assert!(value.leaf(1).unwrap().is_void());
        assert_eq!(texts(&value)[2], "two");
    }

    #[test]
    fn test_wrap_and_unwrap_list() {
        let mut value = paragraphs(&["a", "b", "c"]);
        let before = value.document().clone();
        select(&mut value, (0, 0), (1, 1));

        value.set_blocks(BlockKind::ListItem).unwrap();
        value.wrap_block(BlockKind::BulletedList).unwrap();
        value.normalize();
        assert_eq!(value.top_level_node_count(), 2);
        assert!(value.is_inside(&BlockKind::BulletedList));
        assert_eq!(value.first_block_parent_kind(), Some(&BlockKind::BulletedList));

        value.set_blocks(BlockKind::Paragraph).unwrap();
        value.unwrap_block(BlockKind::BulletedList).unwrap();
        value.normalize();
        assert_eq!(value.document(), &before);
    }

    #[test]
    fn test_unwrap_splits_partial_selection() {
        let mut value = paragraphs(&["a", "b", "c"]);
        select(&mut value, (0, 0), (2, 1));
        value.set_blocks(BlockKind::ListItem).unwrap();
        value.wrap_block(BlockKind::NumberedList).unwrap();
        value.normalize();

        select(&mut value, (1, 0), (1, 0));
        value.unwrap_block(BlockKind::NumberedList).unwrap();
        value.normalize();
        // list[a], b, list[c], trailing paragraph
        assert_eq!(value.top_level_node_count(), 4);
        assert_eq!(
            value.document().nodes[0].block_kind(),
            Some(&BlockKind::NumberedList)
        );
        assert_eq!(value.document().nodes[1].block_kind(), Some(&BlockKind::ListItem));
        assert_eq!(texts(&value)[..3], ["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_backspace_removes_image() {
        let mut value = paragraphs(&["text"]);
        select(&mut value, (0, 4), (0, 4));
        value.insert_image("x.png", None).unwrap();
        value.normalize();
        assert_eq!(value.top_level_node_count(), 3);

        value.delete_backward().unwrap();
        value.normalize();
        assert_eq!(value.top_level_node_count(), 2);
        assert_eq!(value.selection().focus, Point::new(0, 4));
    }

    #[test]
    fn test_move_left_right() {
        let mut value = paragraphs(&["ab", "c"]);
        select(&mut value, (1, 0), (1, 0));
        value.move_left().unwrap();
        assert_eq!(value.selection().focus, Point::new(0, 2));
        value.move_right().unwrap();
        assert_eq!(value.selection().focus, Point::new(1, 0));
    }

    #[test]
    fn test_select_rejects_out_of_bounds() {
        let mut value = paragraphs(&["ab"]);
        let result = value.select(Selection::collapsed(Point::new(0, 3)));
        assert!(matches!(result, Err(DocError::OffsetOutOfBounds { .. })));
    }
}
