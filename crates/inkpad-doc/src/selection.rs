//! Selection points and ranges.
//!
//! ## Learning: Stable Addressing
//!
//! A point is `(leaf block ordinal, character offset)` rather than a path
//! into the tree. Splitting a text run, changing a block's type, or wrapping
//! blocks in a list all leave the sequence of leaf blocks and their text
//! untouched, so a selection survives those edits without remapping.

use serde::{Deserialize, Serialize};

/// A position inside the document.
///
/// `block` counts leaf blocks (blocks without block children, and images)
/// in document order. `offset` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Leaf block ordinal (0-indexed)
    pub block: usize,
    /// Character offset within the block's text
    pub offset: usize,
}

impl Point {
    /// Creates a new point.
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// The start of the first block.
    pub const ZERO: Point = Point {
        block: 0,
        offset: 0,
    };
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.block.cmp(&other.block) {
            std::cmp::Ordering::Equal => self.offset.cmp(&other.offset),
            other => other,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// A directed selection.
///
/// The anchor is where the selection started, the focus is where it ends
/// (and where the caret is drawn). The anchor may come after the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    /// Creates a selection from anchor to focus.
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// Creates a collapsed selection (a caret).
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    /// Returns true if anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Returns true if the focus comes before the anchor.
    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// Returns the earlier point.
    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    /// Returns the later point.
    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }

    /// Returns the ordinals of all leaf blocks the selection touches.
    pub fn blocks(&self) -> std::ops::RangeInclusive<usize> {
        self.start().block..=self.end().block
    }

    /// Collapses to the start point.
    pub fn collapse_to_start(&mut self) {
        *self = Self::collapsed(self.start());
    }

    /// Collapses to the end point.
    pub fn collapse_to_end(&mut self) {
        *self = Self::collapsed(self.end());
    }

    /// Moves the focus, keeping the anchor.
    pub fn extend_to(&mut self, point: Point) {
        self.focus = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ordering() {
        assert!(Point::new(0, 5) < Point::new(1, 0));
        assert!(Point::new(2, 1) < Point::new(2, 3));
        assert_eq!(Point::new(1, 1).max(Point::new(0, 9)), Point::new(1, 1));
    }

    #[test]
    fn test_backward_selection() {
        let sel = Selection::new(Point::new(2, 4), Point::new(0, 1));
        assert!(sel.is_backward());
        assert_eq!(sel.start(), Point::new(0, 1));
        assert_eq!(sel.end(), Point::new(2, 4));
        assert_eq!(sel.blocks(), 0..=2);
    }

    #[test]
    fn test_collapse() {
        let mut sel = Selection::new(Point::new(0, 1), Point::new(0, 4));
        assert!(!sel.is_collapsed());
        sel.collapse_to_end();
        assert!(sel.is_collapsed());
        assert_eq!(sel.focus, Point::new(0, 4));
    }
}
