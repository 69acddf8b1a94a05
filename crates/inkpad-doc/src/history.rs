//! Undo/redo history.
//!
//! ## Learning: Snapshots Instead of Inverse Operations
//!
//! Every committed change stores the value it replaced. Undo swaps the
//! current value for the stored one and keeps the current value on the redo
//! stack. Storing whole values costs memory but makes undo trivially correct
//! for structural edits (wrapping, unwrapping, merging) that would otherwise
//! each need a hand-written inverse.
//!
//! Rapid typing is coalesced: a typing edit within the threshold of the
//! previous typing edit replaces nothing on the stack, so the whole burst
//! undoes in one step.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::value::Value;

/// What kind of change produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Inserted text; coalesces with nearby typing
    Typing,
    /// Any other change
    Other,
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    kind: EditKind,
    timestamp: Option<Instant>,
}

/// Bounded undo and redo stacks of value snapshots.
///
/// ## Learning: VecDeque
///
/// The undo stack is a `VecDeque` so the oldest entry can be dropped from
/// the front once the limit is reached, while undo pops from the back.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Entry>,
    redo_stack: Vec<Value>,
    max_size: usize,
    coalesce_threshold: Duration,
}

impl History {
    /// Creates a new history keeping at most `max_size` undo steps.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(256)),
            redo_stack: Vec::new(),
            max_size,
            coalesce_threshold: Duration::from_millis(300),
        }
    }

    /// Records `previous` as the value before a change.
    ///
    /// Clears the redo stack. A typing change right after another typing
    /// change extends the existing step instead of adding one.
    pub fn push(&mut self, previous: Value, kind: EditKind) {
        self.redo_stack.clear();
        if self.max_size == 0 {
            return;
        }

        if let Some(last) = self.undo_stack.back_mut() {
            let recent = last
                .timestamp
                .is_some_and(|timestamp| timestamp.elapsed() < self.coalesce_threshold);
            if recent && kind == EditKind::Typing && last.kind == EditKind::Typing {
                last.timestamp = Some(Instant::now());
                return;
            }
        }

        self.undo_stack.push_back(Entry {
            value: previous,
            kind,
            timestamp: Some(Instant::now()),
        });
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// The value an undo would restore.
    pub fn peek_undo(&self) -> Option<&Value> {
        self.undo_stack.back().map(|entry| &entry.value)
    }

    /// Completes an undo: pops the undo entry and keeps `current` for redo.
    pub fn commit_undo(&mut self, current: Value) -> Option<Value> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(entry.value)
    }

    /// The value a redo would restore.
    pub fn peek_redo(&self) -> Option<&Value> {
        self.redo_stack.last()
    }

    /// Completes a redo: pops the redo entry and keeps `current` for undo.
    pub fn commit_redo(&mut self, current: Value) -> Option<Value> {
        let value = self.redo_stack.pop()?;
        // No timestamp, so the next edit never coalesces into a redone step
        self.undo_stack.push_back(Entry {
            value: current,
            kind: EditKind::Other,
            timestamp: None,
        });
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
        Some(value)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::value::Document;

    fn value(text: &str) -> Value {
        Value::new(Document::new(vec![Node::paragraph(text)]))
    }

    #[test]
    fn test_undo_redo_round() {
        let mut history = History::new(10);
        history.push(value("a"), EditKind::Other);
        assert!(history.can_undo());

        assert_eq!(history.peek_undo(), Some(&value("a")));
        let restored = history.commit_undo(value("ab")).unwrap();
        assert_eq!(restored, value("a"));
        assert!(history.can_redo());

        let redone = history.commit_redo(value("a")).unwrap();
        assert_eq!(redone, value("ab"));
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_typing_coalesces() {
        let mut history = History::new(10);
        history.push(value(""), EditKind::Typing);
        history.push(value("a"), EditKind::Typing);
        history.push(value("ab"), EditKind::Typing);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.peek_undo(), Some(&value("")));

        history.push(value("abc"), EditKind::Other);
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_typing_after_pause_is_a_new_step() {
        let mut history = History::new(10);
        history.push(value(""), EditKind::Typing);
        std::thread::sleep(Duration::from_millis(400));
        history.push(value("a"), EditKind::Typing);
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_push_clears_redo_and_respects_limit() {
        let mut history = History::new(2);
        for text in ["a", "b", "c"] {
            history.push(value(text), EditKind::Other);
        }
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.peek_undo(), Some(&value("c")));

        history.commit_undo(value("d"));
        assert!(history.can_redo());
        history.push(value("c"), EditKind::Other);
        assert!(!history.can_redo());
    }
}
