//! Undo/redo over immutable [`MaskState`] snapshots.

use super::model::MaskState;
use crate::core::selection::Selection;

pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Input,
    Backspace,
    /// Always an entry of its own.
    Paste,
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    state: MaskState,
    last_op: Option<EditKind>,
    /// Pushed only so redo can return to where undoing started.
    start_undo: bool,
}

/// Snapshot history. Consecutive edits of the same kind at a contiguous
/// collapsed caret share one entry, so undo reverts a typed run at once.
/// The first edit after an undo always opens a new entry.
#[derive(Debug, Clone)]
pub struct MaskHistory {
    entries: Vec<HistoryEntry>,
    index: Option<usize>,
    last_op: Option<EditKind>,
    last_selection: Option<Selection>,
    max_size: usize,
}

impl Default for MaskHistory {
    fn default() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }
}

impl MaskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            last_op: None,
            last_selection: None,
            max_size: max_size.max(1),
        }
    }

    pub fn reset(&mut self, selection: Selection) {
        self.entries.clear();
        self.index = None;
        self.last_op = None;
        self.last_selection = Some(selection);
    }

    /// Record a successful edit that moved the engine from `before` to `after`.
    pub fn record(&mut self, kind: EditKind, before: &MaskState, after: &MaskState) {
        // Editing after undo discards the redo branch.
        let branched = match self.index.take() {
            Some(index) => {
                self.entries.truncate(index);
                true
            }
            None => false,
        };

        let selection_before = before.selection;
        let continues_run = !branched
            && kind != EditKind::Paste
            && self.last_op == Some(kind)
            && selection_before.is_empty()
            && self
                .last_selection
                .is_none_or(|last| last.start == selection_before.start);

        if !continues_run {
            self.entries.push(HistoryEntry {
                state: before.clone(),
                last_op: self.last_op,
                start_undo: false,
            });
            if self.entries.len() > self.max_size {
                let overflow = self.entries.len() - self.max_size;
                self.entries.drain(..overflow);
            }
        }

        self.last_op = Some(kind);
        self.last_selection = Some(after.selection);
    }

    pub fn undo(&mut self, current: &MaskState) -> Option<MaskState> {
        if self.entries.is_empty() || self.index == Some(0) {
            return None;
        }

        let entry = match self.index {
            None => {
                let index = self.entries.len() - 1;
                self.index = Some(index);
                let entry = self.entries[index].clone();
                if entry.state != *current {
                    self.entries.push(HistoryEntry {
                        state: current.clone(),
                        last_op: self.last_op,
                        start_undo: true,
                    });
                }
                entry
            }
            Some(index) => {
                let index = index - 1;
                self.index = Some(index);
                self.entries[index].clone()
            }
        };

        self.last_op = entry.last_op;
        Some(entry.state)
    }

    pub fn redo(&mut self) -> Option<MaskState> {
        let index = self.index?;
        let next = index + 1;
        let entry = self.entries.get(next)?.clone();

        self.index = Some(next);
        if next == self.entries.len() - 1 {
            self.index = None;
            if entry.start_undo {
                self.entries.pop();
            }
        }

        self.last_op = entry.last_op;
        Some(entry.state)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index != Some(0)
    }

    pub fn can_redo(&self) -> bool {
        self.index
            .is_some_and(|index| index + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
