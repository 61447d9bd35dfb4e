use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A caret or highlighted range within the display value, in char offsets.
///
/// `start <= end` always holds; constructors order their arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub const fn collapsed(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// End is exclusive.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
