//! Pure edit operations: current snapshot in, next snapshot out.
//! `None` means the edit was rejected and the snapshot stays as it was.

use super::model::{MaskState, Pattern};
use crate::core::selection::Selection;

pub(super) fn input(
    pattern: &Pattern,
    placeholder: char,
    state: &MaskState,
    ch: char,
) -> Option<MaskState> {
    let selection = state.selection;
    if selection.is_empty() && selection.start >= pattern.len() {
        return None;
    }

    let mut idx = selection.start.max(pattern.first_editable());
    let mut value = state.value.clone();

    if let Some(literal) = pattern.literal_at(idx) {
        if ch == literal && selection.is_empty() {
            return Some(MaskState::new(value, caret_after(pattern, idx)));
        }
        idx = pattern.next_editable(idx)?;
    }

    if !pattern.accepts(idx, ch) {
        return None;
    }
    value[idx] = pattern.transform(idx, ch);

    // The rest of a range selection is blanked out.
    for pos in (idx + 1)..selection.end.min(pattern.len()) {
        if pattern.is_editable(pos) {
            value[pos] = placeholder;
        }
    }

    Some(MaskState::new(value, caret_after(pattern, idx)))
}

pub(super) fn backspace(
    pattern: &Pattern,
    placeholder: char,
    state: &MaskState,
) -> Option<MaskState> {
    let selection = state.selection;
    if selection.start == 0 && selection.end == 0 {
        return None;
    }

    let mut value = state.value.clone();

    if !selection.is_empty() {
        for pos in selection.start..selection.end.min(pattern.len()) {
            if pattern.is_editable(pos) {
                value[pos] = placeholder;
            }
        }
        return Some(MaskState::new(
            value,
            Selection::collapsed(selection.start),
        ));
    }

    let mut caret = selection.start.min(pattern.len());
    while caret > 0 && !pattern.is_editable(caret - 1) {
        caret -= 1;
    }
    if caret == 0 {
        return None;
    }

    value[caret - 1] = placeholder;
    Some(MaskState::new(value, Selection::collapsed(caret - 1)))
}

/// Caret after writing at `idx`, skipping any literals that follow.
fn caret_after(pattern: &Pattern, idx: usize) -> Selection {
    let mut caret = idx + 1;
    while caret < pattern.len() && !pattern.is_editable(caret) {
        caret += 1;
    }
    Selection::collapsed(caret)
}

/// True when `ch` equals one of the literals directly before `caret`.
pub(super) fn matches_preceding_literal(pattern: &Pattern, caret: usize, ch: char) -> bool {
    let mut pos = caret;
    while pos > 0 {
        match pattern.literal_at(pos - 1) {
            Some(literal) if literal == ch => return true,
            Some(_) => pos -= 1,
            None => return false,
        }
    }
    false
}
