//! Turns a surface's reported value into an edit against the previous one,
//! and key chords into history commands.

use crate::core::selection::Selection;
use crate::terminal::{KeyCode, KeyModifiers};
use similar::{Algorithm, DiffTag, capture_diff_slices};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Unchanged,
    Insert { at: usize, text: String },
    Delete { span: Selection },
    Replace { span: Selection, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCombo {
    Undo,
    Redo,
    /// No modifiers that matter to the mask.
    Passthrough,
    /// A shortcut the mask leaves to the surface.
    Ignore,
}

/// Classify the change from `old` to `new`. `caret` is the surface caret
/// after the change; offsets in the result refer to `old`.
pub fn classify_edit(old: &str, new: &str, caret: usize) -> EditOp {
    if old == new {
        return EditOp::Unchanged;
    }

    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    if new.len() < old.len() {
        let diff = old.len() - new.len();
        let candidates = [Some(caret), caret.checked_sub(diff)];
        for start in candidates.into_iter().flatten() {
            if start + diff <= old.len() && removes_to(&old, &new, start, diff) {
                return EditOp::Delete {
                    span: Selection::new(start, start + diff),
                };
            }
        }
    } else if new.len() > old.len() {
        let diff = new.len() - old.len();
        if let Some(at) = caret.checked_sub(diff)
            && caret <= new.len()
            && removes_to(&new, &old, at, diff)
        {
            return EditOp::Insert {
                at,
                text: new[at..caret].iter().collect(),
            };
        }
    }

    diff_span(&old, &new)
}

fn removes_to(longer: &[char], shorter: &[char], start: usize, len: usize) -> bool {
    longer[..start] == shorter[..start] && longer[start + len..] == shorter[start..]
}

/// Collapse every changed hunk into a single span of `old`.
fn diff_span(old: &[char], new: &[char]) -> EditOp {
    let ops = capture_diff_slices(Algorithm::Myers, old, new);
    let mut old_range: Option<(usize, usize)> = None;
    let mut new_range: Option<(usize, usize)> = None;

    for op in ops.iter().filter(|op| op.tag() != DiffTag::Equal) {
        let (o, n) = (op.old_range(), op.new_range());
        old_range = Some(match old_range {
            Some((start, end)) => (start.min(o.start), end.max(o.end)),
            None => (o.start, o.end),
        });
        new_range = Some(match new_range {
            Some((start, end)) => (start.min(n.start), end.max(n.end)),
            None => (n.start, n.end),
        });
    }

    let (Some((old_start, old_end)), Some((new_start, new_end))) = (old_range, new_range) else {
        return EditOp::Unchanged;
    };
    let span = Selection::new(old_start, old_end);
    let text: String = new[new_start..new_end].iter().collect();

    match (span.is_empty(), text.is_empty()) {
        (true, true) => EditOp::Unchanged,
        (true, false) => EditOp::Insert {
            at: old_start,
            text,
        },
        (false, true) => EditOp::Delete { span },
        (false, false) => EditOp::Replace { span, text },
    }
}

pub fn classify_key_combo(code: KeyCode, modifiers: KeyModifiers) -> KeyCombo {
    if modifiers.has_platform_modifier() {
        let shift = modifiers.contains(KeyModifiers::SHIFT);
        return match code {
            KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&'z') => {
                if shift { KeyCombo::Redo } else { KeyCombo::Undo }
            }
            KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&'y') => {
                if shift { KeyCombo::Undo } else { KeyCombo::Redo }
            }
            _ => KeyCombo::Ignore,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return KeyCombo::Ignore;
    }
    KeyCombo::Passthrough
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_are_unchanged() {
        assert_eq!(classify_edit("(555)", "(555)", 2), EditOp::Unchanged);
    }

    #[test]
    fn shorter_value_is_a_delete_starting_at_caret() {
        assert_eq!(
            classify_edit("(555) 123-4567", "(555) -4567", 6),
            EditOp::Delete {
                span: Selection::new(6, 9)
            }
        );
    }

    #[test]
    fn shorter_value_with_caret_after_gap_deletes_before_caret() {
        // Native backspace over "23" leaves the caret at 7.
        assert_eq!(
            classify_edit("(555) 123-4567", "(555) 1-4567", 7),
            EditOp::Delete {
                span: Selection::new(7, 9)
            }
        );
        assert_eq!(
            classify_edit("abcdef", "abef", 4),
            EditOp::Delete {
                span: Selection::new(2, 4)
            }
        );
    }

    #[test]
    fn longer_value_is_an_insert_ending_at_caret() {
        assert_eq!(
            classify_edit("(555) ___-____", "(555) 12___-____", 8),
            EditOp::Insert {
                at: 6,
                text: "12".to_string()
            }
        );
    }

    #[test]
    fn unaligned_change_falls_back_to_diff() {
        assert_eq!(
            classify_edit("(555) 123-4567", "(555) 9-4567", 7),
            EditOp::Replace {
                span: Selection::new(6, 9),
                text: "9".to_string()
            }
        );
        assert_eq!(
            classify_edit("abc", "abxc", 0),
            EditOp::Insert {
                at: 2,
                text: "x".to_string()
            }
        );
    }

    #[test]
    fn key_combos_map_to_history_commands() {
        let ctrl = KeyModifiers::CONTROL;
        let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert_eq!(classify_key_combo(KeyCode::Char('z'), ctrl), KeyCombo::Undo);
        assert_eq!(classify_key_combo(KeyCode::Char('Z'), ctrl_shift), KeyCombo::Redo);
        assert_eq!(classify_key_combo(KeyCode::Char('y'), ctrl), KeyCombo::Redo);
        assert_eq!(classify_key_combo(KeyCode::Char('Y'), ctrl_shift), KeyCombo::Undo);
        assert_eq!(
            classify_key_combo(KeyCode::Char('z'), KeyModifiers::META),
            KeyCombo::Undo
        );
        assert_eq!(classify_key_combo(KeyCode::Char('a'), ctrl), KeyCombo::Ignore);
        assert_eq!(
            classify_key_combo(KeyCode::Char('z'), KeyModifiers::ALT),
            KeyCombo::Ignore
        );
        assert_eq!(
            classify_key_combo(KeyCode::Char('5'), KeyModifiers::SHIFT),
            KeyCombo::Passthrough
        );
        assert_eq!(
            classify_key_combo(KeyCode::Backspace, KeyModifiers::NONE),
            KeyCombo::Passthrough
        );
    }
}
