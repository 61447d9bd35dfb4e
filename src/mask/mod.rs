//! Mask engine: pattern compilation, slot validation and edit operations over
//! immutable state snapshots.

mod format;
mod history;
mod model;
mod ops;
mod parser;

use crate::config::{PastePolicy, PatternChangePolicy};
use crate::core::error::{ConfigurationError, Result};
use crate::core::selection::Selection;
use log::{debug, info, warn};

pub use history::{DEFAULT_HISTORY_LIMIT, EditKind, MaskHistory};
pub use model::{
    CharClass, FormatCharacter, FormatCharacters, MaskState, MaskToken, Pattern, Transform,
};
pub use parser::ESCAPE_CHAR;

pub const DEFAULT_PLACEHOLDER: char = '_';

pub struct MaskEngine {
    formats: FormatCharacters,
    placeholder: char,
    pattern: Pattern,
    state: MaskState,
    empty_value: String,
    history: MaskHistory,
    paste_policy: PastePolicy,
}

impl MaskEngine {
    pub fn new(
        pattern: Pattern,
        formats: FormatCharacters,
        placeholder: char,
        value: &str,
    ) -> Result<Self> {
        if placeholder.is_control() {
            return Err(ConfigurationError::InvalidPlaceholder { placeholder });
        }
        let chars: Vec<char> = value.chars().collect();
        let state = MaskState::new(
            format::format_value(&pattern, placeholder, &chars),
            Selection::default(),
        );
        let empty_value = format::empty_value(&pattern, placeholder);
        let mut history = MaskHistory::new();
        history.reset(state.selection);

        Ok(Self {
            formats,
            placeholder,
            pattern,
            state,
            empty_value,
            history,
            paste_policy: PastePolicy::default(),
        })
    }

    /// Compile `source` with the default format characters.
    pub fn from_source(source: &str, value: &str) -> Result<Self> {
        let formats = FormatCharacters::defaults();
        let pattern = Pattern::compile(source, &formats)?;
        Self::new(pattern, formats, DEFAULT_PLACEHOLDER, value)
    }

    pub fn with_paste_policy(mut self, policy: PastePolicy) -> Self {
        self.paste_policy = policy;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = MaskHistory::with_max_size(limit);
        self.history.reset(self.state.selection);
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn formats(&self) -> &FormatCharacters {
        &self.formats
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    pub fn state(&self) -> &MaskState {
        &self.state
    }

    pub fn history(&self) -> &MaskHistory {
        &self.history
    }

    /// Display string: data, literals and placeholders.
    pub fn value(&self) -> String {
        self.state.display()
    }

    pub fn raw_value(&self) -> String {
        format::raw_value(&self.pattern, &self.state.value)
    }

    pub fn empty_value(&self) -> &str {
        self.empty_value.as_str()
    }

    pub fn is_complete(&self) -> bool {
        format::is_complete(&self.pattern, self.placeholder, &self.state.value)
    }

    pub fn is_empty(&self) -> bool {
        !format::has_any_input(&self.pattern, self.placeholder, &self.state.value)
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection.clamp(self.pattern.len());
    }

    /// Snap a collapsed caret onto the editable region: before the first slot
    /// goes to the first slot, otherwise back to just after the last filled
    /// slot. Returns false for range selections, which are kept as given.
    pub fn snap_selection(&mut self, selection: Selection) -> bool {
        let selection = selection.clamp(self.pattern.len());
        self.state.selection = selection;
        if !selection.is_empty() {
            return false;
        }

        let first = self.pattern.first_editable();
        let mut idx = selection.start.max(first);
        while idx > first {
            let filled = self.pattern.is_editable(idx - 1)
                && self.state.value[idx - 1] != self.placeholder;
            if filled {
                break;
            }
            idx -= 1;
        }
        self.state.selection = Selection::collapsed(idx);
        true
    }

    /// Reformat a programmatic value in place; history is kept.
    pub fn set_value(&mut self, value: &str) {
        let chars: Vec<char> = value.chars().collect();
        self.state.value = format::format_value(&self.pattern, self.placeholder, &chars);
    }

    /// Replace the pattern, formatting `value` against it. Selection and
    /// history start over; on a compile error the old pattern stays.
    pub fn set_pattern(&mut self, source: &str, value: &str) -> Result<()> {
        let pattern = Pattern::compile(source, &self.formats)?;
        let chars: Vec<char> = value.chars().collect();
        let value = format::format_value(&pattern, self.placeholder, &chars);
        self.install_pattern(pattern, value);
        Ok(())
    }

    /// Replace the pattern keeping the current raw value. Raw chars go into
    /// the new slots in order; nothing is lost while the new pattern has
    /// enough slots.
    pub fn set_pattern_preserving(
        &mut self,
        source: &str,
        policy: PatternChangePolicy,
    ) -> Result<()> {
        let pattern = Pattern::compile(source, &self.formats)?;
        let raw = self.raw_value();
        let required = format::significant_len(&raw, self.placeholder);

        if required > pattern.slot_count() {
            match policy {
                PatternChangePolicy::Reject => {
                    return Err(ConfigurationError::PatternTooNarrow {
                        slots: pattern.slot_count(),
                        required,
                    });
                }
                PatternChangePolicy::Truncate => {
                    warn!(
                        "pattern {:?} drops {} data characters",
                        source,
                        required - pattern.slot_count()
                    );
                }
            }
        }

        let raw: Vec<char> = raw.chars().collect();
        let value = format::fill_slots(&pattern, self.placeholder, &raw);
        self.install_pattern(pattern, value);
        Ok(())
    }

    fn install_pattern(&mut self, pattern: Pattern, value: Vec<char>) {
        self.state = MaskState::new(value, Selection::default());
        self.empty_value = format::empty_value(&pattern, self.placeholder);
        self.pattern = pattern;
        self.history.reset(self.state.selection);
        info!("mask pattern set to {:?}", self.pattern.source());
    }

    pub fn input(&mut self, ch: char) -> bool {
        let Some(next) = ops::input(&self.pattern, self.placeholder, &self.state, ch) else {
            debug!("input {:?} rejected at {:?}", ch, self.state.selection);
            return false;
        };
        self.commit(EditKind::Input, next);
        true
    }

    pub fn backspace(&mut self) -> bool {
        let Some(next) = ops::backspace(&self.pattern, self.placeholder, &self.state) else {
            return false;
        };
        self.commit(EditKind::Backspace, next);
        true
    }

    /// Type `text` char by char on a scratch snapshot and record the result
    /// as one history entry. Pattern literals in `text` are stepped over;
    /// other rejected chars follow the paste policy. A paste that changes
    /// nothing, or is rejected, leaves the engine untouched.
    pub fn paste(&mut self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        let mut next = self.state.clone();
        let mut consumed = 0usize;

        let first = self.pattern.first_editable();
        if next.selection.start < first {
            for idx in next.selection.start..first {
                let literal = self.pattern.literal_at(idx);
                if chars.get(consumed).copied() == literal {
                    consumed += 1;
                } else if self.paste_policy == PastePolicy::RejectAll {
                    debug!("paste rejected: leading literals do not match");
                    return false;
                }
            }
            let end = next.selection.end.max(first);
            next.selection = Selection::new(first, end);
        }

        for ch in chars[consumed..].iter().copied() {
            if next.selection.start > self.pattern.last_editable() {
                break;
            }
            if let Some(typed) = ops::input(&self.pattern, self.placeholder, &next, ch) {
                next = typed;
                continue;
            }
            if ops::matches_preceding_literal(&self.pattern, next.selection.start, ch) {
                continue;
            }
            if self.paste_policy == PastePolicy::RejectAll {
                debug!("paste rejected at {:?}", ch);
                return false;
            }
        }

        if next.value == self.state.value {
            return false;
        }
        self.commit(EditKind::Paste, next);
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.state) {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, kind: EditKind, next: MaskState) {
        self.history.record(kind, &self.state, &next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(value: &str) -> MaskEngine {
        MaskEngine::from_source("(111) 111-1111", value).expect("engine")
    }

    fn type_all(engine: &mut MaskEngine, text: &str) {
        for ch in text.chars() {
            assert!(engine.input(ch), "input {ch:?} rejected");
        }
    }

    #[test]
    fn typing_ten_digits_fills_the_phone_mask() {
        let mut engine = phone("");
        type_all(&mut engine, "5551234567");
        assert_eq!(engine.value(), "(555) 123-4567");
        assert_eq!(engine.raw_value(), "5551234567");
        assert!(engine.is_complete());
        assert!(!engine.input('8'));
    }

    #[test]
    fn empty_value_and_placeholder() {
        let engine = MaskEngine::new(
            Pattern::compile("11/11", &FormatCharacters::defaults()).expect("pattern"),
            FormatCharacters::defaults(),
            ' ',
            "",
        )
        .expect("engine");
        assert_eq!(engine.empty_value(), "  /  ");
        assert!(engine.is_empty());
    }

    #[test]
    fn control_placeholder_is_rejected() {
        let formats = FormatCharacters::defaults();
        let pattern = Pattern::compile("11", &formats).expect("pattern");
        let err = MaskEngine::new(pattern, formats, '\n', "").err();
        assert!(matches!(
            err,
            Some(ConfigurationError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    fn undo_and_redo_single_insert() {
        let mut engine = phone("");
        engine.set_selection(Selection::collapsed(1));
        assert!(engine.input('5'));

        assert!(engine.undo());
        assert_eq!(engine.raw_value(), "__________");
        assert_eq!(engine.selection(), Selection::collapsed(1));

        assert!(engine.redo());
        assert_eq!(engine.value(), "(5__) ___-____");
        assert_eq!(engine.selection(), Selection::collapsed(2));
        assert!(!engine.redo());
    }

    #[test]
    fn undo_with_empty_history_is_a_no_op() {
        let mut engine = phone("555");
        assert!(!engine.undo());
        assert!(!engine.redo());
    }

    #[test]
    fn paste_drops_invalid_chars_by_default() {
        let mut engine = phone("");
        assert!(engine.paste("(abc) 123-"));
        assert_eq!(engine.value(), "(123) ___-____");
        assert_eq!(engine.selection(), Selection::collapsed(6));
    }

    #[test]
    fn paste_reject_all_rolls_back() {
        let mut engine = phone("").with_paste_policy(PastePolicy::RejectAll);
        assert!(!engine.paste("(abc) 123-"));
        assert_eq!(engine.value(), "(___) ___-____");
        assert!(engine.history().is_empty());

        assert!(engine.paste("(555) 123-4567"));
        assert_eq!(engine.value(), "(555) 123-4567");
    }

    #[test]
    fn paste_mid_field_skips_pattern_literals() {
        let mut engine = phone("555");
        engine.set_selection(Selection::collapsed(6));
        assert!(engine.paste("(123"));
        assert_eq!(engine.value(), "(555) 123-____");
    }

    #[test]
    fn paste_without_accepted_chars_is_rejected() {
        let mut engine = phone("");
        assert!(!engine.paste("xyz"));
        assert_eq!(engine.selection(), Selection::collapsed(0));
    }

    #[test]
    fn paste_is_one_undo_step() {
        let mut engine = phone("");
        assert!(engine.paste("(555) 123-4567"));
        assert!(engine.undo());
        assert_eq!(engine.value(), "(___) ___-____");
    }

    #[test]
    fn paste_after_typing_undoes_separately() {
        let mut engine = phone("");
        engine.set_selection(Selection::collapsed(1));
        assert!(engine.input('5'));
        assert!(engine.paste("123"));
        assert_eq!(engine.value(), "(512) 3__-____");

        assert!(engine.undo());
        assert_eq!(engine.value(), "(5__) ___-____");
        assert!(engine.undo());
        assert_eq!(engine.value(), "(___) ___-____");
    }

    #[test]
    fn typing_after_undo_keeps_the_undone_to_state() {
        let mut engine = phone("");
        type_all(&mut engine, "55");
        engine.set_selection(Selection::new(2, 3));
        assert!(engine.backspace());
        assert!(engine.undo());
        assert_eq!(engine.value(), "(55_) ___-____");

        engine.set_selection(Selection::collapsed(2));
        assert!(engine.input('7'));
        assert_eq!(engine.value(), "(57_) ___-____");

        assert!(engine.undo());
        assert_eq!(engine.value(), "(55_) ___-____");
        assert!(engine.undo());
        assert_eq!(engine.value(), "(___) ___-____");
    }

    #[test]
    fn pattern_change_keeps_raw_value() {
        let mut engine = phone("5551234567");
        engine
            .set_pattern_preserving("111-111-1111", PatternChangePolicy::Truncate)
            .expect("pattern change");
        assert_eq!(engine.value(), "555-123-4567");
        assert_eq!(engine.selection(), Selection::default());
    }

    #[test]
    fn pattern_change_keeps_data_matching_new_literals() {
        let mut engine = phone("1555123456");
        engine
            .set_pattern_preserving("+\\1 (111) 111-1111", PatternChangePolicy::Reject)
            .expect("same slot count");
        assert_eq!(engine.value(), "+1 (155) 512-3456");
        assert_eq!(engine.raw_value(), "1555123456");
    }

    #[test]
    fn narrower_pattern_truncates_or_rejects_by_policy() {
        let mut engine = phone("5551234567");
        let err = engine
            .set_pattern_preserving("111-1111", PatternChangePolicy::Reject)
            .expect_err("too narrow");
        assert!(matches!(
            err,
            ConfigurationError::PatternTooNarrow {
                slots: 7,
                required: 10
            }
        ));
        assert_eq!(engine.pattern().source(), "(111) 111-1111");

        engine
            .set_pattern_preserving("111-1111", PatternChangePolicy::Truncate)
            .expect("truncate");
        assert_eq!(engine.value(), "555-1234");
    }

    #[test]
    fn partial_value_fits_narrower_pattern_under_reject() {
        let mut engine = phone("555");
        engine
            .set_pattern_preserving("111-1111", PatternChangePolicy::Reject)
            .expect("fits");
        assert_eq!(engine.value(), "555-____");
    }

    #[test]
    fn invalid_new_pattern_keeps_old_one() {
        let mut engine = phone("555");
        assert!(engine.set_pattern("--", "").is_err());
        assert_eq!(engine.value(), "(555) ___-____");
    }

    #[test]
    fn snap_selection_moves_caret_after_last_filled_slot() {
        let mut engine = phone("55");
        assert!(engine.snap_selection(Selection::collapsed(12)));
        assert_eq!(engine.selection(), Selection::collapsed(3));

        assert!(engine.snap_selection(Selection::collapsed(0)));
        assert_eq!(engine.selection(), Selection::collapsed(1));

        assert!(!engine.snap_selection(Selection::new(2, 5)));
        assert_eq!(engine.selection(), Selection::new(2, 5));
    }

    #[test]
    fn set_value_reformats_in_place() {
        let mut engine = phone("");
        engine.set_value("555 12");
        assert_eq!(engine.value(), "(555) 12_-____");
    }
}
