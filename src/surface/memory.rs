use super::{NativeEditor, NativeEffect, SurfaceAttributes, TextSurface};
use crate::core::selection::Selection;
use crate::core::text_edit;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

/// In-memory single-line input with the default editing behavior of a
/// browser text field.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    value: String,
    anchor: usize,
    head: usize,
    attributes: SurfaceAttributes,
    clipboard: Option<String>,
    attached: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemorySurface {
    pub fn new(value: &str) -> Self {
        let len = text_edit::char_count(value);
        Self {
            value: value.to_string(),
            anchor: len,
            head: len,
            attributes: SurfaceAttributes::default(),
            clipboard: None,
            attached: true,
        }
    }

    pub fn attributes(&self) -> &SurfaceAttributes {
        &self.attributes
    }

    /// End of the selection that moves with Shift+arrows.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn selected_text(&self) -> String {
        text_edit::slice(&self.value, self.selection())
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = Some(text.into());
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    fn len(&self) -> usize {
        text_edit::char_count(&self.value)
    }

    fn place(&mut self, anchor: usize, head: usize) {
        let len = self.len();
        self.anchor = anchor.min(len);
        self.head = head.min(len);
    }

    fn move_head(&mut self, target: usize, extend: bool) -> NativeEffect {
        let selection = self.selection();
        if extend {
            self.place(self.anchor, target);
        } else {
            self.place(target, target);
        }
        if self.selection() == selection {
            NativeEffect::None
        } else {
            NativeEffect::Moved
        }
    }

    fn delete_selection(&mut self) -> String {
        let selection = self.selection();
        let removed = text_edit::remove_span(&mut self.value, selection);
        self.place(selection.start, selection.start);
        removed
    }

    fn type_char(&mut self, ch: char) -> NativeEffect {
        let selection = self.selection();
        let max_length = self.attributes.max_length;
        if max_length > 0 && self.len() - selection.len() >= max_length {
            return NativeEffect::None;
        }
        self.delete_selection();
        let caret = text_edit::insert_str(&mut self.value, selection.start, ch.encode_utf8(&mut [0u8; 4]));
        self.place(caret, caret);
        NativeEffect::Edited
    }
}

impl TextSurface for MemorySurface {
    fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Like a browser field, a changed value leaves the caret at its end.
    fn set_value(&mut self, value: &str) {
        if self.value == value {
            return;
        }
        self.value = value.to_string();
        let len = self.len();
        self.place(len, len);
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor, self.head)
    }

    fn set_selection(&mut self, selection: Selection) {
        self.place(selection.start, selection.end);
    }

    fn set_attributes(&mut self, attributes: &SurfaceAttributes) {
        self.attributes = attributes.clone();
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl NativeEditor for MemorySurface {
    fn apply_native_key(&mut self, key: &KeyEvent) -> NativeEffect {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let selection = self.selection();
        let len = self.len();

        match key.code {
            KeyCode::Left if !extend && !selection.is_empty() => {
                self.move_head(selection.start, false)
            }
            KeyCode::Right if !extend && !selection.is_empty() => {
                self.move_head(selection.end, false)
            }
            KeyCode::Left => self.move_head(self.head.saturating_sub(1), extend),
            KeyCode::Right => self.move_head((self.head + 1).min(len), extend),
            KeyCode::Home => self.move_head(0, extend),
            KeyCode::End => self.move_head(len, extend),
            KeyCode::Char('a') if key.modifiers.has_platform_modifier() => {
                self.place(0, len);
                NativeEffect::Moved
            }
            KeyCode::Char('c') if key.modifiers.has_platform_modifier() => {
                if !selection.is_empty() {
                    self.clipboard = Some(self.selected_text());
                }
                NativeEffect::None
            }
            KeyCode::Char('x') if key.modifiers.has_platform_modifier() => {
                if selection.is_empty() {
                    return NativeEffect::None;
                }
                self.clipboard = Some(self.delete_selection());
                NativeEffect::Edited
            }
            KeyCode::Delete | KeyCode::Backspace if !selection.is_empty() => {
                self.delete_selection();
                NativeEffect::Edited
            }
            KeyCode::Delete if selection.start < len => {
                self.place(selection.start, selection.start + 1);
                self.delete_selection();
                NativeEffect::Edited
            }
            KeyCode::Backspace if selection.start > 0 => {
                self.place(selection.start - 1, selection.start);
                self.delete_selection();
                NativeEffect::Edited
            }
            KeyCode::Char(ch) if !key.modifiers.has_command_modifier() => self.type_char(ch),
            _ => NativeEffect::None,
        }
    }

    fn clipboard_text(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }
}
