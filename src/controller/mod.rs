//! Keeps one [`MaskEngine`] and one [`TextSurface`] in agreement while the
//! user types, deletes, pastes and undoes.

pub mod classify;
pub mod event;
pub mod format;
pub mod sync;

use crate::config::MaskOptions;
use crate::core::error::Result;
use crate::core::selection::Selection;
use crate::mask::{MaskEngine, Pattern};
use crate::runtime::{Scheduler, SchedulerCommand};
use crate::surface::{NativeEditor, NativeEffect, SurfaceAttributes, TextSurface};
use crate::terminal::{KeyCode, KeyEvent};
use crate::validators::{Validator, run_validators};
use log::{debug, info};
use std::time::{Duration, Instant};

pub use classify::{EditOp, KeyCombo, classify_edit, classify_key_combo};
pub use event::{EventKind, NativeEvent};
pub use format::ValueFormatter;

const SELECTION_TASK: &str = "selection";

pub type EventCallback = Box<dyn FnMut(&NativeEvent)>;
pub type ValueCallback = Box<dyn FnMut(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The engine refused the edit.
    Engine,
    /// A paste validator refused the clipboard text.
    Validation,
}

/// Result of handling one notification. Rejected keystrokes and pastes
/// leave the engine as it was and fire no callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Unchanged,
    Rejected(RejectReason),
    /// Not a mask edit; the surface's default behavior applies.
    Passthrough,
}

/// Work that runs after the handler that queued it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMutationTask {
    WriteSelection(Selection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionWrite {
    Now,
    NextTurn,
}

pub struct MaskedEditController<S: TextSurface> {
    surface: S,
    engine: MaskEngine,
    formatter: ValueFormatter,
    options: MaskOptions,
    validators: Vec<Validator>,
    scheduler: Scheduler<PostMutationTask>,
    on_change: Option<EventCallback>,
    on_change_value: Option<ValueCallback>,
    on_key_down: Option<EventCallback>,
}

impl<S: TextSurface> MaskedEditController<S> {
    pub fn new(options: MaskOptions, surface: S) -> Result<Self> {
        let formats = options.format_characters()?;
        let pattern = Pattern::compile(&options.pattern, &formats)?;
        let formatter = ValueFormatter::new(&options.non_data_mask)?;
        let value = formatter.interleave(&formatter.strip_filler(&options.value), &pattern);
        let engine = MaskEngine::new(pattern, formats, options.placeholder_char, &value)?
            .with_paste_policy(options.paste_policy)
            .with_history_limit(options.history_limit);

        info!("masked edit controller created for {:?}", options.pattern);

        let mut controller = Self {
            surface,
            engine,
            formatter,
            options,
            validators: Vec::new(),
            scheduler: Scheduler::new(),
            on_change: None,
            on_change_value: None,
            on_key_down: None,
        };
        controller.render();
        Ok(controller)
    }

    pub fn with_on_change(mut self, callback: impl FnMut(&NativeEvent) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn with_on_change_value(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change_value = Some(Box::new(callback));
        self
    }

    pub fn with_on_key_down(mut self, callback: impl FnMut(&NativeEvent) + 'static) -> Self {
        self.on_key_down = Some(Box::new(callback));
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn engine(&self) -> &MaskEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The engine value, or an empty string while no slot is filled.
    pub fn display_value(&self) -> String {
        let value = self.engine.value();
        if value == self.engine.empty_value() {
            String::new()
        } else {
            value
        }
    }

    /// The display value with filler removed.
    pub fn clean_value(&self) -> String {
        self.formatter.strip_filler(&self.display_value())
    }

    pub fn attributes(&self) -> SurfaceAttributes {
        let len = self.engine.pattern().len();
        SurfaceAttributes {
            max_length: len,
            size: self.options.size.unwrap_or(len),
            placeholder: self
                .options
                .placeholder
                .clone()
                .unwrap_or_else(|| self.engine.empty_value().to_string()),
        }
    }

    /// Swap in a new pattern, carrying the current raw value over.
    pub fn set_pattern(&mut self, source: &str) -> Result<()> {
        if source == self.engine.pattern().source() {
            return Ok(());
        }
        self.engine
            .set_pattern_preserving(source, self.options.pattern_change)?;
        self.options.pattern = source.to_string();
        self.render();
        Ok(())
    }

    /// Replace the value programmatically. No callbacks fire.
    pub fn set_value(&mut self, value: &str) {
        let raw = self.formatter.strip_filler(value);
        let formatted = self.formatter.interleave(&raw, self.engine.pattern());
        self.engine.set_value(&formatted);
        let display = self.display_value();
        self.surface.set_value(&display);
    }

    pub fn on_change(&mut self, event: &mut NativeEvent) -> EditOutcome {
        let current = self.display_value();
        let reported = event.target_value().to_string();
        if reported == current {
            self.fire_change(event);
            return EditOutcome::Unchanged;
        }

        let caret = sync::read_selection(&self.surface).start;
        let op = classify_edit(&current, &reported, caret);
        debug!("change classified as {:?}", op);
        let applied = self.apply_edit(op);

        let display = self.display_value();
        event.set_target_value(&display);
        self.surface.set_value(&display);
        if !display.is_empty() {
            self.write_selection_now();
        }
        self.fire_change(event);

        if applied {
            EditOutcome::Applied
        } else {
            EditOutcome::Rejected(RejectReason::Engine)
        }
    }

    pub fn on_key_down(&mut self, event: &mut NativeEvent) -> EditOutcome {
        let outcome = match event.key() {
            Some(key) => self.key_down(event, key),
            None => EditOutcome::Passthrough,
        };
        if let Some(callback) = self.on_key_down.as_mut() {
            callback(&*event);
        }
        outcome
    }

    fn key_down(&mut self, event: &mut NativeEvent, key: KeyEvent) -> EditOutcome {
        match classify_key_combo(key.code, key.modifiers) {
            KeyCombo::Undo => {
                event.prevent_default();
                if !self.engine.undo() {
                    return EditOutcome::Unchanged;
                }
                self.commit(event, self.display_value(), SelectionWrite::Now);
                EditOutcome::Applied
            }
            KeyCombo::Redo => {
                event.prevent_default();
                if !self.engine.redo() {
                    return EditOutcome::Unchanged;
                }
                self.commit(event, self.display_value(), SelectionWrite::Now);
                EditOutcome::Applied
            }
            // Backspace goes to the engine whatever the modifiers.
            KeyCombo::Passthrough | KeyCombo::Ignore if key.code == KeyCode::Backspace => {
                event.prevent_default();
                self.sync_engine_selection();
                if !self.engine.backspace() {
                    return EditOutcome::Unchanged;
                }
                self.commit(event, self.display_value(), SelectionWrite::Now);
                EditOutcome::Applied
            }
            _ => EditOutcome::Passthrough,
        }
    }

    pub fn on_key_press(&mut self, event: &mut NativeEvent) -> EditOutcome {
        let Some(key) = event.key() else {
            return EditOutcome::Passthrough;
        };
        let KeyCode::Char(ch) = key.code else {
            return EditOutcome::Passthrough;
        };
        if key.modifiers.has_command_modifier() {
            return EditOutcome::Passthrough;
        }

        event.prevent_default();
        self.sync_engine_selection();
        if !self.engine.input(ch) {
            return EditOutcome::Rejected(RejectReason::Engine);
        }
        self.commit(event, self.engine.value(), SelectionWrite::Now);
        EditOutcome::Applied
    }

    pub fn on_paste(&mut self, event: &mut NativeEvent) -> EditOutcome {
        event.prevent_default();
        self.sync_engine_selection();

        let text = self
            .formatter
            .strip_filler(event.clipboard_text().unwrap_or_default());
        if let Err(message) = run_validators(&self.validators, &text) {
            debug!("paste rejected by validator: {message}");
            return EditOutcome::Rejected(RejectReason::Validation);
        }

        let start = self.engine.selection().start;
        let formatted = self
            .formatter
            .interleave_from(&text, self.engine.pattern(), start);
        if !self.engine.paste(&formatted) {
            return EditOutcome::Rejected(RejectReason::Engine);
        }
        self.commit(event, self.engine.value(), SelectionWrite::NextTurn);
        EditOutcome::Applied
    }

    /// Snap the caret into the editable region when the surface gains focus.
    pub fn on_focus(&mut self) -> bool {
        let selection = sync::read_selection(&self.surface);
        if !self.engine.snap_selection(selection) {
            return false;
        }
        if !self.display_value().is_empty() {
            self.write_selection_now();
        }
        true
    }

    /// Run deferred work that is due. Returns how many tasks ran.
    pub fn tick(&mut self) -> usize {
        let tasks = self.scheduler.drain_ready(Instant::now());
        let count = tasks.len();
        for task in tasks {
            match task {
                PostMutationTask::WriteSelection(selection) => {
                    if self.surface.is_attached() {
                        sync::write_selection(&mut self.surface, selection);
                    } else {
                        debug!("surface detached, deferred selection write skipped");
                    }
                }
            }
        }
        count
    }

    /// How long a host loop may sleep before [`Self::tick`] has work.
    pub fn poll_timeout(&self, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(Instant::now(), default_timeout)
    }

    fn apply_edit(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Unchanged => false,
            EditOp::Delete { span } => {
                self.engine.set_selection(span);
                self.engine.backspace()
            }
            EditOp::Insert { at, text } => {
                self.engine.set_selection(Selection::collapsed(at));
                self.insert_text(&text)
            }
            EditOp::Replace { span, text } => {
                self.engine.set_selection(span);
                if text.chars().count() == 1 {
                    return self.insert_text(&text);
                }
                let cleared = self.engine.backspace();
                self.insert_text(&text) || cleared
            }
        }
    }

    fn insert_text(&mut self, text: &str) -> bool {
        let mut chars = text.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return self.engine.input(ch);
        }
        let raw = self.formatter.strip_filler(text);
        let start = self.engine.selection().start;
        let formatted = self
            .formatter
            .interleave_from(&raw, self.engine.pattern(), start);
        self.engine.paste(&formatted)
    }

    fn sync_engine_selection(&mut self) {
        let selection = sync::read_selection(&self.surface);
        self.engine.set_selection(selection);
    }

    fn write_selection_now(&mut self) {
        self.scheduler.schedule(
            SchedulerCommand::Cancel {
                key: SELECTION_TASK.to_string(),
            },
            Instant::now(),
        );
        sync::write_selection(&mut self.surface, self.engine.selection());
    }

    fn commit(&mut self, event: &mut NativeEvent, value: String, write: SelectionWrite) {
        event.set_target_value(&value);
        self.surface.set_value(&value);
        if !value.is_empty() {
            match write {
                SelectionWrite::Now => self.write_selection_now(),
                SelectionWrite::NextTurn => self.scheduler.schedule(
                    SchedulerCommand::NextTurn {
                        key: SELECTION_TASK.to_string(),
                        task: PostMutationTask::WriteSelection(self.engine.selection()),
                    },
                    Instant::now(),
                ),
            }
        }
        self.fire_change(event);
    }

    fn fire_change(&mut self, event: &NativeEvent) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(event);
        }
        if self.on_change_value.is_some() {
            let clean = self.clean_value();
            if let Some(callback) = self.on_change_value.as_mut() {
                callback(clean.as_str());
            }
        }
    }

    fn render(&mut self) {
        let attributes = self.attributes();
        self.surface.set_attributes(&attributes);
        let display = self.display_value();
        self.surface.set_value(&display);
    }
}

impl<S: NativeEditor> MaskedEditController<S> {
    /// Deliver a key the way a browser does: key-down, then key-press for
    /// characters, then the surface's own default, then a change
    /// notification if that default edited the value.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        let mut down = NativeEvent::key_down(key, self.surface.value());
        let outcome = self.on_key_down(&mut down);
        if down.is_default_prevented() {
            return outcome;
        }

        if matches!(key.code, KeyCode::Char('v' | 'V')) && key.modifiers.has_platform_modifier() {
            let Some(text) = self.surface.clipboard_text().map(str::to_string) else {
                return EditOutcome::Passthrough;
            };
            return self.handle_paste(&text);
        }

        if matches!(key.code, KeyCode::Char(_)) {
            let mut press = NativeEvent::key_press(key, self.surface.value());
            let outcome = self.on_key_press(&mut press);
            if press.is_default_prevented() {
                return outcome;
            }
        }

        match self.surface.apply_native_key(&key) {
            NativeEffect::Edited => {
                let mut change = NativeEvent::change(self.surface.value());
                self.on_change(&mut change)
            }
            NativeEffect::Moved | NativeEffect::None => EditOutcome::Passthrough,
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> EditOutcome {
        let mut event = NativeEvent::paste(text, self.surface.value());
        self.on_paste(&mut event)
    }
}
