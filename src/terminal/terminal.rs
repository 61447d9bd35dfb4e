use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent,
    KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers as CrosstermKeyModifiers,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// A run of text rendered with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub highlighted: bool,
    pub dim: bool,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
            dim: false,
        }
    }

    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            highlighted: true,
            ..Self::plain(text)
        }
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self {
            dim: true,
            ..Self::plain(text)
        }
    }
}

const RESERVED_ROWS: u16 = 3;

pub struct Terminal {
    stdout: Stdout,
    origin_row: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            stdout: io::stdout(),
            origin_row: 0,
        })
    }

    /// Reserve the lines below the cursor and switch to raw mode.
    pub fn enter(&mut self) -> io::Result<()> {
        execute!(self.stdout, Print("\n".repeat(RESERVED_ROWS as usize)))?;
        execute!(self.stdout, cursor::MoveUp(RESERVED_ROWS))?;
        let (_, row) = cursor::position()?;
        self.origin_row = row;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnableBracketedPaste, terminal::DisableLineWrap)?;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            DisableBracketedPaste,
            terminal::EnableLineWrap,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            cursor::MoveTo(0, self.origin_row.saturating_add(RESERVED_ROWS - 1))
        )?;
        self.stdout.flush()
    }

    /// Wait up to `timeout` for one event; `None` when nothing arrived.
    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TerminalEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let mapped = match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Some(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Paste(text) => Some(TerminalEvent::Paste(text)),
            CrosstermEvent::Resize(width, height) => Some(TerminalEvent::Resize { width, height }),
            _ => None,
        };
        Ok(mapped)
    }

    /// Redraw one line below the origin and park the cursor at `cursor_col`.
    pub fn render_line(&mut self, row: u16, cells: &[Cell], cursor_col: Option<u16>) -> io::Result<()> {
        let y = self.origin_row.saturating_add(row);
        queue!(
            self.stdout,
            cursor::MoveTo(0, y),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;

        for cell in cells {
            if cell.highlighted {
                queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
            }
            if cell.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }
            queue!(self.stdout, Print(&cell.text))?;
            if cell.highlighted || cell.dim {
                queue!(self.stdout, SetAttribute(Attribute::Reset))?;
            }
        }

        match cursor_col {
            Some(col) => queue!(self.stdout, cursor::MoveTo(col, y), cursor::Show)?,
            None => queue!(self.stdout, cursor::Hide)?,
        }
        self.stdout.flush()
    }
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(key.code),
        modifiers: map_key_modifiers(key.modifiers),
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::NONE;
    if modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        out |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(CrosstermKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if modifiers.intersects(CrosstermKeyModifiers::SUPER | CrosstermKeyModifiers::META) {
        out |= KeyModifiers::META;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossterm_keys_map_to_local_events() {
        let key = CrosstermKeyEvent::new(
            CrosstermKeyCode::Char('z'),
            CrosstermKeyModifiers::CONTROL | CrosstermKeyModifiers::SHIFT,
        );
        let mapped = map_key_event(key);
        assert_eq!(mapped.code, KeyCode::Char('z'));
        assert!(mapped.modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert!(!mapped.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn super_key_maps_to_meta() {
        let mods = map_key_modifiers(CrosstermKeyModifiers::SUPER);
        assert_eq!(mods, KeyModifiers::META);
        assert_eq!(map_key_code(CrosstermKeyCode::F(5)), KeyCode::Unknown);
    }
}
