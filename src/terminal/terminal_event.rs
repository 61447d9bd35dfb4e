use crate::terminal::KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    /// Bracketed paste delivered as one block of text.
    Paste(String),
    Resize { width: u16, height: u16 },
}
