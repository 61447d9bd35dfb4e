use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Char(char),
    Enter,
    Tab,
    BackTab,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    /// Command on macOS, Super/Windows elsewhere.
    pub const META: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Ctrl or Meta: the modifier that drives undo/redo shortcuts.
    pub fn has_platform_modifier(self) -> bool {
        self.intersects(Self::CONTROL | Self::META)
    }

    /// Any modifier other than Shift.
    pub fn has_command_modifier(self) -> bool {
        self.intersects(Self::CONTROL | Self::ALT | Self::META)
    }
}

impl BitOr for KeyModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for KeyModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_sets_combine_and_query() {
        let mods = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert!(mods.contains(KeyModifiers::SHIFT));
        assert!(mods.has_platform_modifier());
        assert!(mods.has_command_modifier());
        assert!(!KeyModifiers::SHIFT.has_command_modifier());
        assert!(KeyModifiers::META.has_platform_modifier());
        assert!(!KeyModifiers::ALT.has_platform_modifier());
        assert!(KeyModifiers::NONE.is_empty());
    }
}
