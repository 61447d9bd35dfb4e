//! The live text input a controller keeps in sync with its mask engine.

mod memory;

use crate::core::selection::Selection;
use crate::terminal::KeyEvent;

pub use memory::MemorySurface;

/// Rendered attributes derived from the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceAttributes {
    pub max_length: usize,
    pub size: usize,
    pub placeholder: String,
}

pub trait TextSurface {
    fn value(&self) -> &str;
    fn set_value(&mut self, value: &str);
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);

    fn set_attributes(&mut self, _attributes: &SurfaceAttributes) {}

    /// False once the surface is gone; pending selection writes are skipped.
    fn is_attached(&self) -> bool {
        true
    }
}

/// What the surface's own default key handling did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEffect {
    None,
    Moved,
    Edited,
}

/// A surface with built-in editing, run when a key's default is not
/// suppressed.
pub trait NativeEditor: TextSurface {
    fn apply_native_key(&mut self, key: &KeyEvent) -> NativeEffect;

    fn clipboard_text(&self) -> Option<&str>;
}
